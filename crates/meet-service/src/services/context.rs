//! Service context - dependency container for services
//!
//! Holds all repositories, the room publisher, the places provider and the
//! per-meeting coordination state needed by services.

use std::sync::Arc;

use meet_common::{GameConfig, RecommendationConfig};
use meet_core::traits::{
    CandidateRepository, EventPublisher, MeetingRepository, MessageRepository, NoopPublisher,
    PlacesProvider, SelectionRepository, VoteRepository,
};
use meet_db::{
    MemoryStore, PgCandidateRepository, PgMeetingRepository, PgMessageRepository, PgPool,
    PgSelectionRepository, PgVoteRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::game::GameSessionManager;
use super::locks::MeetingLocks;
use crate::recommend::NullPlacesProvider;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (in-memory or PostgreSQL)
/// - The room event publisher
/// - The external places/routing provider
/// - Per-meeting write locks and the game session manager
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    meeting_repo: Arc<dyn MeetingRepository>,
    candidate_repo: Arc<dyn CandidateRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    message_repo: Arc<dyn MessageRepository>,
    selection_repo: Arc<dyn SelectionRepository>,

    // Collaborators
    publisher: Arc<dyn EventPublisher>,
    places: Arc<dyn PlacesProvider>,

    // Coordination
    locks: MeetingLocks,
    games: GameSessionManager,

    recommendation: RecommendationConfig,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the meeting repository
    pub fn meeting_repo(&self) -> &dyn MeetingRepository {
        self.meeting_repo.as_ref()
    }

    /// Get the candidate repository
    pub fn candidate_repo(&self) -> &dyn CandidateRepository {
        self.candidate_repo.as_ref()
    }

    /// Get the vote repository
    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the selection repository
    pub fn selection_repo(&self) -> &dyn SelectionRepository {
        self.selection_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the room event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    /// Get the places/routing provider
    pub fn places(&self) -> &dyn PlacesProvider {
        self.places.as_ref()
    }

    // === Coordination ===

    /// Get the per-meeting write locks
    pub fn locks(&self) -> &MeetingLocks {
        &self.locks
    }

    /// Get the game session manager
    pub fn games(&self) -> &GameSessionManager {
        &self.games
    }

    pub fn recommendation_config(&self) -> &RecommendationConfig {
        &self.recommendation
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("publisher", &"dyn EventPublisher")
            .field("places", &"dyn PlacesProvider")
            .field("locks", &self.locks.len())
            .field("games", &self.games.session_count())
            .field("recommendation", &self.recommendation)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    meeting_repo: Option<Arc<dyn MeetingRepository>>,
    candidate_repo: Option<Arc<dyn CandidateRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    selection_repo: Option<Arc<dyn SelectionRepository>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    places: Option<Arc<dyn PlacesProvider>>,
    game_config: GameConfig,
    recommendation: RecommendationConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            meeting_repo: None,
            candidate_repo: None,
            vote_repo: None,
            message_repo: None,
            selection_repo: None,
            publisher: None,
            places: None,
            game_config: GameConfig::default(),
            recommendation: RecommendationConfig::default(),
        }
    }

    /// Back every repository with one shared in-memory store
    pub fn in_memory(self) -> Self {
        let store = Arc::new(MemoryStore::new());
        self.meeting_repo(store.clone())
            .candidate_repo(store.clone())
            .vote_repo(store.clone())
            .message_repo(store.clone())
            .selection_repo(store)
    }

    /// Back every repository with PostgreSQL
    pub fn postgres(self, pool: PgPool) -> Self {
        self.meeting_repo(Arc::new(PgMeetingRepository::new(pool.clone())))
            .candidate_repo(Arc::new(PgCandidateRepository::new(pool.clone())))
            .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
            .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
            .selection_repo(Arc::new(PgSelectionRepository::new(pool)))
    }

    pub fn meeting_repo(mut self, repo: Arc<dyn MeetingRepository>) -> Self {
        self.meeting_repo = Some(repo);
        self
    }

    pub fn candidate_repo(mut self, repo: Arc<dyn CandidateRepository>) -> Self {
        self.candidate_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn selection_repo(mut self, repo: Arc<dyn SelectionRepository>) -> Self {
        self.selection_repo = Some(repo);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn places(mut self, places: Arc<dyn PlacesProvider>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    pub fn recommendation_config(mut self, config: RecommendationConfig) -> Self {
        self.recommendation = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// The publisher defaults to [`NoopPublisher`] and the places provider to
    /// [`NullPlacesProvider`].
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let publisher = self
            .publisher
            .unwrap_or_else(|| Arc::new(NoopPublisher) as Arc<dyn EventPublisher>);
        let places = self
            .places
            .unwrap_or_else(|| Arc::new(NullPlacesProvider) as Arc<dyn PlacesProvider>);
        let games = GameSessionManager::new(publisher.clone(), self.game_config);

        Ok(ServiceContext {
            meeting_repo: self
                .meeting_repo
                .ok_or_else(|| ServiceError::validation("meeting_repo is required"))?,
            candidate_repo: self
                .candidate_repo
                .ok_or_else(|| ServiceError::validation("candidate_repo is required"))?,
            vote_repo: self
                .vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            message_repo: self
                .message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            selection_repo: self
                .selection_repo
                .ok_or_else(|| ServiceError::validation("selection_repo is required"))?,
            publisher,
            places,
            locks: MeetingLocks::new(),
            games,
            recommendation: self.recommendation,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_repositories() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("meeting_repo"));
    }

    #[tokio::test]
    async fn test_in_memory_defaults() {
        let ctx = ServiceContextBuilder::new().in_memory().build().unwrap();
        assert_eq!(ctx.recommendation_config().limit, 10);
        assert!(ctx.locks().is_empty());
        assert_eq!(ctx.games().session_count(), 0);
    }
}
