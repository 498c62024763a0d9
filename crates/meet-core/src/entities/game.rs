//! Game session entity - an ephemeral, room-scoped mini-game
//!
//! The session is a plain state machine. Timers, locking and fan-out live in
//! the service layer; everything here is synchronous and cannot partially fail.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Actor;
use crate::error::DomainError;
use crate::value_objects::{ConnectionId, GameId, MeetingId, UserId};

/// Kind of mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// Stop a hidden timer as close as possible to the target seconds
    #[default]
    Timing,
    /// Tap as fast as possible; the target is always zero
    Reaction,
}

impl GameKind {
    /// Target actually used for ranking
    pub fn effective_target(self, requested: f64) -> f64 {
        match self {
            Self::Timing => requested,
            Self::Reaction => 0.0,
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Running,
    Finished,
    Cancelled,
}

/// Why a session stopped running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// Every joined player submitted
    Completed,
    /// The auto-end deadline fired first
    Timeout,
}

/// A player's submitted result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub value: f64,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip)]
    order: u64,
}

/// A player in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: UserId,
    pub name: String,
    pub join_time: DateTime<Utc>,
    pub result: Option<PlayerResult>,
    #[serde(skip)]
    pub connection_id: Option<ConnectionId>,
}

/// One line of a final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub rank: usize,
    pub player_id: UserId,
    pub name: String,
    pub value: f64,
    pub diff: f64,
}

/// Result of finishing a session
#[derive(Debug, Clone, PartialEq)]
pub enum GameOutcome {
    Ranked(Vec<RankedResult>),
    Cancelled,
}

/// What a join request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    Updated,
    NotRunning,
}

/// What a result submission did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; `complete` is true when every joined player now has a result
    Recorded { complete: bool },
    AlreadySubmitted,
    NotJoined,
    NotRunning,
}

/// Parameters of a start command
#[derive(Debug, Clone, PartialEq)]
pub struct GameStart {
    pub meeting_id: MeetingId,
    pub game_id: GameId,
    pub kind: GameKind,
    pub target_value: f64,
    pub started_by: Actor,
}

/// Game session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub game_id: GameId,
    pub meeting_id: MeetingId,
    pub kind: GameKind,
    pub started_by: Actor,
    pub start_time: DateTime<Utc>,
    pub target_value: f64,
    pub players: Vec<Player>,
    pub status: GameStatus,
    pub auto_end_deadline: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    epoch: u64,
    #[serde(skip)]
    next_order: u64,
}

impl GameSession {
    /// Start a running session whose deadline is `target + grace` from now
    pub fn start(params: GameStart, grace: Duration, epoch: u64) -> Result<Self, DomainError> {
        Self::start_at(params, grace, epoch, Utc::now())
    }

    /// Start a running session at an explicit instant
    pub fn start_at(
        params: GameStart,
        grace: Duration,
        epoch: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let target = params.kind.effective_target(params.target_value);
        if !target.is_finite() || target < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "target value must be a non-negative number, got {}",
                params.target_value
            )));
        }
        if params.game_id.is_blank() {
            return Err(DomainError::ValidationError("game id must not be empty".into()));
        }

        let target_ms = (target * 1000.0).round() as i64;
        let deadline = now + Duration::milliseconds(target_ms) + grace;

        Ok(Self {
            game_id: params.game_id,
            meeting_id: params.meeting_id,
            kind: params.kind,
            started_by: params.started_by,
            start_time: now,
            target_value: target,
            players: Vec::new(),
            status: GameStatus::Running,
            auto_end_deadline: deadline,
            finished_at: None,
            epoch,
            next_order: 0,
        })
    }

    /// Generation tag; timers compare it before acting
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn player(&self, player_id: &UserId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    /// Add a player, or refresh an existing one in place
    pub fn join(&mut self, actor: Actor, connection_id: Option<ConnectionId>) -> JoinOutcome {
        if !self.is_running() {
            return JoinOutcome::NotRunning;
        }

        if let Some(existing) = self.players.iter_mut().find(|p| p.id == actor.id) {
            existing.name = actor.name;
            if connection_id.is_some() {
                existing.connection_id = connection_id;
            }
            return JoinOutcome::Updated;
        }

        self.players.push(Player {
            id: actor.id,
            name: actor.name,
            join_time: Utc::now(),
            result: None,
            connection_id,
        });
        JoinOutcome::Joined
    }

    /// Record a player's result; the first submission wins
    pub fn submit(&mut self, player_id: &UserId, value: f64) -> Result<SubmitOutcome, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "result must be a non-negative number, got {value}"
            )));
        }
        if !self.is_running() {
            return Ok(SubmitOutcome::NotRunning);
        }

        let order = self.next_order;
        let Some(player) = self.players.iter_mut().find(|p| &p.id == player_id) else {
            return Ok(SubmitOutcome::NotJoined);
        };
        if player.result.is_some() {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }

        player.result = Some(PlayerResult {
            value,
            submitted_at: Utc::now(),
            order,
        });
        self.next_order += 1;

        Ok(SubmitOutcome::Recorded {
            complete: self.is_complete(),
        })
    }

    /// Remove every player bound to a connection, returning their ids
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Vec<UserId> {
        let mut removed = Vec::new();
        self.players.retain(|p| {
            if p.connection_id == Some(connection_id) {
                removed.push(p.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// True when at least one player joined and all of them submitted
    pub fn is_complete(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.result.is_some())
    }

    pub fn submitted_count(&self) -> usize {
        self.players.iter().filter(|p| p.result.is_some()).count()
    }

    /// Ascending by distance to the target; ties keep submission order
    pub fn ranking(&self) -> Vec<RankedResult> {
        let mut results: Vec<(&Player, &PlayerResult)> = self
            .players
            .iter()
            .filter_map(|p| p.result.as_ref().map(|r| (p, r)))
            .collect();

        results.sort_by_key(|(_, r)| r.order);
        results.sort_by(|(_, a), (_, b)| {
            let da = (self.target_value - a.value).abs();
            let db = (self.target_value - b.value).abs();
            da.total_cmp(&db)
        });

        results
            .into_iter()
            .enumerate()
            .map(|(i, (p, r))| RankedResult {
                rank: i + 1,
                player_id: p.id.clone(),
                name: p.name.clone(),
                value: r.value,
                diff: (self.target_value - r.value).abs(),
            })
            .collect()
    }

    /// Stop the session: ranked if anyone submitted, cancelled otherwise
    pub fn finish(&mut self) -> GameOutcome {
        self.finished_at = Some(Utc::now());
        if self.submitted_count() == 0 {
            self.status = GameStatus::Cancelled;
            GameOutcome::Cancelled
        } else {
            self.status = GameStatus::Finished;
            GameOutcome::Ranked(self.ranking())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(target: f64) -> GameSession {
        GameSession::start(
            GameStart {
                meeting_id: MeetingId::new("m1"),
                game_id: GameId::new("g1"),
                kind: GameKind::Timing,
                target_value: target,
                started_by: Actor::new("host", "Host"),
            },
            Duration::seconds(15),
            1,
        )
        .unwrap()
    }

    fn uid(id: &str) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn test_deadline_is_target_plus_grace() {
        let session = start(10.0);
        assert_eq!(
            session.auto_end_deadline - session.start_time,
            Duration::seconds(25)
        );
        assert!(session.is_running());
    }

    #[test]
    fn test_invalid_target_rejected() {
        let params = GameStart {
            meeting_id: MeetingId::new("m1"),
            game_id: GameId::new("g1"),
            kind: GameKind::Timing,
            target_value: -1.0,
            started_by: Actor::new("host", "Host"),
        };
        assert!(GameSession::start(params, Duration::seconds(15), 1).is_err());
    }

    #[test]
    fn test_reaction_kind_targets_zero() {
        let session = GameSession::start(
            GameStart {
                meeting_id: MeetingId::new("m1"),
                game_id: GameId::new("g1"),
                kind: GameKind::Reaction,
                target_value: 99.0,
                started_by: Actor::new("host", "Host"),
            },
            Duration::seconds(15),
            1,
        )
        .unwrap();
        assert!(session.target_value.abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_join_updates_in_place() {
        let mut session = start(10.0);
        assert_eq!(session.join(Actor::new("p1", "One"), None), JoinOutcome::Joined);
        assert_eq!(
            session.join(Actor::new("p1", "Uno"), Some(ConnectionId::new(3))),
            JoinOutcome::Updated
        );
        assert_eq!(session.players.len(), 1);
        assert_eq!(session.players[0].name, "Uno");
        assert_eq!(session.players[0].connection_id, Some(ConnectionId::new(3)));
    }

    #[test]
    fn test_first_submission_wins() {
        let mut session = start(10.0);
        session.join(Actor::new("p1", "One"), None);
        session.join(Actor::new("p2", "Two"), None);

        assert_eq!(
            session.submit(&uid("p1"), 9.8).unwrap(),
            SubmitOutcome::Recorded { complete: false }
        );
        assert_eq!(
            session.submit(&uid("p1"), 10.0).unwrap(),
            SubmitOutcome::AlreadySubmitted
        );
        assert!((session.player(&uid("p1")).unwrap().result.as_ref().unwrap().value - 9.8).abs() < 1e-9);
    }

    #[test]
    fn test_completion_when_all_submitted() {
        let mut session = start(10.0);
        session.join(Actor::new("p1", "One"), None);
        session.join(Actor::new("p2", "Two"), None);

        session.submit(&uid("p1"), 9.8).unwrap();
        assert_eq!(
            session.submit(&uid("p2"), 10.3).unwrap(),
            SubmitOutcome::Recorded { complete: true }
        );

        let outcome = session.finish();
        let GameOutcome::Ranked(ranking) = outcome else {
            panic!("expected ranked outcome");
        };
        assert_eq!(ranking[0].player_id, uid("p1"));
        assert_eq!(ranking[1].player_id, uid("p2"));
        assert_eq!(ranking[0].rank, 1);
        assert!((ranking[0].diff - 0.2).abs() < 1e-9);
        assert_eq!(session.status, GameStatus::Finished);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut session = start(10.0);
        session.join(Actor::new("p1", "One"), None);
        session.join(Actor::new("p2", "Two"), None);
        session.join(Actor::new("p3", "Three"), None);

        session.submit(&uid("p2"), 10.5).unwrap();
        session.submit(&uid("p1"), 9.5).unwrap();
        session.submit(&uid("p3"), 10.1).unwrap();

        let ids: Vec<_> = session.ranking().into_iter().map(|r| r.player_id).collect();
        assert_eq!(ids, vec![uid("p3"), uid("p2"), uid("p1")]);
    }

    #[test]
    fn test_submit_rules() {
        let mut session = start(10.0);
        assert_eq!(session.submit(&uid("ghost"), 1.0).unwrap(), SubmitOutcome::NotJoined);
        assert!(session.submit(&uid("ghost"), f64::NAN).is_err());

        session.join(Actor::new("p1", "One"), None);
        session.finish();
        assert_eq!(session.submit(&uid("p1"), 1.0).unwrap(), SubmitOutcome::NotRunning);
        assert_eq!(session.join(Actor::new("p2", "Two"), None), JoinOutcome::NotRunning);
    }

    #[test]
    fn test_finish_without_results_is_cancelled() {
        let mut session = start(10.0);
        session.join(Actor::new("p1", "One"), None);
        assert_eq!(session.finish(), GameOutcome::Cancelled);
        assert_eq!(session.status, GameStatus::Cancelled);
        assert!(session.finished_at.is_some());
    }

    #[test]
    fn test_remove_connection() {
        let mut session = start(10.0);
        session.join(Actor::new("p1", "One"), Some(ConnectionId::new(1)));
        session.join(Actor::new("p2", "Two"), Some(ConnectionId::new(2)));

        assert_eq!(session.remove_connection(ConnectionId::new(1)), vec![uid("p1")]);
        assert_eq!(session.players.len(), 1);
        assert!(session.remove_connection(ConnectionId::new(9)).is_empty());
    }

    #[test]
    fn test_is_complete_requires_players() {
        let session = start(10.0);
        assert!(!session.is_complete());
    }
}
