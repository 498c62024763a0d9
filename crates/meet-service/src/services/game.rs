//! Game session manager
//!
//! Owns the in-memory mini-game of each meeting. Every session lives in a
//! per-meeting slot behind an async mutex; commands, the auto-end timer, the
//! purge timer and disconnect cleanup all take that mutex, so whichever of
//! "last result submitted" and "deadline fired" locks first claims the finish.
//!
//! Timers are tokio tasks. They are aborted on reset/supersede and also
//! compare the session epoch under the lock before acting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use meet_common::GameConfig;
use meet_core::events::{
    GameCancelledEvent, GameFinishedEvent, GamePlayerResultEvent, GamePlayersUpdatedEvent,
    GameResetEvent, GameStartedEvent,
};
use meet_core::{
    Actor, ConnectionId, DomainEvent, EventPublisher, FinishReason, GameOutcome, GameSession,
    GameStart, JoinOutcome, MeetingId, SubmitOutcome, UserId,
};

use crate::dto::{GameReply, GameReplyStatus, GameSnapshot};

use super::error::{ServiceError, ServiceResult};

/// One meeting's game state
#[derive(Default)]
struct GameSlot {
    session: Option<GameSession>,
    /// Auto-end timer while running, purge timer once finished
    timer: Option<JoinHandle<()>>,
}

impl GameSlot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct GameInner {
    sessions: DashMap<MeetingId, Arc<Mutex<GameSlot>>>,
    epoch: AtomicU64,
    publisher: Arc<dyn EventPublisher>,
    config: GameConfig,
}

/// Manager of all live game sessions
#[derive(Clone)]
pub struct GameSessionManager {
    inner: Arc<GameInner>,
}

impl GameSessionManager {
    pub fn new(publisher: Arc<dyn EventPublisher>, config: GameConfig) -> Self {
        Self {
            inner: Arc::new(GameInner {
                sessions: DashMap::new(),
                epoch: AtomicU64::new(0),
                publisher,
                config,
            }),
        }
    }

    /// Number of meetings with a game slot
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Start a game, discarding any existing session of the meeting
    ///
    /// `game-started` is not echoed to `origin`.
    #[instrument(skip(self, params), fields(meeting_id = %params.meeting_id, game_id = %params.game_id))]
    pub async fn start(
        &self,
        params: GameStart,
        origin: Option<ConnectionId>,
    ) -> ServiceResult<GameReply> {
        let grace = chrono::Duration::from_std(self.inner.config.grace())
            .map_err(|e| ServiceError::internal(format!("invalid grace window: {e}")))?;
        let epoch = self.inner.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        let session = GameSession::start(params, grace, epoch)?;
        let meeting_id = session.meeting_id.clone();

        let slot = self.slot(&meeting_id);
        let mut guard = slot.lock().await;

        guard.cancel_timer();
        if let Some(previous) = guard.session.take() {
            debug!(
                meeting_id = %meeting_id,
                previous_game_id = %previous.game_id,
                "Superseding existing game"
            );
        }

        let deadline = session.auto_end_deadline;
        guard.timer = Some(self.spawn_auto_end(meeting_id.clone(), epoch, deadline));
        guard.session = Some(session.clone());

        info!(
            meeting_id = %meeting_id,
            game_id = %session.game_id,
            kind = ?session.kind,
            target = session.target_value,
            deadline = %deadline,
            "Game started"
        );

        self.inner.publisher.publish(
            &DomainEvent::GameStarted(GameStartedEvent {
                session: session.clone(),
                deadline,
            }),
            origin,
        );

        Ok(GameReply::new(GameReplyStatus::Started, Some(&session)))
    }

    /// Join the running game, or refresh the player's name and connection
    #[instrument(skip(self, actor), fields(player_id = %actor.id))]
    pub async fn join(
        &self,
        meeting_id: &MeetingId,
        actor: Actor,
        connection: Option<ConnectionId>,
    ) -> GameReply {
        let Some(slot) = self.existing_slot(meeting_id) else {
            return GameReply::new(GameReplyStatus::NotRunning, None);
        };
        let mut guard = slot.lock().await;
        let Some(session) = guard.session.as_mut() else {
            return GameReply::new(GameReplyStatus::NotRunning, None);
        };

        let player_id = actor.id.clone();
        let status = match session.join(actor, connection) {
            JoinOutcome::NotRunning => {
                trace!(meeting_id = %meeting_id, "Join ignored, game not running");
                return GameReply::new(GameReplyStatus::NotRunning, Some(&*session));
            }
            JoinOutcome::Joined => GameReplyStatus::Joined,
            JoinOutcome::Updated => GameReplyStatus::Updated,
        };

        info!(
            meeting_id = %meeting_id,
            game_id = %session.game_id,
            player_id = %player_id,
            players = session.players.len(),
            "Player joined game"
        );
        self.publish_roster(session);

        GameReply::new(status, Some(&*session))
    }

    /// Submit a player's result; the first submission wins
    ///
    /// Finishes the game when every joined player has a result.
    /// `game-player-result` is not echoed to `origin`.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        meeting_id: &MeetingId,
        player_id: &UserId,
        value: f64,
        origin: Option<ConnectionId>,
    ) -> ServiceResult<GameReply> {
        let Some(slot) = self.existing_slot(meeting_id) else {
            return Ok(GameReply::new(GameReplyStatus::NotRunning, None));
        };
        let mut guard = slot.lock().await;
        let Some(session) = guard.session.as_mut() else {
            return Ok(GameReply::new(GameReplyStatus::NotRunning, None));
        };

        let complete = match session.submit(player_id, value)? {
            SubmitOutcome::Recorded { complete } => complete,
            SubmitOutcome::AlreadySubmitted => {
                debug!(player_id = %player_id, "Duplicate submission ignored");
                return Ok(GameReply::new(GameReplyStatus::AlreadySubmitted, Some(&*session)));
            }
            SubmitOutcome::NotJoined => {
                return Ok(GameReply::new(GameReplyStatus::NotJoined, Some(&*session)));
            }
            SubmitOutcome::NotRunning => {
                return Ok(GameReply::new(GameReplyStatus::NotRunning, Some(&*session)));
            }
        };

        let name = session
            .player(player_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        info!(
            meeting_id = %meeting_id,
            game_id = %session.game_id,
            player_id = %player_id,
            value,
            "Game result recorded"
        );

        self.inner.publisher.publish(
            &DomainEvent::GamePlayerResult(GamePlayerResultEvent {
                meeting_id: meeting_id.clone(),
                game_id: session.game_id.clone(),
                player_id: player_id.clone(),
                name,
                value,
                submitted_count: session.submitted_count(),
                player_count: session.players.len(),
            }),
            origin,
        );

        if complete {
            self.finish_locked(&mut guard, FinishReason::Completed);
        }

        Ok(GameReply::new(GameReplyStatus::Recorded, guard.session.as_ref()))
    }

    /// Cancel timers and delete the session, whatever its state
    #[instrument(skip(self, actor), fields(reset_by = %actor.id))]
    pub async fn reset(&self, meeting_id: &MeetingId, actor: Actor) -> GameReply {
        let slot = self.slot(meeting_id);
        {
            let mut guard = slot.lock().await;
            guard.cancel_timer();
            let game_id = guard.session.take().map(|s| s.game_id);

            info!(
                meeting_id = %meeting_id,
                game_id = ?game_id,
                "Game reset"
            );

            self.inner.publisher.publish(
                &DomainEvent::GameReset(GameResetEvent {
                    meeting_id: meeting_id.clone(),
                    game_id,
                    reset_by: actor,
                }),
                None,
            );
        }
        drop(slot);
        self.release(meeting_id);

        GameReply::new(GameReplyStatus::Reset, None)
    }

    /// Snapshot of the meeting's session, if any
    pub async fn status(&self, meeting_id: &MeetingId) -> Option<GameSnapshot> {
        let slot = self.existing_slot(meeting_id)?;
        let guard = slot.lock().await;
        guard.session.clone().map(GameSnapshot::from)
    }

    /// Drop a disconnected connection's players from every running game
    ///
    /// A game left without players is discarded; a game whose remaining
    /// players have all submitted finishes.
    #[instrument(skip(self))]
    pub async fn handle_disconnect(&self, connection_id: ConnectionId) {
        let slots: Vec<(MeetingId, Arc<Mutex<GameSlot>>)> = self
            .inner
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        for (meeting_id, slot) in slots {
            let mut guard = slot.lock().await;
            let discarded = self.remove_connection_locked(&mut guard, &meeting_id, connection_id);
            drop(guard);
            if discarded {
                drop(slot);
                self.release(&meeting_id);
            }
        }
    }

    // ========================================================================
    // Locked transitions
    // ========================================================================

    /// Returns true when the session was discarded
    fn remove_connection_locked(
        &self,
        slot: &mut GameSlot,
        meeting_id: &MeetingId,
        connection_id: ConnectionId,
    ) -> bool {
        let Some(session) = slot.session.as_mut() else {
            return false;
        };
        if !session.is_running() {
            return false;
        }

        let removed = session.remove_connection(connection_id);
        if removed.is_empty() {
            return false;
        }

        info!(
            meeting_id = %meeting_id,
            game_id = %session.game_id,
            removed = ?removed,
            remaining = session.players.len(),
            "Players left game on disconnect"
        );
        self.publish_roster(session);

        if session.players.is_empty() {
            info!(meeting_id = %meeting_id, game_id = %session.game_id, "Empty game discarded");
            slot.cancel_timer();
            slot.session = None;
            return true;
        }

        if session.is_complete() {
            self.finish_locked(slot, FinishReason::Completed);
        }
        false
    }

    /// Stop the running session, broadcast the outcome and schedule the purge
    fn finish_locked(&self, slot: &mut GameSlot, reason: FinishReason) {
        slot.cancel_timer();
        let Some(session) = slot.session.as_mut() else {
            return;
        };

        let event = match session.finish() {
            GameOutcome::Ranked(ranking) => {
                info!(
                    meeting_id = %session.meeting_id,
                    game_id = %session.game_id,
                    reason = ?reason,
                    ranked = ranking.len(),
                    "Game finished"
                );
                DomainEvent::GameFinished(GameFinishedEvent {
                    meeting_id: session.meeting_id.clone(),
                    game_id: session.game_id.clone(),
                    kind: session.kind,
                    reason,
                    target_value: session.target_value,
                    ranking,
                })
            }
            GameOutcome::Cancelled => {
                info!(
                    meeting_id = %session.meeting_id,
                    game_id = %session.game_id,
                    reason = ?reason,
                    "Game cancelled, no results"
                );
                DomainEvent::GameCancelled(GameCancelledEvent {
                    meeting_id: session.meeting_id.clone(),
                    game_id: session.game_id.clone(),
                    reason,
                })
            }
        };
        self.inner.publisher.publish(&event, None);

        let purge = self.spawn_purge(session.meeting_id.clone(), session.epoch());
        slot.timer = Some(purge);
    }

    fn publish_roster(&self, session: &GameSession) {
        self.inner.publisher.publish(
            &DomainEvent::GamePlayersUpdated(GamePlayersUpdatedEvent {
                meeting_id: session.meeting_id.clone(),
                game_id: session.game_id.clone(),
                players: session.players.clone(),
            }),
            None,
        );
    }

    // ========================================================================
    // Timers
    // ========================================================================

    fn spawn_auto_end(
        &self,
        meeting_id: MeetingId,
        epoch: u64,
        deadline: chrono::DateTime<Utc>,
    ) -> JoinHandle<()> {
        let delay = (deadline - Utc::now()).to_std().unwrap_or_default();
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            manager.auto_end(&meeting_id, epoch).await;
        })
    }

    async fn auto_end(&self, meeting_id: &MeetingId, epoch: u64) {
        let Some(slot) = self.existing_slot(meeting_id) else {
            return;
        };
        let mut guard = slot.lock().await;

        let current = guard
            .session
            .as_ref()
            .is_some_and(|s| s.epoch() == epoch && s.is_running());
        if !current {
            trace!(meeting_id = %meeting_id, epoch, "Stale auto-end timer");
            return;
        }

        // Detach our own handle so finishing does not abort this task
        guard.timer = None;
        self.finish_locked(&mut guard, FinishReason::Timeout);
    }

    fn spawn_purge(&self, meeting_id: MeetingId, epoch: u64) -> JoinHandle<()> {
        let retention = self.inner.config.retention();
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            manager.purge(&meeting_id, epoch).await;
        })
    }

    async fn purge(&self, meeting_id: &MeetingId, epoch: u64) {
        let Some(slot) = self.existing_slot(meeting_id) else {
            return;
        };
        {
            let mut guard = slot.lock().await;
            let finished = guard
                .session
                .as_ref()
                .is_some_and(|s| s.epoch() == epoch && !s.is_running());
            if !finished {
                return;
            }
            guard.session = None;
            guard.timer = None;
            debug!(meeting_id = %meeting_id, "Finished game purged");
        }
        drop(slot);
        self.release(meeting_id);
    }

    // ========================================================================
    // Slots
    // ========================================================================

    fn slot(&self, meeting_id: &MeetingId) -> Arc<Mutex<GameSlot>> {
        self.inner
            .sessions
            .entry(meeting_id.clone())
            .or_default()
            .value()
            .clone()
    }

    fn existing_slot(&self, meeting_id: &MeetingId) -> Option<Arc<Mutex<GameSlot>>> {
        self.inner
            .sessions
            .get(meeting_id)
            .map(|entry| entry.value().clone())
    }

    /// Remove an empty slot nobody else is holding
    fn release(&self, meeting_id: &MeetingId) {
        self.inner.sessions.remove_if(meeting_id, |_, slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().is_ok_and(|guard| guard.session.is_none())
        });
    }
}

impl std::fmt::Debug for GameSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSessionManager")
            .field("sessions", &self.inner.sessions.len())
            .field("config", &self.inner.config)
            .finish()
    }
}
