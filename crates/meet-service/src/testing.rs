//! Shared fixtures for service tests

use parking_lot::Mutex;
use std::sync::Arc;

use meet_common::GameConfig;
use meet_core::{ConnectionId, DomainEvent, EventPublisher, MeetingId, UserId};

use crate::services::{ConsensusService, ServiceContext, ServiceContextBuilder};

/// Publisher that keeps every event it is handed
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(DomainEvent, Option<ConnectionId>)>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<(DomainEvent, Option<ConnectionId>)> {
        self.events.lock().clone()
    }

    pub fn types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|(e, _)| e.event_type()).collect()
    }

    /// The most recent event of a type
    pub fn last(&self, event_type: &str) -> Option<DomainEvent> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|(e, _)| e.event_type() == event_type)
            .map(|(e, _)| e.clone())
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: &DomainEvent, exclude: Option<ConnectionId>) -> usize {
        self.events.lock().push((event.clone(), exclude));
        1
    }
}

pub fn context() -> (ServiceContext, Arc<RecordingPublisher>) {
    context_with(GameConfig::default())
}

pub fn context_with(games: GameConfig) -> (ServiceContext, Arc<RecordingPublisher>) {
    let publisher = Arc::new(RecordingPublisher::default());
    let ctx = ServiceContextBuilder::new()
        .in_memory()
        .publisher(publisher.clone())
        .game_config(games)
        .build()
        .unwrap();
    (ctx, publisher)
}

/// Context with meeting `m1` organized by `org`
pub async fn context_with_meeting() -> (ServiceContext, Arc<RecordingPublisher>) {
    let (ctx, publisher) = context();
    ConsensusService::new(&ctx)
        .register_meeting(MeetingId::new("m1"), UserId::new("org"))
        .await
        .unwrap();
    (ctx, publisher)
}
