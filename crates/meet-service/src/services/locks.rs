//! Per-meeting write locks
//!
//! Mutations on one meeting serialize; different meetings never contend.
//! Network calls to external providers must happen before [`MeetingLocks::lock`].

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use meet_core::MeetingId;

type LockMap = DashMap<MeetingId, Arc<Mutex<()>>>;

/// Registry of one async mutex per meeting id
///
/// An entry lives only while a guard holds it or a task waits on it, so
/// the registry stays as small as the set of meetings being written.
#[derive(Debug, Clone, Default)]
pub struct MeetingLocks {
    locks: Arc<LockMap>,
}

/// Exclusive write access to one meeting; releases its registry entry on drop
#[derive(Debug)]
pub struct MeetingGuard {
    guard: Option<OwnedMutexGuard<()>>,
    meeting_id: MeetingId,
    locks: Arc<LockMap>,
}

impl MeetingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to a meeting
    pub async fn lock(&self, meeting_id: &MeetingId) -> MeetingGuard {
        // Clone the Arc out so the shard lock is released before awaiting
        let mutex = self
            .locks
            .entry(meeting_id.clone())
            .or_default()
            .value()
            .clone();
        MeetingGuard {
            guard: Some(mutex.lock_owned().await),
            meeting_id: meeting_id.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for MeetingGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold their own clone, so a count of one means nobody is queued.
        // Clones are taken under the shard lock, which remove_if also holds.
        self.locks
            .remove_if(&self.meeting_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
