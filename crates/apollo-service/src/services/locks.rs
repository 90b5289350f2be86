//! Per-counter async locks
//!
//! A toggle mutates a relation and then rewrites the counter from a full
//! count. Two toggles on the same event by different users could otherwise
//! write their counts in the opposite order of the mutations, leaving a stale
//! value until the next toggle or reconcile run. Holding the counter's lock
//! across mutate-count-write keeps writes in mutation order within a process.

use std::sync::Arc;

use apollo_core::{EntityId, RelationKind};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct CounterLocks {
    locks: DashMap<(RelationKind, EntityId), Arc<Mutex<()>>>,
}

impl CounterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one (kind, event) counter
    pub async fn acquire(&self, kind: RelationKind, object_id: EntityId) -> OwnedMutexGuard<()> {
        // clone out of the map so the shard guard is released before awaiting
        let lock = self
            .locks
            .entry((kind, object_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock of a deleted event
    pub fn forget(&self, object_id: EntityId) {
        self.locks.retain(|(_, id), lock| *id != object_id || Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
