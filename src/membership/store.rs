use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::types::{now_secs, NodeId, NodeRecord, NodeStatus};

/// The shared membership table: node id -> liveness record.
///
/// All synchronization lives inside this type. Callers never see the map or
/// the lock, only the operations below, so the invariants (unique ids,
/// detector-only `Active -> Failed`, no removal) are enforced in one place.
/// No operation performs I/O while holding the lock; `snapshot` exists so
/// display and persistence work from a copy instead.
pub struct MembershipStore {
    nodes: Mutex<HashMap<NodeId, NodeRecord>>,
}

impl Default for MembershipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipStore {
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(HashMap::new()),
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<NodeId, NodeRecord>> {
        // Mutations are plain field assignments, so a panicked holder cannot
        // leave the map half-updated. Recover the guard instead of poisoning
        // the whole coordinator.
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or overwrites the record for `node_id` as freshly active.
    /// Idempotent; re-registering a failed node revives it.
    pub fn register(&self, node_id: &str) {
        let id = NodeId::new(node_id);
        self.table().insert(id, NodeRecord::active_at(now_secs()));
    }

    /// Refreshes `last_seen` and forces the node active. An unknown node id
    /// is treated as an implicit register: workers that reconnect after a
    /// coordinator restart must not be dropped on the floor.
    pub fn heartbeat(&self, node_id: &str) {
        let id = NodeId::new(node_id);
        self.table().insert(id, NodeRecord::active_at(now_secs()));
    }

    /// Transitions a node to `Failed`, returning whether a transition
    /// happened. Used only by the failure detector; missing or
    /// already-failed nodes are a no-op.
    pub fn mark_failed(&self, node_id: &str) -> bool {
        let id = NodeId::new(node_id);
        match self.table().get_mut(&id) {
            Some(record) if record.status == NodeStatus::Active => {
                record.status = NodeStatus::Failed;
                true
            }
            _ => false,
        }
    }

    /// The detector's sweep: under a single lock acquisition, transitions
    /// every active node whose `last_seen` is strictly older than `timeout`
    /// to `Failed` and returns their ids. Scanning and marking together
    /// keeps a heartbeat that races the sweep from being overwritten.
    ///
    /// The comparison is strict: a node exactly at the timeout boundary
    /// stays active until the next tick. Already-failed nodes are skipped,
    /// so a node fails (and is reported) at most once per silence.
    pub fn fail_expired(&self, now: u64, timeout: Duration) -> Vec<NodeId> {
        let timeout = timeout.as_secs();
        let mut failed = Vec::new();

        let mut table = self.table();
        for (id, record) in table.iter_mut() {
            if record.status == NodeStatus::Active && now.saturating_sub(record.last_seen) > timeout
            {
                record.status = NodeStatus::Failed;
                failed.push(id.clone());
            }
        }

        failed
    }

    /// Bulk-inserts records exactly as given, persisted status included.
    /// Used to re-hydrate from a snapshot at startup or failover takeover;
    /// stale-but-active entries are left for the detector to re-evaluate.
    pub fn hydrate(&self, records: HashMap<NodeId, NodeRecord>) {
        let mut table = self.table();
        for (id, record) in records {
            table.insert(id, record);
        }
    }

    /// A consistent point-in-time copy of the whole table, taken under the
    /// lock. Display and snapshot persistence work from this copy.
    pub fn snapshot(&self) -> HashMap<NodeId, NodeRecord> {
        self.table().clone()
    }

    pub fn get(&self, node_id: &str) -> Option<NodeRecord> {
        self.table().get(&NodeId::new(node_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}
