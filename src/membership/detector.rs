use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::store::MembershipStore;
use super::types::{now_secs, NodeId};
use crate::logging::EventLog;
use crate::persistence::SnapshotStore;

/// How often the detector scans the table.
pub const DETECTOR_TICK: Duration = Duration::from_secs(2);
/// Silence longer than this (strictly) demotes an active node to failed.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(11);
/// Cluster state is displayed and persisted at least this often, even when
/// nothing changed.
pub const DISPLAY_INTERVAL: Duration = Duration::from_secs(10);

/// Periodic task that demotes silent nodes and drives the display/persist
/// cycle.
///
/// Detection is purely receiver-side: the detector never contacts nodes and
/// never removes records. It marks an active node `Failed` once its
/// `last_seen` falls more than the timeout behind the current tick, warns
/// once per transition, and persists a fresh snapshot after any tick that
/// changed something (or unconditionally on the display interval).
pub struct FailureDetector {
    store: Arc<MembershipStore>,
    snapshots: Arc<SnapshotStore>,
    log: Arc<dyn EventLog>,
    tick_interval: Duration,
    timeout: Duration,
    display_interval: Duration,
}

impl FailureDetector {
    pub fn new(
        store: Arc<MembershipStore>,
        snapshots: Arc<SnapshotStore>,
        log: Arc<dyn EventLog>,
    ) -> Self {
        Self::with_intervals(
            store,
            snapshots,
            log,
            DETECTOR_TICK,
            HEARTBEAT_TIMEOUT,
            DISPLAY_INTERVAL,
        )
    }

    /// Constructor with explicit timing, used by tests to avoid real waits.
    pub fn with_intervals(
        store: Arc<MembershipStore>,
        snapshots: Arc<SnapshotStore>,
        log: Arc<dyn EventLog>,
        tick_interval: Duration,
        timeout: Duration,
        display_interval: Duration,
    ) -> Self {
        Self {
            store,
            snapshots,
            log,
            tick_interval,
            timeout,
            display_interval,
        }
    }

    /// Runs until the shutdown signal flips (or its sender goes away). The
    /// sleep between ticks is the only suspension point in this task.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        let mut last_display = tokio::time::Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let failed = self.tick(now_secs());
            let display_due = last_display.elapsed() >= self.display_interval;

            if !failed.is_empty() || display_due {
                self.display_and_persist();
                last_display = tokio::time::Instant::now();
            }
        }

        tracing::debug!("failure detector stopped");
    }

    /// One detection pass at the given wall-clock time. Returns the ids that
    /// transitioned to failed on this pass; each is warned about exactly
    /// once because the sweep skips already-failed records.
    pub fn tick(&self, now: u64) -> Vec<NodeId> {
        let failed = self.store.fail_expired(now, self.timeout);
        for id in &failed {
            self.log
                .warn(&format!("node {} failed (no heartbeat)", id));
        }
        failed
    }

    /// Renders the cluster state through the event log and writes the
    /// snapshot file. Works from a copied snapshot so no I/O happens under
    /// the store's lock. A failed write is an operator warning, not a fault.
    pub fn display_and_persist(&self) {
        let records = self.store.snapshot();

        let mut entries: Vec<_> = records.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        self.log.info("=== cluster state ===");
        for (id, record) in entries {
            self.log.info(&format!(
                "{} | {} | last seen {}",
                id, record.status, record.last_seen
            ));
        }

        if let Err(err) = self.snapshots.save(&records) {
            self.log.warn(&format!("snapshot not persisted: {}", err));
        }
    }
}
