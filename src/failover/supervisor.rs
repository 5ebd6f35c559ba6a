use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::logging::EventLog;

/// How often the standby probes the active instance.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);
/// A probe that cannot connect within this window counts as failed.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Decides when a standby instance takes over the active role.
///
/// The decision rule is a plain TCP connect probe against the active
/// instance's advertised endpoint on a fixed period. There is no automatic
/// demotion back to standby once takeover happens.
pub struct FailoverSupervisor {
    active_addr: SocketAddr,
    probe_interval: Duration,
    probe_timeout: Duration,
    log: Arc<dyn EventLog>,
}

impl FailoverSupervisor {
    pub fn new(active_addr: SocketAddr, log: Arc<dyn EventLog>) -> Self {
        Self::with_intervals(active_addr, log, PROBE_INTERVAL, PROBE_TIMEOUT)
    }

    /// Constructor with explicit timing, used by tests to avoid real waits.
    pub fn with_intervals(
        active_addr: SocketAddr,
        log: Arc<dyn EventLog>,
        probe_interval: Duration,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            active_addr,
            probe_interval,
            probe_timeout,
            log,
        }
    }

    /// One connect probe. `true` means the active instance (or at least its
    /// listening socket) answered in time.
    pub async fn probe(&self) -> bool {
        matches!(
            tokio::time::timeout(self.probe_timeout, TcpStream::connect(self.active_addr)).await,
            Ok(Ok(_))
        )
    }

    /// Probes on the fixed period and returns once the active instance stops
    /// answering. The caller then re-hydrates from the snapshot and starts
    /// its own listener; from that point this process is the active one.
    pub async fn wait_for_takeover(&self) {
        self.log.info(&format!(
            "standby: probing active coordinator at {}",
            self.active_addr
        ));

        loop {
            if !self.probe().await {
                // A failed probe could equally be a partition; there is no
                // fencing here, so dual-active is possible and logged as such.
                self.log.warn(&format!(
                    "active coordinator at {} unreachable, taking over (crash and partition are indistinguishable)",
                    self.active_addr
                ));
                return;
            }

            tokio::time::sleep(self.probe_interval).await;
        }
    }
}
