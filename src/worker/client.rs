use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::logging::EventLog;

/// How often a connected worker sends a heartbeat.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);
/// Fixed backoff between reconnect attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Keepalive probing starts after this much idle time, so half-open
/// connections surface at the transport instead of waiting out the
/// coordinator's detector.
const KEEPALIVE_IDLE: Duration = Duration::from_secs(30);

/// Maintains the worker's outbound connection to the coordinator.
///
/// Protocol per connection: one `REGISTER <id>` line, then `HEARTBEAT <id>`
/// lines on the fixed period. Any send failure drops the connection and
/// re-enters the connect-with-retry loop; the client never gives up.
pub struct WorkerClient {
    node_id: String,
    coordinator_addr: SocketAddr,
    heartbeat_interval: Duration,
    retry_interval: Duration,
    log: Arc<dyn EventLog>,
}

impl WorkerClient {
    pub fn new(
        node_id: impl Into<String>,
        coordinator_addr: SocketAddr,
        log: Arc<dyn EventLog>,
    ) -> Self {
        Self::with_intervals(
            node_id,
            coordinator_addr,
            log,
            HEARTBEAT_INTERVAL,
            RETRY_INTERVAL,
        )
    }

    /// Constructor with explicit timing, used by tests to avoid real waits.
    pub fn with_intervals(
        node_id: impl Into<String>,
        coordinator_addr: SocketAddr,
        log: Arc<dyn EventLog>,
        heartbeat_interval: Duration,
        retry_interval: Duration,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            coordinator_addr,
            heartbeat_interval,
            retry_interval,
            log,
        }
    }

    /// Runs the register/heartbeat loop forever. The backoff sleep and the
    /// heartbeat sleep are this task's only suspension points besides the
    /// socket writes themselves.
    pub async fn run(&self) {
        loop {
            let mut stream = self.connect_with_retry().await;
            self.log.info(&format!(
                "connected to coordinator at {}, node id: {}",
                self.coordinator_addr, self.node_id
            ));

            let register = format!("REGISTER {}\n", self.node_id);
            if let Err(err) = stream.write_all(register.as_bytes()).await {
                self.log
                    .warn(&format!("failed to register, reconnecting: {}", err));
                continue;
            }

            loop {
                tokio::time::sleep(self.heartbeat_interval).await;

                let heartbeat = format!("HEARTBEAT {}\n", self.node_id);
                if let Err(err) = stream.write_all(heartbeat.as_bytes()).await {
                    self.log.warn(&format!(
                        "lost connection to coordinator ({}), reconnecting",
                        err
                    ));
                    break;
                }

                self.log.info(&format!("heartbeat sent from {}", self.node_id));
            }
        }
    }

    /// Retries connecting on the fixed backoff until the coordinator
    /// answers. Never returns an error: unreachability is always transient
    /// from the worker's point of view.
    async fn connect_with_retry(&self) -> TcpStream {
        loop {
            match TcpStream::connect(self.coordinator_addr).await {
                Ok(stream) => {
                    if let Err(err) = configure_transport(&stream) {
                        tracing::debug!("could not set socket options: {}", err);
                    }
                    return stream;
                }
                Err(err) => {
                    self.log.warn(&format!(
                        "coordinator at {} unavailable ({}), retrying in {:?}",
                        self.coordinator_addr, err, self.retry_interval
                    ));
                    tokio::time::sleep(self.retry_interval).await;
                }
            }
        }
    }
}

/// Disables Nagle and turns on TCP keepalive so a half-open connection is
/// detected at the transport rather than only by the coordinator's timeout.
fn configure_transport(stream: &TcpStream) -> io::Result<()> {
    stream.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(KEEPALIVE_IDLE);
    socket2::SockRef::from(stream).set_tcp_keepalive(&keepalive)?;

    Ok(())
}
