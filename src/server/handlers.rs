use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};

use super::protocol::{parse_line, Command};
use crate::logging::EventLog;
use crate::membership::store::MembershipStore;

/// The coordinator's advertised listening port.
pub const DEFAULT_PORT: u16 = 5050;
/// Upper bound on concurrently served connections; accepts past this limit
/// are rejected with a warning instead of spawning without bound.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

/// Serves one accepted connection until end-of-stream or a read error.
///
/// Bytes are buffered to newline boundaries so adjacent commands arriving in
/// one segment never merge. The handler applies no idle timeout of its own:
/// a worker that goes silent keeps its socket, and only the failure detector
/// reclassifies it.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    store: Arc<MembershipStore>,
    log: Arc<dyn EventLog>,
) {
    let mut lines = BufReader::new(stream).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_line(trimmed) {
                    Some(Command::Register(id)) => {
                        store.register(&id);
                        log.info(&format!("node registered: {}", id));
                    }
                    Some(Command::Heartbeat(id)) => {
                        store.heartbeat(&id);
                        tracing::debug!("heartbeat from {}", id);
                    }
                    None => {
                        log.warn(&format!("unrecognized message from {}: {:?}", peer, trimmed));
                    }
                }
            }
            // Transport faults are local to this connection.
            Ok(None) => break,
            Err(err) => {
                tracing::debug!("read error on connection from {}: {}", peer, err);
                break;
            }
        }
    }

    tracing::debug!("connection from {} closed", peer);
}

/// The accept loop. One handler task per connection, bounded by a semaphore;
/// when the limit is reached new connections are closed with a warning. The
/// loop returns (and stops accepting) once the shutdown signal flips, without
/// tearing down in-flight handlers.
pub async fn run_listener(
    listener: TcpListener,
    store: Arc<MembershipStore>,
    log: Arc<dyn EventLog>,
    max_connections: usize,
    mut shutdown: watch::Receiver<bool>,
) {
    let permits = Arc::new(Semaphore::new(max_connections));

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let permit = match permits.clone().try_acquire_owned() {
                            Ok(permit) => permit,
                            Err(_) => {
                                log.warn(&format!(
                                    "connection limit ({}) reached, rejecting {}",
                                    max_connections, peer
                                ));
                                continue;
                            }
                        };

                        let store = store.clone();
                        let log = log.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, store, log).await;
                            drop(permit);
                        });
                    }
                    Err(err) => {
                        // Accept errors are usually transient (fd pressure);
                        // back off briefly instead of spinning.
                        log.warn(&format!("accept failed: {}", err));
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    log.info("listener stopped accepting connections");
}
