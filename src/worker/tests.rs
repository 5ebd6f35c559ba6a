//! Worker Client Tests
//!
//! Validates the register/heartbeat protocol sequence and the reconnect
//! behavior against real local listeners.
//!
//! ## Test Scopes
//! - **Protocol Order**: exactly one REGISTER precedes the heartbeats of
//!   every connection.
//! - **Resilience**: the client retries until the coordinator appears and
//!   re-registers after losing an established connection.

#[cfg(test)]
mod tests {
    use crate::logging::test_support::MemoryLog;
    use crate::worker::WorkerClient;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    fn spawn_client(node_id: &str, addr: SocketAddr) -> tokio::task::JoinHandle<()> {
        let client = WorkerClient::with_intervals(
            node_id,
            addr,
            Arc::new(MemoryLog::default()),
            Duration::from_millis(30),
            Duration::from_millis(50),
        );
        tokio::spawn(async move { client.run().await })
    }

    async fn read_line(lines: &mut tokio::io::Lines<BufReader<TcpStream>>) -> String {
        tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .expect("client should send within the timeout")
            .unwrap()
            .expect("connection should stay open")
    }

    #[tokio::test]
    async fn test_register_once_then_heartbeats() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = spawn_client("worker-1", addr);

        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();

        assert_eq!(read_line(&mut lines).await, "REGISTER worker-1");
        assert_eq!(read_line(&mut lines).await, "HEARTBEAT worker-1");
        assert_eq!(read_line(&mut lines).await, "HEARTBEAT worker-1");

        client.abort();
    }

    #[tokio::test]
    async fn test_client_retries_until_coordinator_is_reachable() {
        // Reserve a port, then leave it closed while the client starts.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let client = spawn_client("worker-2", addr);

        // Let a few connect attempts fail before the coordinator appears.
        tokio::time::sleep(Duration::from_millis(150)).await;
        let listener = TcpListener::bind(addr).await.unwrap();

        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        assert_eq!(read_line(&mut lines).await, "REGISTER worker-2");

        client.abort();
    }

    #[tokio::test]
    async fn test_client_reregisters_after_connection_loss() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = spawn_client("worker-3", addr);

        // First connection: consume the register, then kill the socket.
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        assert_eq!(read_line(&mut lines).await, "REGISTER worker-3");
        drop(lines);

        // The client notices on a failed heartbeat write and reconnects;
        // the new connection must start with a fresh REGISTER.
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        assert_eq!(read_line(&mut lines).await, "REGISTER worker-3");
        assert_eq!(read_line(&mut lines).await, "HEARTBEAT worker-3");

        client.abort();
    }
}
