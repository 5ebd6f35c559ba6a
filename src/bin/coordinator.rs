use anyhow::Result;
use cluster_coordinator::failover::FailoverSupervisor;
use cluster_coordinator::logging::{EventLog, FileLog};
use cluster_coordinator::membership::detector::FailureDetector;
use cluster_coordinator::membership::store::MembershipStore;
use cluster_coordinator::persistence::SnapshotStore;
use cluster_coordinator::server::{run_listener, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Primary,
    Backup,
}

struct Options {
    role: Role,
    port: u16,
    snapshot_path: PathBuf,
    peer: Option<SocketAddr>,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [primary|backup] [--port N] [--snapshot PATH] [--peer ADDR:PORT]", program);
    eprintln!("Example: {} primary --port 5050", program);
    eprintln!("Example: {} backup --peer 10.0.0.5:5050", program);
    std::process::exit(1);
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut options = Options {
        role: Role::Primary,
        port: DEFAULT_PORT,
        snapshot_path: PathBuf::from("cluster_snapshot.json"),
        peer: None,
    };
    let mut role_seen = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                let Some(value) = args.get(i + 1) else { usage(&program) };
                let Ok(port) = value.parse() else { usage(&program) };
                options.port = port;
                i += 2;
            }
            "--snapshot" => {
                let Some(value) = args.get(i + 1) else { usage(&program) };
                options.snapshot_path = PathBuf::from(value);
                i += 2;
            }
            "--peer" => {
                let Some(value) = args.get(i + 1) else { usage(&program) };
                let Ok(addr) = value.parse() else { usage(&program) };
                options.peer = Some(addr);
                i += 2;
            }
            "primary" if !role_seen => {
                options.role = Role::Primary;
                role_seen = true;
                i += 1;
            }
            "backup" if !role_seen => {
                options.role = Role::Backup;
                role_seen = true;
                i += 1;
            }
            _ => usage(&program),
        }
    }

    options
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let options = parse_options();

    let log: Arc<dyn EventLog> = Arc::new(FileLog::open("coordinator.log")?);
    let store = Arc::new(MembershipStore::new());
    let snapshots = Arc::new(SnapshotStore::new(options.snapshot_path));

    // A backup does nothing until the active instance stops answering.
    if options.role == Role::Backup {
        let peer = options
            .peer
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], options.port)));
        FailoverSupervisor::new(peer, log.clone())
            .wait_for_takeover()
            .await;
    }

    // Re-hydrate before accepting: workers reconnecting after a restart see
    // their old records. A broken snapshot costs the persisted view, not the
    // process.
    match snapshots.load() {
        Ok(records) => {
            if !records.is_empty() {
                log.info(&format!(
                    "restored {} node records from {}",
                    records.len(),
                    snapshots.path().display()
                ));
            }
            store.hydrate(records);
        }
        Err(err) => {
            log.warn(&format!("{}; starting with an empty table", err));
        }
    }

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], options.port));
    let listener = TcpListener::bind(bind_addr).await?;
    log.info(&format!("coordinator listening on {}", bind_addr));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let detector = Arc::new(FailureDetector::new(
        store.clone(),
        snapshots.clone(),
        log.clone(),
    ));
    let detector_handle = tokio::spawn(detector.run(shutdown_rx.clone()));

    tokio::select! {
        _ = run_listener(
            listener,
            store.clone(),
            log.clone(),
            DEFAULT_MAX_CONNECTIONS,
            shutdown_rx,
        ) => {}
        _ = tokio::signal::ctrl_c() => {
            log.info("shutdown signal received");
        }
    }

    // Bounded shutdown: the listener is already gone (select dropped it),
    // so stop the detector, then flush one last snapshot.
    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(Duration::from_secs(2), detector_handle)
        .await
        .is_err()
    {
        tracing::debug!("failure detector did not stop within the grace period");
    }

    if let Err(err) = snapshots.save(&store.snapshot()) {
        log.warn(&format!("final snapshot flush failed: {}", err));
    }

    log.info("coordinator stopped");
    Ok(())
}
