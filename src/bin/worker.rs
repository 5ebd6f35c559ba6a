use anyhow::Result;
use cluster_coordinator::logging::{EventLog, FileLog};
use cluster_coordinator::server::DEFAULT_PORT;
use cluster_coordinator::worker::WorkerClient;
use std::net::SocketAddr;
use std::sync::Arc;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <node_id> [--coordinator ADDR:PORT]", program);
    eprintln!("Example: {} worker-1 --coordinator 10.0.0.5:5050", program);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut node_id: Option<String> = None;
    let mut coordinator_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--coordinator" => {
                let Some(value) = args.get(i + 1) else { usage(&program) };
                let Ok(addr) = value.parse() else { usage(&program) };
                coordinator_addr = addr;
                i += 2;
            }
            value if node_id.is_none() && !value.starts_with("--") => {
                node_id = Some(value.to_string());
                i += 1;
            }
            _ => usage(&program),
        }
    }

    let Some(node_id) = node_id else { usage(&program) };

    let log: Arc<dyn EventLog> = Arc::new(FileLog::open("worker.log")?);
    let client = WorkerClient::new(node_id, coordinator_addr, log.clone());

    tokio::select! {
        _ = client.run() => {}
        _ = tokio::signal::ctrl_c() => {
            log.info("worker stopped");
        }
    }

    Ok(())
}
