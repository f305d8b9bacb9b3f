//! Catan host binary
//!
//! Reads one JSON request per stdin line and writes one JSON response per line
//! to stdout. Logs go to stderr.

use catan_host::{handle_line, FileStore, GameHost, HostConfig, MemoryStore, SnapshotStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HostConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Catan host...");

    let store: Arc<dyn SnapshotStore> = match &config.snapshot_dir {
        Some(dir) => {
            info!("Storing snapshots in {}", dir.display());
            Arc::new(FileStore::open(dir.clone()).await?)
        }
        None => {
            info!("Storing snapshots in memory");
            Arc::new(MemoryStore::new())
        }
    };
    if let Some(seed) = config.seed {
        info!("Deterministic RNG seeded with {}", seed);
    }
    let host = GameHost::new(store, config.seed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&host, &line).await;
        let mut json = serde_json::to_string(&response)?;
        json.push('\n');
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
