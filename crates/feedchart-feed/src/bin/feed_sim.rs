//! Simulated counting device for running the dashboard without hardware.

use std::time::Duration;

use clap::Parser;
use feedchart_feed::sim::{self, SimConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Serve device-style frames over WebSocket
#[derive(Parser, Debug)]
#[command(name = "feed_sim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Milliseconds between simulated detections
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Close each connection after this many detections (exercises reconnect)
    #[arg(long)]
    detections: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let listener = TcpListener::bind(&cli.listen).await?;
    let config = SimConfig {
        interval: Duration::from_millis(cli.interval_ms.max(1)),
        detections_per_connection: cli.detections,
    };
    sim::serve(listener, config).await
}
