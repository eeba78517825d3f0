//! FeatherJet (v0.1)
//!
//! Static assets, JSON API handlers and a reverse-proxied task service
//! behind a single listener, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────────┐
//!                     │                        FEATHERJET                        │
//!                     │                                                          │
//!   Client Request    │  ┌─────────┐   ┌──────────────────────────────────────┐  │
//!   ──────────────────┼─▶│   net   │──▶│ middleware: logging → cors → security │  │
//!                     │  │listener │   └──────────────────┬───────────────────┘  │
//!                     │  └─────────┘                      ▼                      │
//!                     │                          ┌────────────────┐              │
//!                     │                          │    routing     │              │
//!                     │                          │   dispatcher   │              │
//!                     │                          └───┬────┬────┬──┘              │
//!                     │                 ┌────────────┘    │    └──────────┐      │
//!                     │                 ▼                 ▼               ▼      │
//!                     │          ┌────────────┐   ┌────────────┐   ┌──────────┐  │
//!                     │          │  http::api │   │   assets   │   │  proxy   │──┼──▶ Upstream
//!                     │          │    JSON    │   │  ServeDir  │   │forwarder │  │
//!                     │          └────────────┘   └────────────┘   └──────────┘  │
//!                     │                                                          │
//!                     │   config · lifecycle (signals, drain) · observability    │
//!                     └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use featherjet::config::load_config;
use featherjet::lifecycle::startup;
use featherjet::observability::logging;

#[derive(Parser)]
#[command(name = "featherjet")]
#[command(about = "Static assets, JSON API and task-service proxy on one port", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config)?;
    logging::init(&loaded.config.logging.level);

    tracing::info!("featherjet v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(loaded).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
