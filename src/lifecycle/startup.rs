//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from validated configuration
//! - Bind the listener only after construction succeeded
//! - Run until a signal triggers shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before a socket opens
//! - Listeners start last (traffic only when ready)

use thiserror::Error;

use crate::config::{ConfigError, ConfigSource, LoadedConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{Listener, ListenerError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Build, bind and serve until SIGINT/SIGTERM.
pub async fn run(loaded: LoadedConfig) -> Result<(), StartupError> {
    match &loaded.source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Configuration loaded");
        }
        ConfigSource::Defaults => {
            tracing::info!("Config file not found, using default configuration");
        }
    }

    let config = loaded.config;
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        static_directory = %config.static_files.directory,
        upstream = %config.proxy.upstream,
        cors = config.middleware.enable_cors,
        request_logging = config.logging.enable_request_logging,
        "Starting FeatherJet"
    );

    let server = HttpServer::new(config)?;
    let listener = Listener::bind(&server.config().listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;
    Ok(())
}
