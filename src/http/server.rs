//! The composed handler graph and its accept loop.
//!
//! # Responsibilities
//! - Build the immutable handler graph (route table, resolver, forwarder)
//! - Wire up middleware (security headers, CORS, request logging)
//! - Dispatch requests to exactly one handler
//! - Run the accept loop and the graceful shutdown sequence

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use tokio::sync::broadcast;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::assets::AssetResolver;
use crate::config::{validate_config, AppConfig, ConfigError, ValidationError};
use crate::http::api::{self, ServerInfo};
use crate::http::middleware::MiddlewareSpec;
use crate::http::response::api_not_found;
use crate::net::{connection, Listener, ListenerError};
use crate::proxy::{Forwarder, ProxyTarget};
use crate::routing::{Dispatcher, Handler};

/// Delay before accepting again after an accept error.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub assets: Arc<AssetResolver>,
    pub forwarder: Arc<Forwarder>,
    pub info: Arc<ServerInfo>,
}

/// HTTP server for the asset / API / proxy router.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Build every handler once from `config`, which is validated again here.
    /// No server value exists for an invalid configuration.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let target = ProxyTarget::parse(&config.proxy.upstream).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstream {
                url: config.proxy.upstream.clone(),
                reason: e.to_string(),
            }])
        })?;

        let state = AppState {
            dispatcher: Arc::new(Dispatcher::default()),
            assets: Arc::new(AssetResolver::new(&config.static_files)),
            forwarder: Arc::new(Forwarder::new(target)),
            info: Arc::new(ServerInfo::from_config(&config)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Catch-all dispatch route, its timeouts, then the middleware chain around both.
    ///
    /// A response not ready within the write timeout becomes
    /// `504 Gateway Timeout`; the only handler that can stall that long is
    /// the upstream round trip.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let dispatch = Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                config.listener.write_timeout(),
            ))
            .layer(RequestBodyTimeoutLayer::new(config.listener.read_timeout()));

        MiddlewareSpec::from_config(config).apply(dispatch)
    }

    /// The composed handler graph, usable without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the validated configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight
    /// connections for at most the configured grace period.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(address = %addr, "HTTP server starting");

        let settings = connection::ConnectionSettings::from_config(&self.config.listener);
        let mut connections = connection::ConnectionSet::new(settings);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok(accepted) => connections.serve(accepted, self.router.clone()),
                        Err(ListenerError::Closed) => break,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                            if back_off_after_accept_error(&mut shutdown).await {
                                tracing::info!("Shutdown signal received, no longer accepting connections");
                                break;
                            }
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);
        connections.drain(self.config.listener.shutdown_grace()).await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Pause after a failed accept (e.g. descriptor exhaustion) so the loop
/// does not spin. Returns `true` if shutdown was requested meanwhile.
async fn back_off_after_accept_error(shutdown: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        () = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => false,
        _ = shutdown.recv() => true,
    }
}

/// Single entry point behind the middleware chain.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let handler = state.dispatcher.dispatch(request.method(), request.uri().path());

    match handler {
        Handler::Api(endpoint) => {
            let (parts, _body) = request.into_parts();
            api::handle(endpoint, &state.info, &parts.method, parts.uri.path()).await
        }
        Handler::Proxy => state.forwarder.forward(request).await,
        Handler::Static => state.assets.resolve(request).await,
        Handler::NotFound => {
            tracing::debug!(method = %request.method(), path = %request.uri().path(), "No API route matched");
            api_not_found(request.uri().path())
        }
    }
}
