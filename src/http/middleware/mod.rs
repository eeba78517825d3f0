//! Middleware chain.
//!
//! # Data Flow
//! ```text
//! request  → Logging → CORS → Security → Dispatcher
//! response ← Logging ← CORS ← Security ← Dispatcher
//! ```
//!
//! # Design Decisions
//! - Order is fixed; configuration only switches optional layers on or off
//! - Security is always installed and sits closest to the dispatcher
//! - Logging is outermost so its latency covers every other layer
//! - Each layer calls the next at most once

pub mod cors;
pub mod logging;
pub mod security;

use axum::{middleware::from_fn, Router};

use crate::config::AppConfig;

pub use cors::cors_middleware;
pub use logging::request_log_layer;
pub use security::security_headers_middleware;

/// A response/request decorator in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Security,
    Cors,
    Logging,
}

impl Layer {
    /// Innermost first.
    pub const ORDER: [Layer; 3] = [Layer::Security, Layer::Cors, Layer::Logging];

    /// Name used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Security => "security",
            Layer::Cors => "cors",
            Layer::Logging => "logging",
        }
    }
}

/// Which layers are active, evaluated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareSpec {
    layers: Vec<(Layer, bool)>,
}

impl MiddlewareSpec {
    /// Create a spec with Security always on and the optional layers as given.
    pub fn new(cors: bool, logging: bool) -> Self {
        Self {
            layers: Layer::ORDER
                .iter()
                .map(|&layer| {
                    let enabled = match layer {
                        Layer::Security => true,
                        Layer::Cors => cors,
                        Layer::Logging => logging,
                    };
                    (layer, enabled)
                })
                .collect(),
        }
    }

    /// Read the CORS and request-logging switches from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.middleware.enable_cors, config.logging.enable_request_logging)
    }

    /// True when `layer` will be installed.
    pub fn is_enabled(&self, layer: Layer) -> bool {
        self.layers.iter().any(|&(l, enabled)| l == layer && enabled)
    }

    /// Enabled layers, innermost first.
    pub fn enabled(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.iter().filter(|(_, enabled)| *enabled).map(|&(layer, _)| layer)
    }

    /// Wrap `router` with the enabled layers.
    pub fn apply(&self, router: Router) -> Router {
        self.enabled().fold(router, |router, layer| {
            tracing::debug!(layer = layer.name(), "Installing middleware");
            match layer {
                Layer::Security => router.layer(from_fn(security_headers_middleware)),
                Layer::Cors => router.layer(from_fn(cors_middleware)),
                Layer::Logging => router.layer(request_log_layer()),
            }
        })
    }
}
