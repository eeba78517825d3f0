//! FeatherJet: a small HTTP router combining static assets, JSON handlers
//! and a reverse-proxied task service behind one listener.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Handlers
pub mod assets;
pub mod proxy;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
