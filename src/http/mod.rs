//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, middleware chain)
//!     → middleware/ (logging → CORS → security headers)
//!     → server.rs dispatch_handler (routing decision)
//!     → api.rs | assets::AssetResolver | proxy::Forwarder
//!     → response.rs (shared error bodies)
//! ```

pub mod api;
pub mod middleware;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
