//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (startup, routing misses, upstream failures)
//!     → http::middleware::logging (per-request method, path, status, latency)
//!
//! Consumer:
//!     → logging.rs (fmt subscriber on stdout)
//! ```

pub mod logging;
