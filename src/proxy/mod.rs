//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Request claimed by a proxy route
//!     → forwarder.rs (rewrite authority + Host, X-Forwarded-*)
//!     → hyper-util client (single fixed upstream from target.rs)
//!     → upstream response streamed back unchanged
//!        (or 502 when the upstream cannot be reached)
//! ```

pub mod forwarder;
pub mod target;

pub use forwarder::{ForwardError, Forwarder};
pub use target::{ProxyTarget, TargetError};
