//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response (every path):
//!     → headers.rs (nosniff, frame denial, XSS hint)
//!
//! Proxied request / response:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//! ```
//!
//! # Design Decisions
//! - Security headers are not feature-gated
//! - Static path normalization lives with the asset resolver; the API
//!   namespace is reserved at the routing layer

pub mod headers;
