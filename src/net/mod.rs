//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (per-connection task, peer address, draining)
//!     → Hand off to the composed axum Router
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each connection tracked for graceful shutdown
//! - Connections still open after the grace period are aborted

pub mod connection;
pub mod listener;

pub use connection::{ConnectionId, ConnectionSet, ConnectionSettings};
pub use listener::{Accepted, ConnectionPermit, Listener, ListenerError};
