//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (Dispatcher: route lookup + API namespace guard)
//!     → matcher.rs (evaluate exact / prefix patterns)
//!     → Return: Handler::{Api, Proxy, Static, NotFound}
//!
//! Route Compilation (at startup):
//!     Route[]
//!     → Sort by specificity (exact first, then longest prefix)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Handler kinds are a closed enum, matched exhaustively

pub mod matcher;
pub mod router;

pub use matcher::{MatchKind, Pattern};
pub use router::{is_api_path, ApiEndpoint, Dispatcher, Handler, Route, RouteTable, Target, API_PREFIX};
