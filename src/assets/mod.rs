//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Non-API request path
//!     → resolver.rs (API guard, normalize, reject escapes)
//!     → ServeDir (file / directory index, content type)
//!     → Cache-Control decoration on success
//! ```

pub mod resolver;

pub use resolver::{normalize_path, AssetResolver, NormalizedPath};
