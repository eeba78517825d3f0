//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the most specific route for a path
//! - Reserve the API namespace so unclaimed API paths never reach the filesystem
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exact routes beat prefix routes; longer prefixes beat shorter ones
//! - Explicit NotFound rather than silent fallthrough inside `/api`

use axum::http::Method;

use crate::routing::matcher::Pattern;

/// Reserved namespace for JSON handlers and the proxied service.
pub const API_PREFIX: &str = "/api";

/// Returns true if `path` belongs to the reserved API namespace.
///
/// This is a byte prefix check, so `/apiary` is reserved as well.
pub fn is_api_path(path: &str) -> bool {
    path.starts_with(API_PREFIX)
}

/// Built-in JSON endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    Hello,
    Status,
    Info,
}

/// Handler category a route points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Api(ApiEndpoint),
    Proxy,
    Static,
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: Pattern,
    pub target: Target,
}

impl Route {
    /// Create a route sending `pattern` matches to `target`.
    pub fn new(pattern: Pattern, target: Target) -> Self {
        Self { pattern, target }
    }
}

/// Ordered, immutable collection of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile a route table. Routes are ranked once here so lookup is a
    /// first-match scan.
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));
        Self { routes }
    }

    /// The server's route set: JSON endpoints, the proxied task service and
    /// the static catch-all.
    pub fn standard() -> Self {
        Self::new(vec![
            Route::new(Pattern::exact("/api/hello"), Target::Api(ApiEndpoint::Hello)),
            Route::new(Pattern::exact("/api/status"), Target::Api(ApiEndpoint::Status)),
            Route::new(Pattern::exact("/api/info"), Target::Api(ApiEndpoint::Info)),
            Route::new(Pattern::exact("/api/tasks"), Target::Proxy),
            Route::new(Pattern::prefix("/api/tasks/"), Target::Proxy),
            Route::new(Pattern::prefix("/"), Target::Static),
        ])
    }

    /// Find the most specific route claiming `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.pattern.matches(path))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route is registered; every path then dispatches by namespace alone.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Outcome of a dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Api(ApiEndpoint),
    Proxy,
    Static,
    /// A path inside the API namespace that no handler claims.
    NotFound,
}

/// Maps request paths to exactly one handler.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: RouteTable,
}

impl Dispatcher {
    /// Create a dispatcher over a compiled route table.
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    /// Decide which handler serves `path`. Routes accept every method, so
    /// `method` only shows up in the trace event.
    pub fn dispatch(&self, method: &Method, path: &str) -> Handler {
        let handler = match self.routes.lookup(path).map(|route| route.target) {
            Some(Target::Api(endpoint)) => Handler::Api(endpoint),
            Some(Target::Proxy) => Handler::Proxy,
            _ if is_api_path(path) => Handler::NotFound,
            _ => Handler::Static,
        };
        tracing::trace!(%method, path, ?handler, "Dispatched");
        handler
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(RouteTable::standard())
    }
}
