//! Per-connection serving and shutdown draining.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Serve each connection on its own task (HTTP/1.1 and HTTP/2)
//! - Attach the peer address to every request on the connection
//! - Drain connections on shutdown, aborting what outlives the grace period

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{extract::ConnectInfo, http::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto::Builder, graceful::GracefulShutdown},
};
use tokio::task::JoinSet;
use tower::Service;

use crate::config::ListenerConfig;
use crate::net::listener::Accepted;

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

/// Process-unique tag attached to a connection's log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next connection ID.
    pub fn new() -> Self {
        Self(NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection-level protocol settings.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Bounds the wait for request headers, including between kept-alive requests.
    pub idle_timeout: Duration,
}

impl ConnectionSettings {
    /// Take the idle timeout from the `[server]` table.
    pub fn from_config(config: &ListenerConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout(),
        }
    }
}

/// The set of live connections owned by one server run.
pub struct ConnectionSet {
    builder: Builder<TokioExecutor>,
    graceful: GracefulShutdown,
    tasks: JoinSet<()>,
}

impl ConnectionSet {
    /// Create an empty set whose connections use `settings`.
    pub fn new(settings: ConnectionSettings) -> Self {
        let mut builder = Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(settings.idle_timeout);

        Self {
            builder,
            graceful: GracefulShutdown::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Number of connection tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when every connection task has been reaped.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Serve an accepted connection with `router` on its own task.
    pub fn serve(&mut self, accepted: Accepted, router: Router) {
        let Accepted {
            stream,
            peer_addr,
            permit,
        } = accepted;

        // Reap finished connections so the set does not grow unbounded.
        while self.tasks.try_join_next().is_some() {}

        let id = ConnectionId::new();
        let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
            request.extensions_mut().insert(ConnectInfo(peer_addr));
            router.clone().call(request)
        });

        let conn = self
            .builder
            .serve_connection_with_upgrades(TokioIo::new(stream), service);
        let conn = self.graceful.watch(conn.into_owned());

        self.tasks.spawn(async move {
            let _permit = permit;
            tracing::trace!(connection_id = %id, peer_addr = %peer_addr, "Connection opened");
            if let Err(e) = conn.await {
                tracing::debug!(connection_id = %id, error = %e, "Connection error");
            }
            tracing::trace!(connection_id = %id, "Connection closed");
        });
    }

    /// Let in-flight requests finish for up to `grace`, then abort the rest.
    pub async fn drain(self, grace: Duration) {
        let Self {
            graceful, mut tasks, ..
        } = self;

        tracing::info!(
            connections = tasks.len(),
            grace_secs = grace.as_secs(),
            "Draining connections"
        );

        tokio::select! {
            () = graceful.shutdown() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(grace) => {
                tracing::warn!(
                    remaining = tasks.len(),
                    "Grace period elapsed, closing remaining connections"
                );
                tasks.abort_all();
            }
        }

        while tasks.join_next().await.is_some() {}
    }
}
