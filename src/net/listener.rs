//! Bounded TCP accept.
//!
//! # Responsibilities
//! - Bind the `[server]` host and port
//! - Hand out at most `max_connections` live connections at a time
//!
//! # Design Decisions
//! - A slot is reserved before `accept` so a full server stops pulling
//!   sockets off the backlog instead of accepting and dropping them

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ListenerConfig;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),
    /// The slot semaphore was closed; no further connections can be admitted.
    #[error("listener closed")]
    Closed,
}

/// One admitted connection together with the slot it occupies.
#[derive(Debug)]
pub struct Accepted {
    pub stream: TcpStream,
    pub peer_addr: SocketAddr,
    pub permit: ConnectionPermit,
}

/// Holds one connection slot; the slot frees when this drops.
#[derive(Debug)]
pub struct ConnectionPermit {
    _slot: OwnedSemaphorePermit,
}

/// A bounded TCP listener that admits at most `capacity` live connections.
pub struct Listener {
    tcp: TcpListener,
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl Listener {
    /// Bind the configured host and port with a `max_connections` slot limit.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let tcp = TcpListener::bind(config.bind_address())
            .await
            .map_err(ListenerError::Bind)?;
        Ok(Self::from_tcp(tcp, config.max_connections))
    }

    /// Wrap a socket that is already bound, e.g. to an ephemeral port.
    pub fn from_tcp(tcp: TcpListener, capacity: usize) -> Self {
        match tcp.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, max_connections = capacity, "Listening"),
            Err(e) => tracing::warn!(error = %e, "Listening on an unknown address"),
        }

        Self {
            tcp,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot, then for the next connection.
    pub async fn accept(&self) -> Result<Accepted, ListenerError> {
        let slot = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;

        let (stream, peer_addr) = self.tcp.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(
            peer_addr = %peer_addr,
            free_slots = self.slots.available_permits(),
            "Accepted connection"
        );

        Ok(Accepted {
            stream,
            peer_addr,
            permit: ConnectionPermit { _slot: slot },
        })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.tcp.local_addr()
    }

    /// Slots not currently held by a connection.
    pub fn free_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Get the configured connection limit.
    pub fn max_connections(&self) -> usize {
        self.capacity
    }
}
