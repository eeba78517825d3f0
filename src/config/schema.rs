//! TOML configuration types.
//!
//! Every field has a default, so an empty file (or no file) yields a
//! runnable configuration. Table names follow the file layout:
//! `[server]`, `[static]`, `[logging]`, `[middleware]`, `[proxy]`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, timeouts).
    #[serde(rename = "server")]
    pub listener: ListenerConfig,

    /// Static asset serving.
    #[serde(rename = "static")]
    pub static_files: StaticConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Optional middleware layers.
    pub middleware: MiddlewareConfig,

    /// Reverse proxy upstream.
    pub proxy: ProxyConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0" or "localhost").
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Time allowed to read a request body, in seconds.
    pub read_timeout_secs: u64,

    /// Time allowed to produce a response, in seconds.
    pub write_timeout_secs: u64,

    /// Keep-alive idle timeout, in seconds.
    pub idle_timeout_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_grace_secs: u64,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            idle_timeout_secs: 120,
            shutdown_grace_secs: 30,
            max_connections: 10_000,
        }
    }
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Bound on reading a request body.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Bound on producing a response.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Bound on waiting for request headers on an open connection.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// How long in-flight connections may run after shutdown starts.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Root directory for static files.
    pub directory: String,

    /// Value for `Cache-Control: max-age=<value>`. Empty disables the header.
    pub cache_max_age: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            directory: "./public".to_string(),
            cache_max_age: "3600".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error).
    pub level: String,

    /// Log method, path, status and latency for every request.
    pub enable_request_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_request_logging: true,
        }
    }
}

/// Middleware toggles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Add permissive CORS headers and answer preflight requests.
    pub enable_cors: bool,

    /// Reported by `/api/info`; no compression layer is installed.
    pub enable_compression: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_compression: false,
        }
    }
}

/// Reverse proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream authority as an absolute URL (e.g., "http://127.0.0.1:8081").
    pub upstream: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream: "http://127.0.0.1:8081".to_string(),
        }
    }
}
