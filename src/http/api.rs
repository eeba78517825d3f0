//! JSON API handlers.
//!
//! All handlers accept any method and answer `application/json`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::{
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::routing::ApiEndpoint;

pub const SERVER_NAME: &str = "FeatherJet";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Facts about the running server reported by `/api/status` and `/api/info`.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub static_directory: PathBuf,
    pub cors_enabled: bool,
    pub compression_enabled: bool,
    pub request_logging: bool,
    pub started_at: Instant,
}

impl ServerInfo {
    /// Capture the reported settings and start the uptime clock.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            host: config.listener.host.clone(),
            port: config.listener.port,
            static_directory: PathBuf::from(&config.static_files.directory),
            cors_enabled: config.middleware.enable_cors,
            compression_enabled: config.middleware.enable_compression,
            request_logging: config.logging.enable_request_logging,
            started_at: Instant::now(),
        }
    }

    /// Time since this value was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[derive(Serialize)]
struct Hello<'a> {
    message: &'static str,
    timestamp: String,
    method: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct Status {
    status: &'static str,
    server: &'static str,
    version: &'static str,
    timestamp: String,
    uptime: String,
    uptime_secs: u64,
}

#[derive(Serialize)]
struct Info<'a> {
    server: InfoServer<'a>,
    #[serde(rename = "static")]
    static_files: InfoStatic,
    middleware: InfoMiddleware,
    timestamp: String,
}

#[derive(Serialize)]
struct InfoServer<'a> {
    name: &'static str,
    version: &'static str,
    host: &'a str,
    port: u16,
}

#[derive(Serialize)]
struct InfoStatic {
    directory: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_directory: Option<bool>,
}

#[derive(Serialize)]
struct InfoMiddleware {
    cors_enabled: bool,
    compression_enabled: bool,
    request_logging: bool,
}

/// Serve one of the built-in endpoints.
pub async fn handle(endpoint: ApiEndpoint, info: &ServerInfo, method: &Method, path: &str) -> Response {
    match endpoint {
        ApiEndpoint::Hello => hello(method, path).into_response(),
        ApiEndpoint::Status => status(info).into_response(),
        ApiEndpoint::Info => server_info(info).await.into_response(),
    }
}

fn hello<'a>(method: &'a Method, path: &'a str) -> Json<Hello<'a>> {
    Json(Hello {
        message: "Hello from FeatherJet!",
        timestamp: timestamp(),
        method: method.as_str(),
        path,
    })
}

fn status(info: &ServerInfo) -> Json<Status> {
    let uptime = info.uptime();
    Json(Status {
        status: "healthy",
        server: SERVER_NAME,
        version: VERSION,
        timestamp: timestamp(),
        uptime: format_uptime(uptime),
        uptime_secs: uptime.as_secs(),
    })
}

async fn server_info(info: &ServerInfo) -> Json<Info<'_>> {
    let metadata = tokio::fs::metadata(&info.static_directory).await.ok();

    Json(Info {
        server: InfoServer {
            name: SERVER_NAME,
            version: VERSION,
            host: &info.host,
            port: info.port,
        },
        static_files: InfoStatic {
            directory: info.static_directory.display().to_string(),
            exists: metadata.is_some(),
            is_directory: metadata.map(|m| m.is_dir()),
        },
        middleware: InfoMiddleware {
            cors_enabled: info.cors_enabled,
            compression_enabled: info.compression_enabled,
            request_logging: info.request_logging,
        },
        timestamp: timestamp(),
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `1h2m3s`-style rendering; hours and minutes are omitted while zero.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    async fn call(endpoint: ApiEndpoint, info: &ServerInfo, method: Method, path: &str) -> serde_json::Value {
        let response = handle(endpoint, info, &method, path).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn hello_echoes_request() {
        let info = ServerInfo::from_config(&AppConfig::default());
        let value = call(ApiEndpoint::Hello, &info, Method::POST, "/api/hello").await;
        assert_eq!(value["message"], "Hello from FeatherJet!");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["path"], "/api/hello");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn status_reports_health() {
        let info = ServerInfo::from_config(&AppConfig::default());
        let value = call(ApiEndpoint::Status, &info, Method::GET, "/api/status").await;
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["server"], "FeatherJet");
        assert_eq!(value["version"], VERSION);
        assert!(value["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn status_uptime_counts_from_construction() {
        let mut info = ServerInfo::from_config(&AppConfig::default());
        info.started_at = Instant::now() - Duration::from_secs(125);
        let value = call(ApiEndpoint::Status, &info, Method::GET, "/api/status").await;
        assert!(value["uptime_secs"].as_u64().unwrap() >= 125);
        assert!(value["uptime"].as_str().unwrap().starts_with("2m"));
    }

    #[tokio::test]
    async fn info_reports_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.static_files.directory = dir.path().to_string_lossy().into_owned();
        config.middleware.enable_cors = true;
        let info = ServerInfo::from_config(&config);

        let value = call(ApiEndpoint::Info, &info, Method::GET, "/api/info").await;
        assert_eq!(value["server"]["name"], "FeatherJet");
        assert_eq!(value["server"]["port"], 8080);
        assert_eq!(value["static"]["exists"], true);
        assert_eq!(value["static"]["is_directory"], true);
        assert_eq!(value["middleware"]["cors_enabled"], true);
        assert_eq!(value["middleware"]["compression_enabled"], false);
    }

    #[tokio::test]
    async fn info_reports_missing_directory() {
        let mut config = AppConfig::default();
        config.static_files.directory = "/definitely/not/here".into();
        let info = ServerInfo::from_config(&config);

        let value = call(ApiEndpoint::Info, &info, Method::GET, "/api/info").await;
        assert_eq!(value["static"]["exists"], false);
        assert!(value["static"].get("is_directory").is_none());
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_millis(900)), "0s");
        assert_eq!(format_uptime(Duration::from_secs(59)), "59s");
        assert_eq!(format_uptime(Duration::from_secs(61)), "1m1s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h2m3s");
    }
}
