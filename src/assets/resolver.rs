//! Static asset resolution.
//!
//! # Responsibilities
//! - Normalize request paths and reject escapes above the static root
//! - Refuse the API namespace even when matching files exist on disk
//! - Serve files through `ServeDir` (content types, ranges, directory index)
//! - Attach the configured `Cache-Control` directive to successful responses
//!
//! # Design Decisions
//! - Root existence is checked once at construction; a missing root puts the
//!   resolver in a permanently failing mode instead of re-checking per request
//! - Traversal segments are evaluated after percent-decoding, but the path
//!   handed to `ServeDir` stays encoded so it is decoded exactly once there

use std::borrow::Cow;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, uri::PathAndQuery, HeaderValue, Request, StatusCode, Uri},
    response::Response,
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::StaticConfig;
use crate::http::response::static_not_found;
use crate::routing::is_api_path;

/// Serving state fixed at construction.
#[derive(Debug, Clone)]
enum RootState {
    Ready(ServeDir),
    Missing,
}

/// Resolves non-API paths against the static root.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    state: RootState,
    cache_control: Option<HeaderValue>,
}

impl AssetResolver {
    /// Build a resolver for the configured directory.
    ///
    /// Never fails: an absent root is logged once and every request then
    /// resolves to "not found".
    pub fn new(config: &StaticConfig) -> Self {
        let root = PathBuf::from(&config.directory);

        let state = if root.is_dir() {
            RootState::Ready(ServeDir::new(&root))
        } else {
            tracing::warn!(
                directory = %root.display(),
                "Static directory does not exist, static requests will return 404"
            );
            RootState::Missing
        };

        Self {
            state,
            cache_control: cache_control_value(&config.cache_max_age),
        }
    }

    /// True when the root existed at construction.
    pub fn is_available(&self) -> bool {
        matches!(self.state, RootState::Ready(_))
    }

    /// Resolve a request to a file response or "not found".
    pub async fn resolve(&self, request: Request<Body>) -> Response {
        let raw_path = request.uri().path();
        if is_api_path(raw_path) {
            tracing::debug!(path = raw_path, "API namespace refused by static resolver");
            return static_not_found();
        }

        let Some(normalized) = normalize_path(raw_path) else {
            tracing::debug!(path = raw_path, "Rejected static path outside root");
            return static_not_found();
        };
        if is_api_path(&normalized.decoded) {
            tracing::debug!(path = raw_path, "API namespace refused by static resolver");
            return static_not_found();
        }

        let serve_dir = match &self.state {
            RootState::Ready(serve_dir) => serve_dir.clone(),
            RootState::Missing => return static_not_found(),
        };

        let (mut parts, body) = request.into_parts();
        parts.uri = match rewrite_path(&parts.uri, &normalized.encoded) {
            Some(uri) => uri,
            None => return static_not_found(),
        };

        let response = match serve_dir.oneshot(Request::from_parts(parts, body)).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let mut response = response.map(Body::new);

        if is_cacheable(response.status()) {
            if let Some(value) = &self.cache_control {
                response.headers_mut().insert(header::CACHE_CONTROL, value.clone());
            }
        }

        response
    }
}

fn is_cacheable(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::NOT_MODIFIED
}

/// `max-age=<value>` for a non-empty value. The value is passed through as
/// configured; only values that cannot form a header are dropped.
fn cache_control_value(max_age: &str) -> Option<HeaderValue> {
    if max_age.is_empty() {
        return None;
    }
    match HeaderValue::from_str(&format!("max-age={max_age}")) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(cache_max_age = max_age, "Ignoring cache_max_age that is not a valid header value");
            None
        }
    }
}

/// A request path with `.` and `..` segments collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Segments in their original encoded form, as handed to `ServeDir`.
    pub encoded: String,
    /// The same segments percent-decoded, as the filesystem will see them.
    pub decoded: String,
}

/// Collapse `.` and `..` segments of a request path.
///
/// Returns `None` when the path would climb above the root, or a segment
/// decodes to something that could override the root (separators, NUL,
/// drive prefixes).
pub fn normalize_path(raw: &str) -> Option<NormalizedPath> {
    let mut segments: Vec<(&str, Cow<'_, str>)> = Vec::new();

    for segment in raw.split('/') {
        let decoded = percent_decode_str(segment).decode_utf8().ok()?;
        match decoded.as_ref() {
            "" | "." => continue,
            ".." => {
                segments.pop()?;
                continue;
            }
            s if s.contains(['/', '\\', '\0']) || is_drive_prefix(s) => return None,
            _ => {}
        }
        segments.push((segment, decoded));
    }

    let trailing = !segments.is_empty() && raw.ends_with('/');
    Some(NormalizedPath {
        encoded: join_segments(segments.iter().map(|(encoded, _)| *encoded), trailing),
        decoded: join_segments(segments.iter().map(|(_, decoded)| decoded.as_ref()), trailing),
    })
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>, trailing: bool) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() || trailing {
        path.push('/');
    }
    path
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
