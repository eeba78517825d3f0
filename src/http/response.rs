//! Response construction helpers.
//!
//! # Responsibilities
//! - Build structured JSON error bodies for the API namespace
//! - Build plain "not found" responses for static paths
//!
//! # Design Decisions
//! - API errors always carry an `error` field so clients can rely on the shape
//! - Static misses carry no JSON; only the status is meaningful

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body for every error produced inside the API namespace.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub path: &'a str,
}

/// A JSON error response with the given status.
pub fn json_error(status: StatusCode, error: &str, path: &str) -> Response {
    (status, Json(ErrorBody { error, path })).into_response()
}

/// 404 for API paths no handler claims.
pub fn api_not_found(path: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, "not found", path)
}

/// 404 for static paths.
pub fn static_not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
