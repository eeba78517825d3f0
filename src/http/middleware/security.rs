//! Security header middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::security::headers::apply_security_headers;

/// Stamp the security header set on every response produced below this layer.
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut());
    response
}
