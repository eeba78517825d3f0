//! Request forwarding to the upstream service.
//!
//! # Responsibilities
//! - Rewrite the destination authority and `Host` header
//! - Add forwarding headers, strip hop-by-hop headers
//! - Stream the request body up and the response body back
//! - Map connection failures to 502
//!
//! # Design Decisions
//! - No retries and no fallback to static serving
//! - Bodies are never buffered; dropping the downstream response drops the
//!   upstream body and releases its connection
//! - No per-call timeout; the server's write timeout bounds slow upstreams

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, request, HeaderValue, Request, StatusCode, Version},
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::http::response::json_error;
use crate::proxy::target::ProxyTarget;
use crate::security::headers::{append_forwarded, strip_hop_by_hop};

/// Errors from a single forwarding attempt.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    InvalidUri(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Stateless forwarder bound to one upstream.
#[derive(Debug, Clone)]
pub struct Forwarder {
    target: ProxyTarget,
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    /// Create a forwarder for `target` with its own connection pool.
    pub fn new(target: ProxyTarget) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { target, client }
    }

    /// Forward `request` and relay the upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.try_forward(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    %method,
                    path = %path,
                    upstream = %self.target.authority(),
                    error = %e,
                    "Upstream request failed"
                );
                json_error(StatusCode::BAD_GATEWAY, "upstream unavailable", &path)
            }
        }
    }

    async fn try_forward(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let (mut parts, body) = request.into_parts();
        let original_host = original_host(&parts);

        parts.uri = self.target.rewrite(&parts.uri)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        parts.headers.insert(header::HOST, self.target.host_header().clone());
        append_forwarded(&mut parts.headers, client_ip, original_host.as_ref());

        let response = self.client.request(Request::from_parts(parts, body)).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// The authority the client addressed: the `Host` header, or the URI
/// authority for HTTP/2 requests, which carry `:authority` instead.
fn original_host(parts: &request::Parts) -> Option<HeaderValue> {
    parts.headers.get(header::HOST).cloned().or_else(|| {
        parts
            .uri
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    })
}
