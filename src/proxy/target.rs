//! The fixed upstream authority.

use axum::http::{
    uri::{Authority, PathAndQuery, Scheme},
    HeaderValue, Uri,
};
use thiserror::Error;
use url::Url;

/// Reasons an upstream URL cannot be used.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),

    #[error("upstream must use http, got {0}")]
    Scheme(String),

    #[error("upstream has no host")]
    MissingHost,

    #[error("invalid upstream authority: {0}")]
    Authority(#[from] axum::http::uri::InvalidUri),

    #[error("invalid host header value: {0}")]
    Host(#[from] axum::http::header::InvalidHeaderValue),
}

/// Single upstream the proxy forwards to. Resolved once at construction.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl ProxyTarget {
    /// Parse an absolute `http://host[:port]` URL. Any path on the URL is ignored.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw)?;
        if url.scheme() != "http" {
            return Err(TargetError::Scheme(url.scheme().to_string()));
        }
        let host = url.host_str().ok_or(TargetError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: Scheme::HTTP,
            host_header: HeaderValue::from_str(&authority)?,
            authority: authority.parse()?,
        })
    }

    /// Upstream `host[:port]`.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value for the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Point `uri` at the upstream, keeping path and query unchanged.
    pub fn rewrite(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}
