//! Header manipulation and security headers.
//!
//! # Responsibilities
//! - Add security response headers (unconditionally)
//! - Append X-Forwarded-For and X-Forwarded-Host on proxied requests
//! - Strip hop-by-hop headers in both directions of a proxied exchange
//!
//! # Design Decisions
//! - Existing X-Forwarded-* values are kept and extended, never replaced
//! - Hop-by-hop headers named in `Connection` are stripped as well

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");

const KEEP_ALIVE: HeaderName = HeaderName::from_static("keep-alive");
const PROXY_CONNECTION: HeaderName = HeaderName::from_static("proxy-connection");

/// Headers every response carries.
pub fn security_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
    ]
}

/// Set the security header set, overriding whatever the handler produced.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in security_headers() {
        headers.insert(name, value);
    }
}

/// Remove connection-scoped headers before relaying a message.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }

    for name in [
        header::CONNECTION,
        KEEP_ALIVE,
        PROXY_CONNECTION,
        header::PROXY_AUTHENTICATE,
        header::PROXY_AUTHORIZATION,
        header::TE,
        header::TRAILER,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
    ] {
        headers.remove(name);
    }
}

/// Append the standard forwarding headers for a proxied request.
///
/// `original_host` is the inbound `Host` value, captured before it is
/// rewritten to the upstream authority.
pub fn append_forwarded(
    headers: &mut HeaderMap,
    client_ip: Option<IpAddr>,
    original_host: Option<&HeaderValue>,
) {
    if let Some(ip) = client_ip {
        append_list_value(headers, X_FORWARDED_FOR, &ip.to_string());
    }
    if let Some(host) = original_host.and_then(|h| h.to_str().ok()) {
        append_list_value(headers, X_FORWARDED_HOST, host);
    }
}

fn append_list_value(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    let combined = match headers.get(&name).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}, {value}"),
        _ => value.to_string(),
    };
    if let Ok(combined) = HeaderValue::from_str(&combined) {
        headers.insert(name, combined);
    }
}
