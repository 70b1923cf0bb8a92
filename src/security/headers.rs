//! Header filtering in both directions.
//!
//! # Responsibilities
//! - Strip connection-specific and hop-by-hop headers before forwarding upstream
//! - Build the client-facing header set from an upstream response
//! - Never propagate headers that block framing or cross-origin access
//!
//! # Design Decisions
//! - Cookies travel verbatim both ways; they end up scoped to the gateway origin
//! - Downstream headers are an allowlist, length and encoding are recomputed locally

use axum::http::header::{HeaderMap, HeaderName, CONTENT_TYPE, SET_COOKIE};

/// Request headers that are never forwarded upstream.
///
/// `accept-encoding` is left to the upstream client, which negotiates and
/// decodes compression itself so the rewriter always sees plain bytes.
/// `x-request-id` belongs to the gateway's own tracing and stays local.
pub const STRIPPED_REQUEST_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "accept-encoding",
    "x-request-id",
];

/// Response headers that prevent the proxied page from being embedded or scripted.
pub const BLOCKING_RESPONSE_HEADERS: &[&str] = &[
    "content-security-policy",
    "content-security-policy-report-only",
    "x-frame-options",
    "access-control-allow-origin",
    "access-control-allow-headers",
];

/// Copy inbound request headers that are safe to send to the origin.
///
/// Repeated headers (e.g. several `Cookie` lines) are preserved in order.
pub fn forwardable_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if !is_stripped_request_header(name) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}

/// Build the headers returned to the client for a non-redirect response.
pub fn sanitize_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut downstream = HeaderMap::new();

    for name in upstream.keys().filter(|name| is_blocking_response_header(name)) {
        tracing::debug!(header = %name, "Dropping blocking response header");
    }

    if let Some(content_type) = upstream.get(CONTENT_TYPE) {
        downstream.insert(CONTENT_TYPE, content_type.clone());
    }
    for cookie in upstream.get_all(SET_COOKIE) {
        downstream.append(SET_COOKIE, cookie.clone());
    }

    downstream
}

pub fn is_stripped_request_header(name: &HeaderName) -> bool {
    STRIPPED_REQUEST_HEADERS.contains(&name.as_str())
}

pub fn is_blocking_response_header(name: &HeaderName) -> bool {
    BLOCKING_RESPONSE_HEADERS.contains(&name.as_str())
}
