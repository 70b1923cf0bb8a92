//! Upstream redirect resolution.
//!
//! An upstream `Location` is resolved against the URL that was actually
//! fetched, then re-encoded so the client is sent back through the gateway.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::codec::{TargetUrl, UrlCodec};

/// Failure to turn an upstream `Location` into an absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve redirect location {location:?} against {base}")]
pub struct RedirectError {
    pub location: String,
    pub base: String,
}

/// A redirect into the gateway namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRedirect {
    /// Status sent to the client.
    pub status: StatusCode,
    /// Absolute target the redirect points at.
    pub target: TargetUrl,
    /// Namespace path for the `Location` header.
    pub location: String,
}

/// Resolve an upstream redirect into a gateway redirect.
pub fn resolve(
    codec: &UrlCodec,
    fetched: &TargetUrl,
    status: StatusCode,
    location: &str,
) -> Result<GatewayRedirect, RedirectError> {
    let target = resolve_location(fetched, location)?;
    Ok(GatewayRedirect {
        status: redirect_status(status),
        location: codec.encode(&target),
        target,
    })
}

/// Resolve `location` against `base`.
///
/// Standard relative resolution is tried first. When that does not produce an
/// absolute http(s) URL the raw value is appended to the base origin.
pub fn resolve_location(base: &TargetUrl, location: &str) -> Result<TargetUrl, RedirectError> {
    let joined = base
        .as_url()
        .join(location)
        .ok()
        .and_then(|url| TargetUrl::from_url(url).ok());
    if let Some(target) = joined {
        return Ok(target);
    }

    TargetUrl::parse(&format!("{}{}", base.origin(), location)).map_err(|_| RedirectError {
        location: location.to_string(),
        base: base.to_string(),
    })
}

/// Status for the client-facing redirect.
///
/// Codes with well-defined method semantics are kept, anything else becomes 302.
pub fn redirect_status(upstream: StatusCode) -> StatusCode {
    match upstream {
        StatusCode::MOVED_PERMANENTLY
        | StatusCode::FOUND
        | StatusCode::SEE_OTHER
        | StatusCode::TEMPORARY_REDIRECT
        | StatusCode::PERMANENT_REDIRECT => upstream,
        _ => StatusCode::FOUND,
    }
}
