//! Client-facing response construction.
//!
//! # Responsibilities
//! - Turn a resolved upstream redirect into a namespace redirect
//! - Assemble sanitized headers, status and (possibly rewritten) body
//!
//! # Design Decisions
//! - Length and transfer headers are left to the server
//! - A `Location` that is not a valid header value becomes a 500, never a raw origin URL

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::GatewayRedirect;

/// Redirect the client to a namespace path.
pub fn redirect(redirect: &GatewayRedirect) -> Response {
    match HeaderValue::from_str(&redirect.location) {
        Ok(location) => (redirect.status, [(LOCATION, location)]).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error occurred: invalid redirect location",
        )
            .into_response(),
    }
}

/// Response with the given status, headers and body.
pub fn proxied(status: StatusCode, headers: HeaderMap, body: impl Into<Body>) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
