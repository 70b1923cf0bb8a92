//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Buffer the inbound request into an [`InboundRequest`] for forwarding
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The raw path and raw query are kept; decoding belongs to the codec

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::GatewayError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, or `"unknown"` when missing.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// A fully buffered client request addressed to the gateway namespace.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw (still percent-encoded) request path.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Buffer a request, reading at most `max_body_bytes` of body.
    pub async fn from_request(
        request: Request<Body>,
        max_body_bytes: usize,
    ) -> Result<Self, GatewayError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| GatewayError::RequestBody(e.to_string()))?;

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_request_keeps_raw_parts() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/sites/https%3A%2F%2Fexample.com%2Fform?a=1&b=%20")
            .header("cookie", "sid=1")
            .body(Body::from("field=value"))
            .unwrap();

        let inbound = InboundRequest::from_request(request, 1024).await.unwrap();

        assert_eq!(inbound.method, Method::POST);
        assert_eq!(inbound.path, "/sites/https%3A%2F%2Fexample.com%2Fform");
        assert_eq!(inbound.query.as_deref(), Some("a=1&b=%20"));
        assert_eq!(inbound.headers.get("cookie").unwrap(), "sid=1");
        assert_eq!(&inbound.body[..], b"field=value");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let request = Request::builder()
            .uri("/sites/x")
            .body(Body::from(vec![0u8; 64]))
            .unwrap();

        let err = InboundRequest::from_request(request, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestBody(_)));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = MakeRequestUuidV4;
        let request = Request::new(());
        let a = make.make_request_id(&request).unwrap();
        let b = make.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
        assert_eq!(a.header_value().len(), 36);
    }
}
