//! Gateway error taxonomy and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::forwarder::FetchError;
use crate::rewrite::RewriteError;
use crate::routing::{InvalidTarget, RedirectError};

/// Any failure that aborts a gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed target; the request is never forwarded.
    #[error(transparent)]
    InvalidTarget(#[from] InvalidTarget),

    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error(transparent)]
    Redirect(#[from] RedirectError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("failed to read request body: {0}")]
    RequestBody(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::InvalidTarget(_) => "invalid_target",
            GatewayError::Upstream(_) => "upstream_failure",
            GatewayError::Redirect(_) => "redirect_failure",
            GatewayError::Rewrite(_) => "rewrite_failure",
            GatewayError::RequestBody(_) => "request_body",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            GatewayError::InvalidTarget(e) => e.to_string(),
            other => format!("Error occurred: {}", other),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: GatewayError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_target_is_400() {
        let (status, body) = body_of(InvalidTarget::Missing.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Bad Request: Missing URL parameter.");

        let (status, body) = body_of(InvalidTarget::NotAbsolute("x".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please provide a full URL (with http:// or https://)");
    }

    #[tokio::test]
    async fn test_other_errors_are_500() {
        let (status, body) = body_of(FetchError::Timeout.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error occurred: upstream request timed out");

        let err = GatewayError::RequestBody("length limit exceeded".into());
        assert_eq!(err.label(), "request_body");
        assert_eq!(body_of(err).await.0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
