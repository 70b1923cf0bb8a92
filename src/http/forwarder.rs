//! Outbound request construction and classification of upstream results.
//!
//! # Responsibilities
//! - Mirror an inbound request (method, headers, body, query) against a target URL
//! - Never follow redirects; a 3xx is reported as its own outcome
//! - Buffer the upstream body within a configured size limit
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` per server, built from config
//! - Compression is negotiated and decoded by the client
//! - Exactly one attempt per inbound request, no retries

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::http::request::InboundRequest;
use crate::rewrite;
use crate::routing::codec::TargetUrl;
use crate::security::headers::forwardable_request_headers;

/// A successfully fetched upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// URL that was actually requested, query included.
    pub url: TargetUrl,
}

impl UpstreamResponse {
    /// Upstream `Content-Type`, or `""` when absent or not visible ASCII.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn is_html(&self) -> bool {
        rewrite::is_html(self.content_type())
    }
}

/// Why an upstream fetch did not produce a usable response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),

    #[error("upstream request timed out")]
    Timeout,

    /// Upstream answered, but not with a success or redirect status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Status { status: StatusCode, headers: HeaderMap },

    #[error("upstream body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("failed to read upstream body: {0}")]
    Body(reqwest::Error),
}

impl FetchError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Result of one upstream fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(UpstreamResponse),
    Redirect {
        status: StatusCode,
        location: String,
        /// URL that produced the redirect; relative locations resolve against it.
        fetched: TargetUrl,
    },
    Failure(FetchError),
}

impl FetchOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::Redirect { .. } => "redirect",
            FetchOutcome::Failure(_) => "failure",
        }
    }
}

/// `Location` of a response whose status is in [300, 400).
pub fn redirect_location(status: StatusCode, headers: &HeaderMap) -> Option<String> {
    if !status.is_redirection() {
        return None;
    }
    headers
        .get(LOCATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .filter(|location| !location.is_empty())
}

/// Issues outbound requests on behalf of gateway clients.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl Forwarder {
    /// Build a forwarder from config.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.upstream_secs));
        if !config.gateway.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            max_body_bytes: config.limits.max_response_body_bytes,
        })
    }

    /// Forward `inbound` to `target`.
    pub async fn forward(&self, inbound: InboundRequest, target: &TargetUrl) -> FetchOutcome {
        let url = target.with_appended_query(inbound.query.as_deref());
        let headers = forwardable_request_headers(&inbound.headers);

        tracing::debug!(method = %inbound.method, url = %url, "Forwarding upstream");

        let result = self
            .client
            .request(inbound.method, url.as_url().clone())
            .headers(headers)
            .body(inbound.body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => return FetchOutcome::Failure(FetchError::from_transport(err)),
        };

        let status = response.status();
        if let Some(location) = redirect_location(status, response.headers()) {
            return FetchOutcome::Redirect {
                status,
                location,
                fetched: url,
            };
        }

        // The client never follows redirects, so every 3xx arrives here as a
        // response. One without Location (e.g. 304) is passed through.
        if !(status.is_success() || status.is_redirection()) {
            return FetchOutcome::Failure(FetchError::Status {
                status,
                headers: response.headers().clone(),
            });
        }

        let headers = response.headers().clone();
        match self.read_body(response).await {
            Ok(body) => FetchOutcome::Success(UpstreamResponse {
                status,
                headers,
                body,
                url,
            }),
            Err(err) => FetchOutcome::Failure(err),
        }
    }

    async fn read_body(&self, mut response: reqwest::Response) -> Result<Bytes, FetchError> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e)
            }
        })? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Bytes::from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn target() -> TargetUrl {
        TargetUrl::parse("https://example.com/a").unwrap()
    }

    fn headers_with_location(location: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(location));
        headers
    }

    #[test]
    fn test_redirect_location_requires_3xx() {
        let headers = headers_with_location("/login");
        assert_eq!(redirect_location(StatusCode::FOUND, &headers).as_deref(), Some("/login"));
        assert_eq!(redirect_location(StatusCode::OK, &headers), None);
        assert_eq!(redirect_location(StatusCode::CREATED, &headers), None);
        assert_eq!(redirect_location(StatusCode::NOT_MODIFIED, &HeaderMap::new()), None);
        assert_eq!(redirect_location(StatusCode::FOUND, &headers_with_location("")), None);
    }

    #[test]
    fn test_outcome_labels() {
        let redirect = FetchOutcome::Redirect {
            status: StatusCode::MOVED_PERMANENTLY,
            location: "/moved".into(),
            fetched: target(),
        };
        assert_eq!(redirect.label(), "redirect");

        let not_found = FetchOutcome::Failure(FetchError::Status {
            status: StatusCode::NOT_FOUND,
            headers: headers_with_location("/ignored"),
        });
        assert_eq!(not_found.label(), "failure");

        let too_large = FetchOutcome::Failure(FetchError::BodyTooLarge { limit: 1 });
        assert_eq!(too_large.label(), "failure");
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
        };
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[test]
    fn test_content_type_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        let response = UpstreamResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::new(),
            url: target(),
        };
        assert!(response.is_html());

        let json = UpstreamResponse {
            headers: HeaderMap::new(),
            ..response
        };
        assert_eq!(json.content_type(), "");
        assert!(!json.is_html());
    }
}
