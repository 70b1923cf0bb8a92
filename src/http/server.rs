//! HTTP server setup and the gateway pipeline.
//!
//! # Responsibilities
//! - Create the Axum router (landing page + namespace routes, all methods)
//! - Wire up middleware (request ID, tracing, timeout)
//! - Decode the target, forward, then redirect or sanitize + rewrite
//! - Record per-request metrics
//!
//! # Pipeline
//! ```text
//! decode target ──invalid──▶ 400
//!      │
//!  forward ──failure──▶ 500
//!      │
//!      ├─ 3xx + Location ─▶ resolve ─▶ namespace redirect
//!      │
//!  sanitize headers ─▶ text/html? ─▶ rewrite body ─▶ client
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::error::GatewayError;
use crate::http::forwarder::{FetchOutcome, Forwarder};
use crate::http::landing;
use crate::http::request::{request_id, InboundRequest, MakeRequestUuidV4};
use crate::http::response;
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::rewrite::rewrite_html;
use crate::routing::{redirect, UrlCodec};
use crate::security::headers::sanitize_response_headers;

/// Application state injected into handlers.
///
/// Everything here is immutable and shared; requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<UrlCodec>,
    pub forwarder: Forwarder,
    pub max_request_body_bytes: usize,
    pub landing_page: Arc<str>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let codec = UrlCodec::new(&config.gateway.namespace);
        let state = AppState {
            forwarder: Forwarder::new(&config)?,
            max_request_body_bytes: config.limits.max_request_body_bytes,
            landing_page: landing::render(codec.namespace()).into(),
            codec: Arc::new(codec),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The inbound body limit is enforced while buffering in
    /// [`InboundRequest::from_request`], so oversized bodies surface as a
    /// gateway error rather than a bare 413.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let namespace = state.codec.namespace().to_string();
        let wildcard = format!("{namespace}{{*target}}");
        let bare = namespace.trim_end_matches('/').to_string();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(request),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ));

        Router::new()
            .route("/", get(landing_handler))
            .route(&wildcard, any(gateway_handler))
            .route(&namespace, any(gateway_handler))
            .route(&bare, any(gateway_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until an OS signal or `shutdown` fires, draining in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            namespace = %self.config.gateway.namespace,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The fully layered router, for in-process serving.
    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.to_string())
}

/// Main gateway handler.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();

    let (outcome, response) = match proxy(&state, request).await {
        Ok(proxied) => proxied,
        Err(err) => {
            match &err {
                GatewayError::InvalidTarget(e) => {
                    tracing::warn!(request_id = %request_id, error = ?e, "Rejected target")
                }
                other => {
                    tracing::error!(request_id = %request_id, error = %other, "Gateway request failed")
                }
            }
            (err.label(), err.into_response())
        }
    };

    metrics::record_request(&method, response.status().as_u16(), outcome, start_time);
    response
}

/// Run one request through the pipeline.
async fn proxy(
    state: &AppState,
    request: Request<Body>,
) -> Result<(&'static str, Response), GatewayError> {
    // Decode first: an invalid target is rejected before the body is read.
    let target = state.codec.decode(request.uri().path())?;
    let inbound = InboundRequest::from_request(request, state.max_request_body_bytes).await?;

    let outcome = state.forwarder.forward(inbound, &target).await;
    let label = outcome.label();

    match outcome {
        FetchOutcome::Redirect {
            status,
            location,
            fetched,
        } => {
            let resolved = redirect::resolve(&state.codec, &fetched, status, &location)?;
            tracing::debug!(
                upstream_status = %status,
                location = %location,
                target = %resolved.target,
                "Upstream redirect mapped into namespace"
            );
            Ok((label, response::redirect(&resolved)))
        }
        FetchOutcome::Failure(err) => Err(err.into()),
        FetchOutcome::Success(upstream) => {
            let headers = sanitize_response_headers(&upstream.headers);

            if !upstream.is_html() {
                return Ok((label, response::proxied(upstream.status, headers, upstream.body)));
            }

            let (html, report) = rewrite_html(&upstream.body, &upstream.url, &state.codec)?;
            metrics::record_rewrite(&report);
            tracing::debug!(
                url = %upstream.url,
                rewritten = report.rewritten,
                skipped = report.skipped,
                failed = report.failed,
                removed = report.removed,
                "HTML rewritten"
            );
            Ok((label, response::proxied(upstream.status, headers, html)))
        }
    }
}
