//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, pipeline)
//!     → request.rs (request ID, buffer inbound request)
//!     → routing::codec (decode target)
//!     → forwarder.rs (outbound request, outcome classification)
//!     → routing::redirect | security::headers + rewrite::html
//!     → response.rs (build client response)
//!     → Send to client
//! ```

pub mod error;
pub mod forwarder;
pub mod landing;
pub mod request;
pub mod response;
pub mod server;

pub use error::GatewayError;
pub use forwarder::{FetchError, FetchOutcome, Forwarder, UpstreamResponse};
pub use request::{InboundRequest, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
