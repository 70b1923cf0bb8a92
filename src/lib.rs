//! Site gateway library.
//!
//! Fetches arbitrary absolute URLs on behalf of a browser and rewrites the
//! returned documents so every reference routes back through the gateway.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{TargetUrl, UrlCodec};
