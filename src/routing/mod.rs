//! Gateway namespace routing.
//!
//! # Data Flow
//! ```text
//! Inbound path "/sites/https%3A%2F%2Fexample.com%2Fa"
//!     → codec.rs (strip namespace, percent-decode, validate)
//!     → TargetUrl "https://example.com/a"
//!
//! Upstream 3xx + Location "/login"
//!     → redirect.rs (resolve against fetched URL)
//!     → codec.rs (encode)
//!     → client redirect to "/sites/https%3A%2F%2Fexample.com%2Flogin"
//! ```
//!
//! # Design Decisions
//! - One codec instance, built from config, shared by every consumer
//! - Redirects never expose an origin URL to the client

pub mod codec;
pub mod redirect;

pub use codec::{InvalidTarget, TargetUrl, UrlCodec};
pub use redirect::{GatewayRedirect, RedirectError};
