//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers:
//!     → headers.rs (drop Host, Content-Length, hop-by-hop)
//!     → forwarded to origin
//!
//! Upstream response headers:
//!     → headers.rs (keep Content-Type + Set-Cookie, never CSP/XFO/CORS)
//!     → sent to client
//! ```
//!
//! # Design Decisions
//! - No access control on which targets may be proxied
//! - Header sets are rebuilt rather than patched in place

pub mod headers;
