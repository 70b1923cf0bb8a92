//! Response body rewriting.
//!
//! # Data Flow
//! ```text
//! Upstream body + Content-Type
//!     → is_html() ? html.rs : untouched bytes
//!     → html.rs walks rules.rs table, encodes references via routing::codec
//!     → rewritten body + RewriteReport
//! ```

pub mod html;
pub mod rules;

pub use html::{rewrite_html, RewriteError, RewriteReport};
pub use rules::{RewriteRule, REWRITE_RULES};

/// True when a `Content-Type` value denotes an HTML document.
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("Text/HTML; charset=ISO-8859-1"));
        assert!(!is_html("application/json"));
        assert!(!is_html("application/xhtml+xml"));
        assert!(!is_html(""));
    }
}
