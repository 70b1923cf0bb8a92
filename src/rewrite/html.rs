//! HTML response rewriting.
//!
//! # Responsibilities
//! - Drop `<meta http-equiv>` policies that block framing, and every `<base>`
//! - Point every reference attribute from [`REWRITE_RULES`] back into the namespace
//! - Keep going when a single attribute cannot be resolved
//!
//! # Design Decisions
//! - One generic handler per rule, driven by the static rule table
//! - The body is fully buffered; the rewriter runs over it in one pass
//! - Values already inside the namespace are kept, so feeding a rewritten
//!   document back in never double-encodes

use std::borrow::Cow;
use std::cell::RefCell;

use lol_html::errors::RewritingError;
use lol_html::{element, HtmlRewriter, Settings};
use thiserror::Error;

use crate::rewrite::rules::{is_blocking_meta, is_inert, REWRITE_RULES};
use crate::routing::codec::{TargetUrl, UrlCodec};

/// Fatal failure of the HTML pass as a whole.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("HTML rewriting failed: {0}")]
    Parser(#[from] RewritingError),
}

/// What a rewrite pass did to a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteReport {
    /// Attributes pointed back into the namespace.
    pub rewritten: usize,
    /// Attributes left alone on purpose (inert schemes, already proxied, empty).
    pub skipped: usize,
    /// Attributes that could not be resolved and were left untouched.
    pub failed: usize,
    /// Elements removed (blocking `<meta>`, `<base>`).
    pub removed: usize,
}

/// Outcome for a single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Rewritten(String),
    Skipped,
    Unresolvable(String),
}

/// Resolve one attribute value against `base` and encode it into the namespace.
pub fn resolve_reference(raw: &str, base: &TargetUrl, codec: &UrlCodec) -> Reference {
    let decoded = html_escape::decode_html_entities(raw);
    let value = decoded.trim();
    if value.is_empty() || is_inert(value) || codec.is_proxied(value) {
        return Reference::Skipped;
    }

    let candidate: Cow<'_, str> = if value.starts_with("//") {
        Cow::Owned(format!("{}:{}", base.scheme(), value))
    } else {
        Cow::Borrowed(value)
    };

    match base.as_url().join(&candidate) {
        Ok(url) => match TargetUrl::from_url(url) {
            Ok(target) => Reference::Rewritten(codec.encode(&target)),
            Err(err) => Reference::Unresolvable(err.to_string()),
        },
        Err(err) => Reference::Unresolvable(err.to_string()),
    }
}

/// Rewrite an HTML document fetched from `base`.
pub fn rewrite_html(
    body: &[u8],
    base: &TargetUrl,
    codec: &UrlCodec,
) -> Result<(Vec<u8>, RewriteReport), RewriteError> {
    let report = RefCell::new(RewriteReport::default());
    let mut output = Vec::with_capacity(body.len());

    let mut handlers = vec![
        element!("meta[http-equiv]", |el| {
            let blocking = el
                .get_attribute("http-equiv")
                .is_some_and(|value| is_blocking_meta(&value));
            if blocking {
                el.remove();
                report.borrow_mut().removed += 1;
            }
            Ok(())
        }),
        element!("base", |el| {
            el.remove();
            report.borrow_mut().removed += 1;
            Ok(())
        }),
    ];

    for rule in REWRITE_RULES {
        let report = &report;
        handlers.push(element!(rule.selector(), move |el| {
            let Some(raw) = el.get_attribute(rule.attribute) else {
                return Ok(());
            };
            match resolve_reference(&raw, base, codec) {
                Reference::Rewritten(path) => {
                    el.set_attribute(rule.attribute, &path)?;
                    report.borrow_mut().rewritten += 1;
                }
                Reference::Skipped => report.borrow_mut().skipped += 1,
                Reference::Unresolvable(reason) => {
                    tracing::warn!(
                        tag = rule.tag,
                        attribute = rule.attribute,
                        value = %raw,
                        base = %base,
                        error = %reason,
                        "Attribute URL resolution failed, leaving it untouched"
                    );
                    report.borrow_mut().failed += 1;
                }
            }
            Ok(())
        }));
    }

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::new()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );
    rewriter.write(body)?;
    rewriter.end()?;

    Ok((output, report.into_inner()))
}
