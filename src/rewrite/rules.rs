//! Which element attributes carry references that must stay inside the gateway.

/// A `(tag, attribute)` pair whose value is a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub tag: &'static str,
    pub attribute: &'static str,
}

impl RewriteRule {
    pub const fn new(tag: &'static str, attribute: &'static str) -> Self {
        Self { tag, attribute }
    }

    /// CSS selector matching elements that carry the attribute.
    pub fn selector(&self) -> String {
        format!("{}[{}]", self.tag, self.attribute)
    }
}

/// Every reference-bearing attribute the rewriter visits, in order.
pub const REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule::new("a", "href"),
    RewriteRule::new("form", "action"),
    RewriteRule::new("link", "href"),
    RewriteRule::new("script", "src"),
    RewriteRule::new("img", "src"),
    RewriteRule::new("iframe", "src"),
    RewriteRule::new("source", "src"),
    RewriteRule::new("video", "src"),
    RewriteRule::new("audio", "src"),
    RewriteRule::new("embed", "src"),
    RewriteRule::new("object", "data"),
];

/// Value prefixes that are inline or non-navigable and must be left alone.
pub const INERT_PREFIXES: &[&str] = &["data:", "mailto:", "javascript:"];

/// `http-equiv` values whose `<meta>` elements are removed.
pub const BLOCKING_META: &[&str] = &["content-security-policy", "x-frame-options"];

pub fn is_inert(value: &str) -> bool {
    INERT_PREFIXES.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

pub fn is_blocking_meta(http_equiv: &str) -> bool {
    let http_equiv = http_equiv.trim();
    BLOCKING_META
        .iter()
        .any(|name| http_equiv.eq_ignore_ascii_case(name))
}
