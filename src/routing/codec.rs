//! Mapping between absolute target URLs and the gateway namespace.
//!
//! # Responsibilities
//! - Encode an absolute URL as a single opaque path segment under the namespace
//! - Decode and validate a namespace path back into a target URL
//! - Recognize values that already live in the namespace
//!
//! # Design Decisions
//! - The full URL is component-encoded, so `/`, `?` and `#` never leak into the path
//! - Validation happens on the decoded string: only absolute http(s) URLs pass
//! - Every URL written into or read from the namespace goes through this codec

use std::fmt;

use thiserror::Error;
use url::Url;

/// Namespace used when the configuration does not provide one.
pub const DEFAULT_NAMESPACE: &str = "/sites/";

/// Rejection of a namespace path that does not name a usable target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTarget {
    /// Nothing follows the namespace prefix.
    #[error("Bad Request: Missing URL parameter.")]
    Missing,

    /// The decoded value is not an absolute http(s) URL.
    #[error("Please provide a full URL (with http:// or https://)")]
    NotAbsolute(String),
}

/// An absolute `http` or `https` URL with a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Parse a raw string, requiring an explicit `http://` or `https://` scheme.
    pub fn parse(raw: &str) -> Result<Self, InvalidTarget> {
        if !has_http_scheme(raw) {
            return Err(InvalidTarget::NotAbsolute(raw.to_string()));
        }
        let url = Url::parse(raw).map_err(|_| InvalidTarget::NotAbsolute(raw.to_string()))?;
        Self::from_url(url)
    }

    /// Accept an already parsed URL if it is absolute http(s).
    pub fn from_url(url: Url) -> Result<Self, InvalidTarget> {
        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(Self(url)),
            _ => Err(InvalidTarget::NotAbsolute(url.into())),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Serialized origin, e.g. `https://example.com:8443`.
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    /// Append a raw query string to this URL's own query.
    ///
    /// An existing query is joined with `&`; an empty `extra` leaves the URL untouched.
    pub fn with_appended_query(&self, extra: Option<&str>) -> TargetUrl {
        let Some(extra) = extra.filter(|q| !q.is_empty()) else {
            return self.clone();
        };

        let mut url = self.0.clone();
        let merged = match url.query() {
            Some(own) if !own.is_empty() => format!("{own}&{extra}"),
            _ => extra.to_string(),
        };
        url.set_query(Some(&merged));
        TargetUrl(url)
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Case-insensitive `^https?://.+`.
fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        raw.len() > scheme.len()
            && raw.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

/// Bidirectional codec between [`TargetUrl`] and namespace paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCodec {
    namespace: String,
}

impl UrlCodec {
    /// Create a codec for the given namespace prefix.
    ///
    /// The prefix is normalized to start and end with `/`.
    pub fn new(namespace: &str) -> Self {
        let trimmed = namespace.trim_matches('/');
        let namespace = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Self { namespace }
    }

    /// The normalized prefix, always ending in `/`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Encode a target into a namespace path.
    pub fn encode(&self, target: &TargetUrl) -> String {
        format!("{}{}", self.namespace, urlencoding::encode(target.as_str()))
    }

    /// Decode a namespace path into a target.
    pub fn decode(&self, path: &str) -> Result<TargetUrl, InvalidTarget> {
        let encoded = self.strip_namespace(path).ok_or(InvalidTarget::Missing)?;
        if encoded.is_empty() {
            return Err(InvalidTarget::Missing);
        }

        let decoded = urlencoding::decode(encoded)
            .map_err(|_| InvalidTarget::NotAbsolute(encoded.to_string()))?;
        TargetUrl::parse(&decoded)
    }

    /// True when `value` is already a namespace path naming a valid target.
    pub fn is_proxied(&self, value: &str) -> bool {
        value.starts_with(self.namespace.as_str()) && self.decode(value).is_ok()
    }

    fn strip_namespace<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.namespace.as_str())
            .or_else(|| (path == self.namespace.trim_end_matches('/')).then_some(""))
    }
}

impl Default for UrlCodec {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
