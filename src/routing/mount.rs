//! Mount prefix handling and upstream URL construction.
//!
//! # Design Decisions
//! - Prefix matching is case-sensitive and stops at segment boundaries,
//!   so `/api/proxy` does not claim `/api/proxyfoo`
//! - Paths outside the mount are forwarded unchanged
//! - The query string is appended verbatim, never re-encoded

use url::Url;

use crate::error::ProxyError;

/// The fixed prefix the proxy answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    prefix: String,
}

impl Mount {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `path` is the mount itself or lies below it.
    pub fn contains(&self, path: &str) -> bool {
        self.remainder(path).is_some()
    }

    /// `path` with the mount removed. `/api/proxy/users` becomes `/users`,
    /// `/api/proxy` becomes the empty string.
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        self.remainder(path).unwrap_or(path)
    }

    fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }
}

/// `{base}{path}?{query}`, parsed so a malformed request surfaces as a 400
/// instead of a client error later on.
pub fn upstream_url(base: &str, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
    let raw = match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{base}{path}?{query}"),
        None => format!("{base}{path}"),
    };
    Url::parse(&raw).map_err(|e| ProxyError::InvalidRequest(format!("Invalid upstream URL: {e}")))
}
