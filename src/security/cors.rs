//! Cross-origin headers for browser callers.
//!
//! The caller's `Origin` is reflected verbatim (or `*` when absent) and
//! credentials are allowed on every response, preflight or not.

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
    },
    HeaderMap, HeaderValue,
};

pub const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
pub const DEFAULT_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// CORS decisions for one inbound request.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origin: HeaderValue,
    request_headers: Option<HeaderValue>,
}

impl CorsPolicy {
    /// Capture the CORS-relevant parts of the inbound headers.
    pub fn for_request(headers: &HeaderMap) -> Self {
        Self {
            origin: headers
                .get(ORIGIN)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("*")),
            request_headers: headers.get(ACCESS_CONTROL_REQUEST_HEADERS).cloned(),
        }
    }

    pub fn origin(&self) -> &HeaderValue {
        &self.origin
    }

    /// Full header set for an `OPTIONS` answer.
    pub fn preflight(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply(&mut headers);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            self.request_headers
                .clone()
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOW_HEADERS)),
        );
        headers
    }

    /// Overwrite the origin, vary and credentials headers on `headers`.
    /// Values already present under those names are replaced.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
}
