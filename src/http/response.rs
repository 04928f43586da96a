//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn an upstream response into the response the caller sees
//! - Merge CORS headers over upstream headers
//! - Render edge-side failures with the same CORS treatment
//!
//! # Design Decisions
//! - Upstream bodies are buffered in full and relayed byte-for-byte
//! - Framing headers are stripped; the server recomputes them, except
//!   `content-length` on `HEAD` answers, which describes a body never sent
//! - Upstream status codes pass through untouched, 4xx/5xx included

use axum::{
    body::{Body, Bytes},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;
use crate::security::{filtered_headers, CorsPolicy};

/// What the upstream answered, fully read.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the caller receives.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RelayedResponse {
    /// 204 answer to an `OPTIONS` request.
    pub fn preflight(cors: &CorsPolicy) -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: cors.preflight(),
            body: Bytes::new(),
        }
    }

    pub fn relay(upstream: UpstreamResponse, method: &Method, cors: &CorsPolicy) -> Self {
        let mut headers = filtered_headers(&upstream.headers);
        if method == Method::HEAD {
            if let Some(length) = upstream.headers.get(CONTENT_LENGTH) {
                headers.insert(CONTENT_LENGTH, length.clone());
            }
        }
        cors.apply(&mut headers);
        Self {
            status: upstream.status,
            headers,
            body: upstream.body,
        }
    }

    /// Plain-text error body with CORS headers, so browsers can read it.
    pub fn from_error(err: &ProxyError, cors: &CorsPolicy) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        cors.apply(&mut headers);
        Self {
            status: err.status(),
            headers,
            body: Bytes::from(err.to_string()),
        }
    }
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
