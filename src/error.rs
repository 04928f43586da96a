//! Per-request error taxonomy.
//!
//! Upstream non-2xx answers are not errors: they are relayed verbatim.
//! Only failures the edge itself detects end up here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Required upstream URL is not configured.
    #[error("Missing {env} env var")]
    Configuration { env: String },

    /// Body could not be decoded (bad JSON, bad base64).
    #[error("{0}")]
    MalformedPayload(String),

    /// Inbound request could not be turned into an outbound one.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Streamed body grew past the configured limit.
    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Upstream request failed")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("Upstream request timed out")]
    UpstreamTimeout(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::MalformedPayload(_) | ProxyError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            ProxyError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Configuration { .. } => "configuration",
            ProxyError::MalformedPayload(_) => "malformed_payload",
            ProxyError::InvalidRequest(_) => "invalid_request",
            ProxyError::MethodNotAllowed => "method_not_allowed",
            ProxyError::PayloadTooLarge => "payload_too_large",
            ProxyError::UpstreamUnreachable(_) => "unreachable",
            ProxyError::UpstreamTimeout(_) => "timeout",
        }
    }

    pub(crate) fn from_upstream(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::UpstreamTimeout(err)
        } else {
            ProxyError::UpstreamUnreachable(err)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
