//! Web-vitals telemetry.
//!
//! # Data Flow
//! ```text
//! Browser (sendBeacon / fetch keepalive) or beacon.rs
//!     → POST {telemetry.path} with a JSON body
//!     → ingest(): parse, log, record metrics
//!     → 204 | 400 (not JSON) | 405 (not POST)
//! ```
//!
//! Only JSON-parseability is checked; the payload schema is whatever the
//! client sends.

pub mod beacon;

use axum::{
    body::Bytes,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProxyError;
use crate::observability::metrics;

pub use beacon::Beacon;

/// One web-vitals measurement, as the browser library reports it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebVital {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_type: Option<String>,
}

/// Accept one submission. An empty body counts as `{}`.
pub fn ingest(method: &Method, body: &[u8]) -> Result<Value, ProxyError> {
    if method != Method::POST {
        metrics::record_telemetry("method_not_allowed");
        return Err(ProxyError::MethodNotAllowed);
    }

    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Rejected telemetry payload");
            metrics::record_telemetry("malformed");
            ProxyError::MalformedPayload("Bad Request".to_string())
        })?
    };

    tracing::info!(payload = %payload, "web-vitals");
    metrics::record_telemetry("accepted");
    if let (Some(name), Some(value)) = (
        payload.get("name").and_then(Value::as_str),
        payload.get("value").and_then(Value::as_f64),
    ) {
        metrics::record_vital(name, value);
    }

    Ok(payload)
}

/// Axum handler for the sink route.
pub async fn sink_handler(method: Method, body: Bytes) -> Response {
    match ingest(&method, &body) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
