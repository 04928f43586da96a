//! Serverless function envelope.
//!
//! Function runtimes hand handlers a JSON event instead of a socket and
//! expect a JSON object back. Binary bodies travel base64-encoded in both
//! directions.

use std::collections::{BTreeMap, HashMap};

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::http::request::{InboundBody, InboundRequest};
use crate::http::response::RelayedResponse;
use crate::proxy::EdgeProxy;
use crate::security::CorsPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionEvent {
    pub http_method: String,
    pub path: String,
    pub raw_query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Headers that occur more than once, e.g. `set-cookie`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_base64_encoded: bool,
}

impl FunctionEvent {
    /// Header names are lower-cased. Entries that are not valid HTTP
    /// headers are skipped.
    pub fn header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let parsed = (
                HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()),
                HeaderValue::from_str(value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!(header = %name, "Skipping invalid event header"),
            }
        }
        headers
    }

    pub fn into_inbound(self) -> Result<InboundRequest, ProxyError> {
        let method = Method::from_bytes(self.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ProxyError::InvalidRequest(format!("Invalid method {:?}", self.http_method)))?;
        let headers = self.header_map();

        let body = match self.body {
            None => InboundBody::Empty,
            Some(body) if self.is_base64_encoded => InboundBody::Base64(body),
            Some(body) if body.is_empty() => InboundBody::Empty,
            Some(body) => InboundBody::Text(body),
        };

        Ok(InboundRequest {
            method,
            path: if self.path.is_empty() { "/".to_string() } else { self.path },
            query: self.raw_query.filter(|q| !q.is_empty()),
            headers,
            body,
        })
    }
}

impl From<RelayedResponse> for FunctionResponse {
    fn from(response: RelayedResponse) -> Self {
        let mut headers = BTreeMap::new();
        let mut multi_value_headers = BTreeMap::new();
        for name in response.headers.keys() {
            let values: Vec<String> = response
                .headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            if values.len() == 1 {
                headers.insert(name.to_string(), values.concat());
            } else {
                multi_value_headers.insert(name.to_string(), values);
            }
        }

        let (body, is_base64_encoded) = if response.body.is_empty() {
            (None, false)
        } else {
            match std::str::from_utf8(&response.body) {
                Ok(text) => (Some(text.to_string()), false),
                Err(_) => (Some(STANDARD.encode(&response.body)), true),
            }
        };

        Self {
            status_code: response.status.as_u16(),
            headers,
            multi_value_headers,
            body,
            is_base64_encoded,
        }
    }
}

impl EdgeProxy {
    /// Run one function event through the proxy.
    pub async fn handle_event(&self, event: FunctionEvent) -> FunctionResponse {
        let cors = CorsPolicy::for_request(&event.header_map());
        match event.into_inbound() {
            Ok(request) => self.handle(request).await.into(),
            Err(err) => {
                tracing::warn!(error = %err, "Rejected function event");
                RelayedResponse::from_error(&err, &cors).into()
            }
        }
    }
}
