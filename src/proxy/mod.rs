//! Edge proxy.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → OPTIONS? answer 204 preflight, stop
//!     → upstream configured? else ConfigurationError (500)
//!     → strip mount, join base + path + query
//!     → drop per-hop headers, decode body (none for GET/HEAD)
//!     → upstream.rs (single outbound call)
//!     → RelayedResponse (upstream status/body + CORS)
//! ```
//!
//! Every invocation is independent; the only shared object is the
//! outbound client.

pub mod event;
pub mod upstream;

use std::time::Instant;

use axum::http::Method;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::{InboundRequest, OutboundRequest};
use crate::http::response::RelayedResponse;
use crate::observability::metrics;
use crate::routing::{upstream_url, Mount};
use crate::security::{filtered_headers, CorsPolicy};

pub use event::{FunctionEvent, FunctionResponse};
pub use upstream::UpstreamClient;

/// What to do with an inbound request.
#[derive(Debug)]
pub enum Dispatch {
    /// Answer immediately; upstream is never contacted.
    Preflight(RelayedResponse),
    /// Send this upstream.
    Forward(OutboundRequest),
}

#[derive(Debug, Clone)]
pub struct EdgeProxy {
    mount: Mount,
    upstream_base: Option<String>,
    upstream_env: String,
    client: UpstreamClient,
}

impl EdgeProxy {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            mount: Mount::new(config.proxy.mount_path.clone()),
            upstream_base: config.proxy.upstream_base().map(str::to_string),
            upstream_env: config.proxy.upstream_env.clone(),
            client: UpstreamClient::new(config)?,
        })
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Decide how to answer `request` without doing any I/O.
    pub fn dispatch(&self, request: InboundRequest) -> Result<Dispatch, ProxyError> {
        if request.method == Method::OPTIONS {
            let cors = CorsPolicy::for_request(&request.headers);
            return Ok(Dispatch::Preflight(RelayedResponse::preflight(&cors)));
        }

        let base = self
            .upstream_base
            .as_deref()
            .ok_or_else(|| ProxyError::Configuration {
                env: self.upstream_env.clone(),
            })?;

        let path = self.mount.strip(&request.path);
        let url = upstream_url(base, path, request.query.as_deref())?;
        let headers = filtered_headers(&request.headers);
        let body = if request.method == Method::GET || request.method == Method::HEAD {
            None
        } else {
            request.body.into_bytes()?
        };

        Ok(Dispatch::Forward(OutboundRequest {
            method: request.method,
            url,
            headers,
            body,
        }))
    }

    /// Answer `request`. Failures become error responses carrying CORS
    /// headers; this never returns an error to the caller.
    pub async fn handle(&self, request: InboundRequest) -> RelayedResponse {
        let start_time = Instant::now();
        let cors = CorsPolicy::for_request(&request.headers);
        let method = request.method.clone();
        let request_id = request.request_id().to_string();

        let outbound = match self.dispatch(request) {
            Ok(Dispatch::Preflight(response)) => {
                tracing::debug!(request_id = %request_id, "Answered preflight");
                metrics::record_request(method.as_str(), response.status.as_u16(), start_time);
                return response;
            }
            Ok(Dispatch::Forward(outbound)) => outbound,
            Err(err) => return self.fail(err, &cors, method.as_str(), &request_id, start_time),
        };

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %outbound.url.path(),
            "Forwarding request"
        );

        match self.client.send(outbound).await {
            Ok(upstream) => {
                let status = upstream.status.as_u16();
                metrics::record_request(method.as_str(), status, start_time);
                tracing::debug!(
                    request_id = %request_id,
                    status,
                    bytes = upstream.body.len(),
                    "Relaying upstream response"
                );
                RelayedResponse::relay(upstream, &method, &cors)
            }
            Err(err) => self.fail(err, &cors, method.as_str(), &request_id, start_time),
        }
    }

    fn fail(
        &self,
        err: ProxyError,
        cors: &CorsPolicy,
        method: &str,
        request_id: &str,
        start_time: Instant,
    ) -> RelayedResponse {
        match &err {
            ProxyError::Configuration { env } => {
                tracing::error!(request_id = %request_id, env = %env, "Upstream URL not configured");
            }
            ProxyError::UpstreamUnreachable(source) | ProxyError::UpstreamTimeout(source) => {
                tracing::error!(request_id = %request_id, error = %source, "Upstream error");
                metrics::record_upstream_error(err.kind());
            }
            _ => {
                tracing::warn!(request_id = %request_id, error = %err, "Rejected request");
            }
        }
        let response = RelayedResponse::from_error(&err, cors);
        metrics::record_request(method, response.status.as_u16(), start_time);
        response
    }
}
