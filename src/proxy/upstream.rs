//! Outbound HTTP client.
//!
//! One `reqwest::Client` per proxy, shared by every invocation. Timeouts
//! come from configuration; redirects are relayed to the caller unless
//! `proxy.follow_redirects` is set.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::OutboundRequest;
use crate::http::response::UpstreamResponse;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let redirect = if config.proxy.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.upstream_secs))
            .redirect(redirect)
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    /// Send one request and read the whole response body.
    pub async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ProxyError::from_upstream)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ProxyError::from_upstream)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
