//! Fire-and-continue metric delivery.
//!
//! Each report is attempted exactly once on a background task. The caller
//! never waits and never sees the outcome; failures are logged at debug.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Debug, Clone)]
pub struct Beacon {
    client: reqwest::Client,
    endpoint: Url,
}

impl Beacon {
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Queue `metric` for delivery and return at once. Must be called from
    /// within a tokio runtime. Returns `None` if the metric cannot be
    /// serialized, in which case nothing is sent.
    pub fn report<T: Serialize>(&self, metric: &T) -> Option<JoinHandle<()>> {
        let body = match serde_json::to_vec(metric) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unserializable metric");
                return None;
            }
        };

        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        Some(tokio::spawn(async move {
            match request.send().await {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "Metric delivered");
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Metric delivery failed");
                }
            }
        }))
    }
}
