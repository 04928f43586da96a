//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream forwarding settings.
    pub proxy: UpstreamConfig,

    /// Web-vitals sink settings.
    pub telemetry: TelemetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request size limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Where requests are forwarded and under which prefix the proxy is mounted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Path prefix the proxy answers on. Stripped before forwarding.
    pub mount_path: String,

    /// Upstream base URL. Usually left empty in the file and supplied
    /// through `upstream_env`.
    pub upstream_url: Option<String>,

    /// Environment variable consulted for the upstream base URL.
    pub upstream_env: String,

    /// Follow upstream redirects instead of relaying them to the caller.
    pub follow_redirects: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mount_path: "/api/proxy".to_string(),
            upstream_url: None,
            upstream_env: "BACKEND_URL".to_string(),
            follow_redirects: false,
        }
    }
}

impl UpstreamConfig {
    /// Upstream base with a single trailing slash removed, so that
    /// `{base}{path}` never produces `//`.
    pub fn upstream_base(&self) -> Option<&str> {
        self.upstream_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.strip_suffix('/').unwrap_or(url))
    }
}

/// Web-vitals sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable the sink route.
    pub enabled: bool,

    /// Path the sink is mounted on.
    pub path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/api/metrics".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Upstream request timeout (send + full body read) in seconds.
    pub upstream_secs: u64,

    /// Request timeout for the whole inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 25,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 6 * 1024 * 1024, // 6MB, serverless payload ceiling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [proxy]
            upstream_url = "https://backend.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.mount_path, "/api/proxy");
        assert_eq!(config.proxy.upstream_env, "BACKEND_URL");
        assert_eq!(config.telemetry.path, "/api/metrics");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.proxy.upstream_base(), Some("https://backend.example"));
    }

    #[test]
    fn test_upstream_base_trims_trailing_slash() {
        let mut upstream = UpstreamConfig::default();
        upstream.upstream_url = Some("https://backend.example/v1/".into());
        assert_eq!(upstream.upstream_base(), Some("https://backend.example/v1"));

        upstream.upstream_url = Some("   ".into());
        assert_eq!(upstream.upstream_base(), None);
    }
}
