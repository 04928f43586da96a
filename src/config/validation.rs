//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check mount paths are well-formed and distinct
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the inbound timeout above the upstream one so upstream timeouts
//!   surface as 504 with CORS headers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - A missing upstream URL is not an error here: preflight still works
//!   without it, and forwarded requests answer 500

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a socket address, got {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error(
        "{field} must start with '/', must not end with '/' and must not contain \
         '{{', '}}' or segments starting with ':' or '*', got {value:?}"
    )]
    InvalidPath { field: &'static str, value: String },

    #[error("telemetry.path {0:?} collides with proxy.mount_path")]
    PathCollision(String),

    #[error("proxy.upstream_url {value:?} is not an absolute http(s) URL")]
    InvalidUpstream { value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must be greater than \
         timeouts.upstream_secs ({upstream_secs})"
    )]
    TimeoutOrder { request_secs: u64, upstream_secs: u64 },
}

/// Check every semantic rule and report all failures.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let mount = &config.proxy.mount_path;
    if !is_mount_path(mount) {
        errors.push(ValidationError::InvalidPath {
            field: "proxy.mount_path",
            value: mount.clone(),
        });
    }

    if config.telemetry.enabled {
        let sink = &config.telemetry.path;
        if !is_mount_path(sink) {
            errors.push(ValidationError::InvalidPath {
                field: "telemetry.path",
                value: sink.clone(),
            });
        } else if sink == mount || sink.starts_with(&format!("{mount}/")) {
            errors.push(ValidationError::PathCollision(sink.clone()));
        }
    }

    if let Some(base) = config.proxy.upstream_base() {
        let valid = Url::parse(base)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidUpstream {
                value: base.to_string(),
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    let timeouts = &config.timeouts;
    if timeouts.upstream_secs > 0
        && timeouts.request_secs > 0
        && timeouts.request_secs <= timeouts.upstream_secs
    {
        errors.push(ValidationError::TimeoutOrder {
            request_secs: timeouts.request_secs,
            upstream_secs: timeouts.upstream_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A literal route prefix: no route-template syntax the router would
/// interpret as a capture or wildcard.
fn is_mount_path(path: &str) -> bool {
    path.len() > 1
        && path.starts_with('/')
        && !path.ends_with('/')
        && !path.contains(['{', '}'])
        && path
            .split('/')
            .skip(1)
            .all(|segment| !segment.is_empty() && !segment.starts_with([':', '*']))
}
