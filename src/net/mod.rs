//! Network layer.
//!
//! Plain TCP listeners come straight from tokio; this module only adds
//! TLS termination for deployments without a fronting load balancer.

pub mod tls;
