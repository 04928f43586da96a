//! Edge proxy for the patient portal.
//!
//! Forwards browser calls mounted under a fixed prefix to a configured
//! upstream, adds CORS headers to every answer, and collects web-vitals
//! telemetry. Runs as a standalone server or handles serverless function
//! events one at a time.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod security;
pub mod telemetry;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::EdgeProxy;
