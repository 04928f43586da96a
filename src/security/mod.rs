//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → headers.rs (drop per-hop headers before forwarding)
//!     → cors.rs (capture Origin / Access-Control-Request-Headers)
//! Upstream response:
//!     → headers.rs (drop framing headers)
//!     → cors.rs (merge CORS headers, CORS keys win)
//! ```

pub mod cors;
pub mod headers;

pub use cors::CorsPolicy;
pub use headers::{filtered_headers, FORWARD_HEADER_DENYLIST};
