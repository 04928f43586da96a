//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, limits)
//!     → request.rs (buffer into InboundRequest)
//!     → proxy (dispatch, upstream call)
//!     → response.rs (RelayedResponse with CORS)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundBody, InboundRequest, OutboundRequest, X_REQUEST_ID};
pub use response::{RelayedResponse, UpstreamResponse};
pub use server::HttpServer;
