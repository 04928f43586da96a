//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path + query
//!     → mount.rs (strip mount prefix)
//!     → mount.rs (join with upstream base)
//!     → Return: upstream Url or InvalidRequest
//! ```
//!
//! # Design Decisions
//! - One mount per proxy instance, fixed at startup
//! - No regex in hot path (prefix matching only)

pub mod mount;

pub use mount::{upstream_url, Mount};
