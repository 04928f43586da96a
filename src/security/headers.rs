//! Header manipulation for forwarded requests and relayed responses.
//!
//! # Responsibilities
//! - Strip per-hop headers before a message crosses the proxy
//! - Leave everything else untouched, `authorization` included
//!
//! # Design Decisions
//! - One explicit denylist, applied by a pure function
//! - The outbound client recomputes framing for the buffered body

use axum::http::HeaderMap;

/// Headers that belong to a single hop and are never copied across the proxy.
pub const FORWARD_HEADER_DENYLIST: &[&str] =
    &["host", "connection", "content-length", "transfer-encoding"];

/// Whether `name` is on the denylist. Case-insensitive.
pub fn is_hop_header(name: &str) -> bool {
    FORWARD_HEADER_DENYLIST
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Copy of `headers` without the denylisted entries. Repeated headers keep
/// all their values, in order.
pub fn filtered_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_header(name.as_str()) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
