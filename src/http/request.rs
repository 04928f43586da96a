//! Request handling and transformation.
//!
//! # Responsibilities
//! - Capture the inbound request independent of where it came from
//!   (axum listener or serverless event)
//! - Decode base64 upload bodies
//! - Carry the request ID generated at the edge
//!
//! # Design Decisions
//! - Bodies are fully buffered; the upstream call is a single round trip
//! - The `x-request-id` header is forwarded like any other header

use std::error::Error as StdError;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, Uri},
};
use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};
use http_body_util::LengthLimitError;
use url::Url;

use crate::error::ProxyError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Standard alphabet, padding optional, like most serverless runtimes emit.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Inbound body as the transport delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InboundBody {
    #[default]
    Empty,
    /// Raw bytes from a native listener.
    Bytes(Bytes),
    /// Plain text from an event envelope.
    Text(String),
    /// Base64 text from an event envelope flagged `isBase64Encoded`.
    Base64(String),
}

impl InboundBody {
    /// Bytes to put on the wire. `None` means "send no body".
    pub fn into_bytes(self) -> Result<Option<Bytes>, ProxyError> {
        match self {
            InboundBody::Empty => Ok(None),
            InboundBody::Bytes(bytes) => Ok(Some(bytes)),
            InboundBody::Text(text) => Ok(Some(Bytes::from(text))),
            InboundBody::Base64(encoded) => {
                let compact: Vec<u8> = encoded
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                BASE64
                    .decode(compact)
                    .map(|raw| Some(Bytes::from(raw)))
                    .map_err(|e| ProxyError::MalformedPayload(format!("Invalid base64 body: {e}")))
            }
        }
    }
}

/// A request as received at the edge.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: InboundBody,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().filter(|q| !q.is_empty()).map(str::to_string),
            headers: HeaderMap::new(),
            body: InboundBody::Empty,
        }
    }

    /// Buffer an axum request, reading at most `limit` body bytes.
    pub async fn from_axum(request: Request<Body>, limit: usize) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
            if exceeds_limit(&e) {
                ProxyError::PayloadTooLarge
            } else {
                ProxyError::InvalidRequest(format!("Failed to read request body: {e}"))
            }
        })?;

        let mut inbound = Self::new(parts.method, &parts.uri);
        inbound.headers = parts.headers;
        if !bytes.is_empty() {
            inbound.body = InboundBody::Bytes(bytes);
        }
        Ok(inbound)
    }

    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Whether a body read failed because the length limit was hit, either
/// ours or the one `RequestBodyLimitLayer` wraps around chunked bodies.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// A request ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}
