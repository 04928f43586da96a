//! Serverless event envelope through the proxy to a live upstream.

use axum::http::StatusCode;
use edge_proxy::proxy::{EdgeProxy, FunctionEvent};

mod common;

fn event(json: serde_json::Value) -> FunctionEvent {
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn test_base64_upload_reaches_upstream_as_bytes() {
    let (backend_addr, mut captured) =
        common::start_recording_backend(StatusCode::OK, r#"{"stored":true}"#).await;
    let proxy = EdgeProxy::new(&common::config_for(Some(backend_addr))).unwrap();

    let response = proxy
        .handle_event(event(serde_json::json!({
            "httpMethod": "POST",
            "path": "/api/proxy/upload",
            "rawQuery": "folder=labs",
            "headers": {
                "content-type": "application/octet-stream",
                "content-length": "8",
                "host": "portal.example",
                "connection": "keep-alive",
                "origin": "https://portal.example"
            },
            "body": "aGVsbG8=",
            "isBase64Encoded": true
        })))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_deref(), Some(r#"{"stored":true}"#));
    assert!(!response.is_base64_encoded);
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "https://portal.example"
    );

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.uri.path(), "/upload");
    assert_eq!(seen.uri.query(), Some("folder=labs"));
    assert_eq!(&seen.body[..], b"hello");
    assert_eq!(seen.headers["content-length"], "5");
    assert_ne!(seen.headers["host"], "portal.example");
}

#[tokio::test]
async fn test_get_event_drops_body() {
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, "[]").await;
    let proxy = EdgeProxy::new(&common::config_for(Some(backend_addr))).unwrap();

    let response = proxy
        .handle_event(event(serde_json::json!({
            "httpMethod": "GET",
            "path": "/api/proxy/medications",
            "headers": {},
            "body": "should not be sent"
        })))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["access-control-allow-origin"], "*");

    let seen = captured.recv().await.unwrap();
    assert!(seen.body.is_empty());
    assert!(!seen.headers.contains_key("content-length"));
}

#[tokio::test]
async fn test_missing_upstream_event_is_500() {
    let proxy = EdgeProxy::new(&common::config_for(None)).unwrap();

    let response = proxy
        .handle_event(event(serde_json::json!({
            "httpMethod": "DELETE",
            "path": "/api/proxy/documents/3"
        })))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body.as_deref(), Some("Missing BACKEND_URL env var"));
}
