//! End-to-end forwarding through a real listener and a mock upstream.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_get_is_rewritten_to_upstream() {
    let (backend_addr, mut captured) =
        common::start_recording_backend(StatusCode::OK, r#"{"id":42}"#).await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/api/proxy/users/42?active=true"))
        .header("origin", "https://app.example")
        .header("authorization", "Bearer patient-token")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "https://app.example");
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
    assert_eq!(res.headers()["vary"], "Origin");
    assert_eq!(res.headers()["x-upstream"], "mock");
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"id":42}"#);

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.uri.path(), "/users/42");
    assert_eq!(seen.uri.query(), Some("active=true"));
    assert_eq!(seen.headers["authorization"], "Bearer patient-token");
    assert_eq!(seen.headers["origin"], "https://app.example");
    assert_eq!(seen.headers["host"], backend_addr.to_string().as_str());
    assert!(seen.headers.contains_key("x-request-id"));
    assert!(seen.body.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_body_and_method_are_forwarded() {
    let (backend_addr, mut captured) =
        common::start_recording_backend(StatusCode::CREATED, r#"{"ok":true}"#).await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let payload = r#"{"symptoms":["cough"]}"#;
    let res = common::client()
        .post(format!("http://{proxy_addr}/api/proxy/symptom-check"))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.uri.path(), "/symptom-check");
    assert_eq!(seen.uri.query(), None);
    assert_eq!(seen.headers["content-type"], "application/json");
    assert_eq!(seen.headers["content-length"], payload.len().to_string().as_str());
    assert_eq!(&seen.body[..], payload.as_bytes());

    shutdown.trigger();
}

#[tokio::test]
async fn test_every_method_keeps_its_verb() {
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, "{}").await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;
    let client = common::client();

    for method in [
        reqwest::Method::PUT,
        reqwest::Method::PATCH,
        reqwest::Method::DELETE,
    ] {
        let res = client
            .request(method.clone(), format!("http://{proxy_addr}/api/proxy/appointments/7"))
            .body("{}")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);

        let seen = captured.recv().await.unwrap();
        assert_eq!(seen.method, method);
        assert_eq!(seen.uri.path(), "/appointments/7");
        assert_eq!(&seen.body[..], b"{}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_errors_pass_through_with_cors() {
    let (backend_addr, _captured) =
        common::start_recording_backend(StatusCode::NOT_FOUND, r#"{"error":"no such record"}"#).await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/api/proxy/records/9"))
        .header("origin", "https://app.example")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    // The upstream's own CORS origin is replaced by the caller's.
    assert_eq!(res.headers()["access-control-allow-origin"], "https://app.example");
    assert_eq!(res.text().await.unwrap(), r#"{"error":"no such record"}"#);

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_never_reaches_upstream() {
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, "{}").await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{proxy_addr}/api/proxy/users"),
        )
        .header("origin", "https://app.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization, content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 204);
    assert_eq!(res.headers()["access-control-allow-origin"], "https://app.example");
    assert_eq!(
        res.headers()["access-control-allow-methods"],
        "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    );
    assert_eq!(
        res.headers()["access-control-allow-headers"],
        "authorization, content-type"
    );
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
    assert!(res.bytes().await.unwrap().is_empty());
    assert!(captured.try_recv().is_err());

    shutdown.trigger();
}

#[tokio::test]
async fn test_mount_root_forwards_to_upstream_root() {
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, "{}").await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/api/proxy?page=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.uri.path(), "/");
    assert_eq!(seen.uri.query(), Some("page=2"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_paths_outside_mount_are_not_proxied() {
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, "{}").await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .get(format!("http://{proxy_addr}/api/proxyfoo"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert!(captured.try_recv().is_err());

    shutdown.trigger();
}

#[tokio::test]
async fn test_head_reports_upstream_length() {
    let resource = r#"{"record":"a1b2"}"#;
    let (backend_addr, mut captured) = common::start_recording_backend(StatusCode::OK, resource).await;
    let (proxy_addr, shutdown) = common::start_proxy(common::config_for(Some(backend_addr))).await;

    let res = common::client()
        .head(format!("http://{proxy_addr}/api/proxy/records/7"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-length"], resource.len().to_string().as_str());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert!(res.bytes().await.unwrap().is_empty());

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.method, "HEAD");
    assert_eq!(seen.uri.path(), "/records/7");

    shutdown.trigger();
}
