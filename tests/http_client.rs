//! End-to-end client tests against a mock web server.

// ============================================================================
// Imports
// ============================================================================

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use torrent_webui_client::{Callbacks, Error, RpcClient};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn endpoint(server: &MockServer) -> String {
    format!("{}/json", server.uri())
}

fn ok(result: Value, id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result, "error": null, "id": id }))
}

async fn mount_methods(server: &MockServer, names: Value) {
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(body_partial_json(json!({ "method": "system.listMethods" })))
        .respond_with(ok(names, 0))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_introspection_builds_isolated_namespaces() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_methods(&server, json!(["core.add", "core.remove", "web.update"])).await;

    let client = RpcClient::builder().url(endpoint(&server)).connect().await?;

    assert_eq!(client.namespaces(), vec!["core", "web"]);
    assert!(client.method("core.add").is_ok());
    assert!(client.method("core.remove").is_ok());
    assert!(client.method("web.update").is_ok());
    assert!(matches!(
        client.method("core.update"),
        Err(Error::MethodNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_first_call_body_and_success_callback() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "method": "foo.bar", "params": [1, 2], "id": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 42, "id": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RpcClient::builder().url(endpoint(&server)).build()?;

    let (tx, rx) = oneshot::channel();
    client
        .dispatch(
            "foo.bar",
            vec![json!(1), json!(2)],
            Callbacks::new().on_success(move |result, _, _| {
                let _ = tx.send(result);
            }),
        )
        .await?;

    assert_eq!(rx.await?, json!(42));
    Ok(())
}

#[tokio::test]
async fn test_http_500_reaches_listener_and_failure_callback() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RpcClient::builder().url(endpoint(&server)).build()?;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    client.on_error(move |event| s.lock().push((event.status, event.response.clone())));

    let (tx, rx) = oneshot::channel();
    client
        .dispatch(
            "web.update_ui",
            Vec::new(),
            Callbacks::new().on_failure(move |response, http| {
                let _ = tx.send((response.clone(), http.map(|h| h.status)));
            }),
        )
        .await?;

    let (delivered, status) = rx.await?;
    assert_eq!(status, Some(500));
    assert_eq!(
        serde_json::to_value(&delivered)?,
        json!({
            "id": 0,
            "result": null,
            "error": { "message": "HTTP: 500 Internal Server Error", "code": 255 }
        })
    );

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, 500);
    assert_eq!(seen[0].1, delivered);
    Ok(())
}

#[tokio::test]
async fn test_session_cookie_is_replayed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(body_partial_json(json!({ "method": "auth.login" })))
        .respond_with(ok(json!("5f1c0a"), 0).insert_header("set-cookie", "_session_id=5f1c0a"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(body_partial_json(json!({ "method": "auth.check_session" })))
        .and(header("cookie", "_session_id=5f1c0a"))
        .respond_with(ok(json!(true), 1))
        .expect(1)
        .mount(&server)
        .await;

    let client = RpcClient::builder().url(endpoint(&server)).build()?;

    assert!(client.auth().login("deluge").await?);
    assert!(client.auth().check_session().await?);
    Ok(())
}

#[tokio::test]
async fn test_base_url_targets_json_endpoint() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_methods(&server, json!(["web.connected"])).await;

    let client = RpcClient::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .connect()
        .await?;

    assert!(client.has_method("web.connected"));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let url = format!("http://{}/json", listener.local_addr()?);
    drop(listener);

    let client = RpcClient::builder()
        .url(url)
        .timeout(Duration::from_secs(2))
        .build()?;

    let err = client.call("web.connected", Vec::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport { status: 0, .. }));
    Ok(())
}
