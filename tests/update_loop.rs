//! Update loop against a mock web server.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use torrent_webui_client::{
    EventBus, PollConfig, Refresh, RpcClient, UiEvent, UiEventKind, UiSnapshot, UpdateLoop,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

const INTERVAL: Duration = Duration::from_millis(50);

fn counter(bus: &EventBus<UiEvent>, kind: UiEventKind) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    bus.subscribe(kind, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    count
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_snapshots_reach_sink() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(body_partial_json(json!({ "method": "web.update_ui" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "connected": true,
                "torrents": { "abc": { "name": "ubuntu.iso", "state": "Seeding" } },
                "filters": { "state": [["All", 1], ["Seeding", 1]] },
                "stats": { "download_rate": 0.0, "upload_rate": 512.0 }
            },
            "error": null,
            "id": 0
        })))
        .mount(&server)
        .await;

    let client = RpcClient::builder().base_url(server.uri()).build()?;
    let bus = EventBus::new();

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let updates = UpdateLoop::builder(client, bus.clone())
        .config(PollConfig::new().with_interval(INTERVAL))
        .sink(move |snapshot: &UiSnapshot, refresh: Refresh| {
            s.lock().push((snapshot.torrent_count(), refresh));
        })
        .build()?;

    updates.attach();
    bus.emit(&UiEvent::Connect);
    wait_until(|| seen.lock().len() >= 2).await;
    bus.emit(&UiEvent::Disconnect);

    let seen = seen.lock();
    assert!(seen.len() >= 2);
    assert_eq!(seen[0], (1, Refresh::Full));
    assert_eq!(seen[1], (1, Refresh::Incremental));
    assert!(!updates.is_running());
    Ok(())
}

#[tokio::test]
async fn test_three_failures_declare_connection_lost_once() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = RpcClient::builder().base_url(server.uri()).build()?;
    let bus = EventBus::new();
    let lost = counter(&bus, UiEventKind::ConnectionLost);

    let updates = UpdateLoop::builder(client, bus.clone())
        .config(PollConfig::new().with_interval(INTERVAL))
        .build()?;
    updates.start();

    wait_until(|| lost.load(Ordering::SeqCst) > 0).await;
    tokio::time::sleep(INTERVAL * 6).await;

    assert_eq!(lost.load(Ordering::SeqCst), 1);
    assert_eq!(updates.error_count(), 3);
    assert!(!updates.is_running());
    Ok(())
}
