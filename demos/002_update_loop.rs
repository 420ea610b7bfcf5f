//! UI update loop and server events.
//!
//! Demonstrates:
//! - Driving the update loop from session events
//! - Receiving snapshots through a sink
//! - Connection loss and restore signals
//! - Subscribing to server-pushed events
//!
//! Usage:
//!   cargo run --example 002_update_loop
//!   cargo run --example 002_update_loop -- --no-wait
//!   cargo run --example 002_update_loop -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use torrent_webui_client::{
    EventBus, EventPoller, Refresh, Result, RpcClient, UiEvent, UiEventKind, UiSnapshot,
    UpdateLoop,
};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== 002: Update Loop ===\n");

    // ========================================================================
    // Connect
    // ========================================================================

    println!("[1] Connecting to {}...", args.url);

    let client = RpcClient::builder().base_url(&args.url).connect().await?;
    let bus = EventBus::new();

    println!("    ✓ Connected\n");

    // ========================================================================
    // Wire Loops
    // ========================================================================

    println!("[2] Wiring loops...");

    let updates = UpdateLoop::builder(client.clone(), bus.clone())
        .sink(|snapshot: &UiSnapshot, refresh: Refresh| {
            let rate = snapshot.stats.download_rate.unwrap_or(0.0);
            println!(
                "    [{refresh:?}] {} torrents, {:.1} KiB/s down",
                snapshot.torrent_count(),
                rate / 1024.0
            );
        })
        .build()?;
    updates.attach();

    let events = EventPoller::new(client.clone(), bus.clone());
    events.attach();
    events.on("TorrentAddedEvent", |args| println!("    [event] torrent added: {args:?}"));
    events.on("TorrentRemovedEvent", |args| println!("    [event] torrent removed: {args:?}"));

    bus.subscribe(UiEventKind::ConnectionLost, |event| {
        println!("    ✗ {event:?}");
    });
    bus.subscribe(UiEventKind::ConnectionRestored, |event| {
        println!("    ✓ {event:?}");
    });

    println!("    ✓ Update loop and event poller attached\n");

    // ========================================================================
    // Login
    // ========================================================================

    println!("[3] Logging in...");

    if !client.auth().login(&args.password).await? {
        println!("    ✗ Login refused");
        return Ok(());
    }
    bus.emit(&UiEvent::Login);

    println!("    ✓ Polling every {:?}\n", updates.config().interval);

    common::wait_for_exit(args.no_wait).await;

    // ========================================================================
    // Cleanup
    // ========================================================================

    println!("\n[Cleanup] Logging out...");
    bus.emit(&UiEvent::Logout);
    client.auth().delete_session().await?;
    println!("          ✓ Done");

    Ok(())
}
