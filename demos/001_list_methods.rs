//! Method discovery and direct calls.
//!
//! Demonstrates:
//! - Building a client from the web UI base URL
//! - Introspection and the namespace/method registry
//! - Logging in and checking the required schema
//! - Typed calls through the `web` facade
//!
//! Usage:
//!   cargo run --example 001_list_methods
//!   cargo run --example 001_list_methods -- --url http://host:8112/ --password secret
//!   cargo run --example 001_list_methods -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use torrent_webui_client::{Result, RpcClient};

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
    println!("=== 001: List Methods ===\n");

    // ========================================================================
    // Connect
    // ========================================================================

    println!("[1] Connecting to {}...", args.url);

    let client = RpcClient::builder().base_url(&args.url).connect().await?;
    let registry = client.registry()?;

    println!("    ✓ {} methods discovered\n", registry.len());

    // ========================================================================
    // Registry
    // ========================================================================

    println!("[2] Namespaces:");
    for namespace in registry.namespaces() {
        let methods = registry.methods_of(namespace);
        println!("    {namespace} ({} methods)", methods.len());
        for method in methods {
            println!("        {namespace}.{method}");
        }
    }
    println!();

    // ========================================================================
    // Login
    // ========================================================================

    println!("[3] Logging in...");

    if !client.auth().login(&args.password).await? {
        println!("    ✗ Login refused");
        return Ok(());
    }
    println!("    ✓ Logged in");

    match client.validate_schema() {
        Ok(()) => println!("    ✓ Schema complete\n"),
        Err(e) => println!("    ✗ {e}\n"),
    }

    // ========================================================================
    // Typed Calls
    // ========================================================================

    println!("[4] Web server state...");

    let web = client.web();
    println!("    Daemon attached: {}", web.connected().await?);

    for host in web.get_hosts().await? {
        println!("    Host {}: {}@{}:{}", host.id, host.username, host.host, host.port);
    }

    let plugins = web.get_plugins().await?;
    println!("    Plugins enabled: {:?}", plugins.enabled_plugins);

    println!("\n=== Done ===");
    Ok(())
}
