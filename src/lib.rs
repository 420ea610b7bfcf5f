//! Torrent Web UI client - JSON-RPC over HTTP with UI polling.
//!
//! This library talks to a torrent client's web server through its
//! `/json` endpoint and keeps a hosting UI in sync with it.
//!
//! # Architecture
//!
//! The client discovers its API at runtime:
//!
//! - **Introspection**: `system.listMethods` returns every `namespace.method`
//!   name; the client installs one call stub per name
//! - **Calls**: one HTTP POST per call, body `{"method", "params", "id"}`,
//!   ids counting up from 0
//! - **Errors**: HTTP failures are turned into the same error object the
//!   server sends (`code` 255) and published on the error signal
//! - **Polling**: a 2-second loop fetches batch UI state and declares the
//!   connection lost after 3 consecutive failures
//!
//! # Quick Start
//!
//! ```no_run
//! use torrent_webui_client::{
//!     EventBus, Refresh, Result, RpcClient, UiEvent, UiSnapshot, UpdateLoop,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = RpcClient::builder()
//!         .base_url("http://localhost:8112/")
//!         .connect()
//!         .await?;
//!
//!     if client.auth().login("deluge").await? {
//!         let bus = EventBus::new();
//!         let updates = UpdateLoop::builder(client.clone(), bus.clone())
//!             .sink(|snapshot: &UiSnapshot, _: Refresh| {
//!                 println!("{} torrents", snapshot.torrent_count());
//!             })
//!             .build()?;
//!
//!         updates.attach();
//!         bus.emit(&UiEvent::Login);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Typed facade: [`WebApi`], [`AuthApi`], [`CoreApi`] |
//! | [`client`] | [`RpcClient`], method stubs, callbacks |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`events`] | [`EventBus`] and [`UiEvent`] |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`poll`] | [`UpdateLoop`] and [`EventPoller`] |
//! | [`protocol`] | JSON-RPC message types |
//! | [`transport`] | HTTP transport |

// ============================================================================
// Modules
// ============================================================================

/// Typed facade over the discovered methods.
pub mod api;

/// JSON-RPC client, method registry and call stubs.
///
/// Use [`RpcClient::builder()`] to create a configured client.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Typed publish/subscribe events.
pub mod events;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Fixed-interval poll loops.
pub mod poll;

/// JSON-RPC message types.
pub mod protocol;

/// HTTP transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// API types
pub use api::{
    AuthApi, CoreApi, FilterState, HostEntry, PluginList, REQUIRED_METHODS, RemoteEvent,
    SessionStats, TorrentStatus, UiSnapshot, WebApi,
};

// Client types
pub use client::{
    CallArgs, Callbacks, ClientBuilder, ClientEvent, ClientEventKind, ErrorEvent, Method,
    MethodRegistry, Namespace, Reply, RpcClient,
};

// Error types
pub use error::{Error, Result};

// Event types
pub use events::{Event, EventBus, UiEvent, UiEventKind};

// Identifier types
pub use identifiers::{RequestId, SubscriptionId, TorrentId};

// Poll types
pub use poll::{
    DetailSource, EventPoller, FilterSource, PollConfig, PollState, Refresh, UpdateLoop,
    UpdateLoopBuilder, UpdateSink,
};

// Protocol types
pub use protocol::{DetailTab, MethodName, Request, Response, RpcError};

// Transport types
pub use transport::{HttpTransport, Transport};
