//! JSON-RPC client.
//!
//! This module provides the client that discovers the server's method
//! surface and performs calls against it.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RpcClient`] | Cloneable client handle |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`MethodRegistry`] | Discovered `namespace.method` surface |
//! | [`Namespace`], [`Method`] | Call stubs |
//! | [`Callbacks`] | Success/failure closures for background calls |
//! | [`CallArgs`] | Untyped argument list splitting |
//! | [`ClientEvent`] | `Connected` and `Error` signals |
//!
//! # Lifecycle
//!
//! 1. `ClientBuilder::build` - Create the client (no stubs yet)
//! 2. `RpcClient::reload_methods` - Fetch `system.listMethods`, install stubs
//! 3. `ClientEvent::Connected` - Fired once per installed surface
//! 4. `Namespace::method` / `RpcClient::execute` - Make calls

// ============================================================================
// Submodules
// ============================================================================

/// Untyped argument lists.
pub mod args;

/// Fluent builder for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

/// Callback-style completion.
pub mod dispatch;

/// Client signals.
pub mod events;

/// Method registry and stubs.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use args::{CallArgs, OPTION_KEYS};
pub use builder::ClientBuilder;
pub use core::{LIST_METHODS, Reply, RpcClient};
pub use dispatch::{Callbacks, FailureFn, SuccessFn};
pub use events::{ClientEvent, ClientEventKind, ErrorEvent};
pub use registry::{Method, MethodRegistry, Namespace};
