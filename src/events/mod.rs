//! Typed events and the publish/subscribe bus.
//!
//! Two event families exist:
//!
//! | Family | Emitted by | Kinds |
//! |--------|------------|-------|
//! | [`ClientEvent`](crate::client::ClientEvent) | `RpcClient` | `Connected`, `Error` |
//! | [`UiEvent`] | poll loops, hosting UI | `Login`, `Logout`, `Connect`, `Disconnect`, `ConnectionLost`, `ConnectionRestored`, `Remote` |
//!
//! # Example
//!
//! ```ignore
//! use torrent_webui_client::{EventBus, UiEvent, UiEventKind};
//!
//! let bus = EventBus::<UiEvent>::new();
//! bus.subscribe(UiEventKind::ConnectionLost, |event| {
//!     eprintln!("lost connection: {event:?}");
//! });
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Debug;
use std::hash::Hash;

// ============================================================================
// Submodules
// ============================================================================

/// Generic publish/subscribe bus.
pub mod bus;

/// Session-level UI events.
pub mod ui;

// ============================================================================
// Re-exports
// ============================================================================

pub use bus::{EventBus, Handler};
pub use ui::{UiEvent, UiEventKind};

// ============================================================================
// Event
// ============================================================================

/// An event that can travel over an [`EventBus`].
pub trait Event: Send + Sync + 'static {
    /// Discriminant used to key subscriber lists.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns this event's kind.
    fn kind(&self) -> Self::Kind;
}
