//! Fixed-interval polling.
//!
//! Two loops keep the hosting UI in sync with the server:
//!
//! | Loop | Calls | Publishes |
//! |------|-------|-----------|
//! | [`UpdateLoop`] | `web.update_ui`, `web.get_torrent_status` | [`UpdateSink`] fan-out, `ConnectionLost`, `Disconnect`, `ConnectionRestored` |
//! | [`EventPoller`] | `web.register_event_listener`, `web.get_events` | `UiEvent::Remote` |
//!
//! Both follow the same rules: `start` on a running loop and `stop` on a
//! stopped loop are no-ops, and a response that arrives after `stop` is
//! dropped without touching any state.
//!
//! The hosting UI plugs in through three small traits:
//!
//! - [`FilterSource`] - current filter selection
//! - [`DetailSource`] - currently focused torrent and tab
//! - [`UpdateSink`] - receives snapshots and detail records
//!
//! Closures implement the two source traits, and `Fn(&UiSnapshot, Refresh)`
//! implements [`UpdateSink`].

// ============================================================================
// Submodules
// ============================================================================

/// Poll configuration.
pub mod config;

/// Server event poller.
pub mod remote;

/// UI update loop.
pub mod update;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{DEFAULT_ERROR_THRESHOLD, DEFAULT_INTERVAL, PollConfig};
pub use remote::EventPoller;
pub use update::{UpdateLoop, UpdateLoopBuilder};

// ============================================================================
// Imports
// ============================================================================

use crate::api::{FilterState, TorrentStatus, UiSnapshot};
use crate::identifiers::TorrentId;
use crate::protocol::DetailTab;

// ============================================================================
// PollState
// ============================================================================

/// Run state of a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// No timer active.
    #[default]
    Stopped,
    /// Ticking every interval.
    Running,
}

// ============================================================================
// Refresh
// ============================================================================

/// How a sink should apply a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Filters changed since the previous tick; reload everything.
    Full,
    /// Filters unchanged; patch the existing rows.
    Incremental,
}

// ============================================================================
// Traits
// ============================================================================

/// Supplies the filter selection sent with each tick.
pub trait FilterSource: Send + Sync {
    /// Returns the current filter selection.
    fn filter_states(&self) -> FilterState;
}

impl<F> FilterSource for F
where
    F: Fn() -> FilterState + Send + Sync,
{
    fn filter_states(&self) -> FilterState {
        self()
    }
}

/// Supplies the record whose details are refreshed on each tick.
pub trait DetailSource: Send + Sync {
    /// Returns the focused torrent and tab, if any.
    fn focused(&self) -> Option<(TorrentId, DetailTab)>;
}

impl<F> DetailSource for F
where
    F: Fn() -> Option<(TorrentId, DetailTab)> + Send + Sync,
{
    fn focused(&self) -> Option<(TorrentId, DetailTab)> {
        self()
    }
}

/// Receives the results of each successful tick.
pub trait UpdateSink: Send + Sync {
    /// Applies a batch snapshot.
    fn update(&self, snapshot: &UiSnapshot, refresh: Refresh);

    /// Applies a refreshed detail record.
    fn detail(&self, id: &TorrentId, tab: DetailTab, status: &TorrentStatus) {
        let _ = (id, tab, status);
    }
}

impl<F> UpdateSink for F
where
    F: Fn(&UiSnapshot, Refresh) + Send + Sync,
{
    fn update(&self, snapshot: &UiSnapshot, refresh: Refresh) {
        self(snapshot, refresh);
    }
}
