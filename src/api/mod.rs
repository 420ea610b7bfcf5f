//! Typed facade over the discovered method surface.
//!
//! Each namespace the UI relies on gets a small borrowed wrapper with one
//! typed method per remote call. [`REQUIRED_METHODS`] lists every name the
//! wrappers and poll loops use; [`RpcClient::validate_schema`] checks it
//! against the surface the server reported.
//!
//! | Accessor | Namespace |
//! |----------|-----------|
//! | [`RpcClient::web`] | `web` |
//! | [`RpcClient::auth`] | `auth` |
//! | [`RpcClient::core`] | `core` (daemon attached only) |

// ============================================================================
// Submodules
// ============================================================================

/// `auth` namespace.
pub mod auth;

/// `core` namespace.
pub mod core;

/// Result types.
pub mod types;

/// `web` namespace.
pub mod web;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::AuthApi;
pub use self::core::CoreApi;
pub use types::{
    FilterState, HostEntry, PluginList, RemoteEvent, SessionStats, TorrentStatus, UiSnapshot,
};
pub use web::WebApi;

// ============================================================================
// Imports
// ============================================================================

use crate::client::RpcClient;
use crate::error::{Error, Result};

// ============================================================================
// Schema
// ============================================================================

/// Every remote method the typed facade and poll loops call.
pub const REQUIRED_METHODS: &[&str] = &[
    web::CONNECTED,
    web::UPDATE_UI,
    web::GET_TORRENT_STATUS,
    web::GET_EVENTS,
    web::REGISTER_EVENT_LISTENER,
    web::DEREGISTER_EVENT_LISTENER,
    web::GET_PLUGINS,
    web::GET_HOSTS,
    web::CONNECT,
    web::DISCONNECT,
    auth::LOGIN,
    auth::CHECK_SESSION,
    auth::DELETE_SESSION,
];

// ============================================================================
// RpcClient - Typed Access
// ============================================================================

impl RpcClient {
    /// Returns the `web` namespace facade.
    #[inline]
    #[must_use]
    pub fn web(&self) -> WebApi<'_> {
        WebApi::new(self)
    }

    /// Returns the `auth` namespace facade.
    #[inline]
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Returns the `core` namespace facade.
    #[inline]
    #[must_use]
    pub fn core(&self) -> CoreApi<'_> {
        CoreApi::new(self)
    }

    /// Checks that the server exposes every method in [`REQUIRED_METHODS`].
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] before introspection completed
    /// - [`Error::MethodNotFound`] naming the first missing method
    pub fn validate_schema(&self) -> Result<()> {
        let registry = self.registry()?;
        match REQUIRED_METHODS.iter().find(|name| !registry.contains(name)) {
            Some(missing) => Err(Error::method_not_found(*missing)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
