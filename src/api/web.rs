//! Typed calls of the `web` namespace.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

use crate::client::RpcClient;
use crate::error::Result;
use crate::identifiers::TorrentId;

use super::types::{FilterState, HostEntry, PluginList, RemoteEvent, TorrentStatus, UiSnapshot};

// ============================================================================
// Method Names
// ============================================================================

/// `web.connected`
pub const CONNECTED: &str = "web.connected";
/// `web.update_ui`
pub const UPDATE_UI: &str = "web.update_ui";
/// `web.get_torrent_status`
pub const GET_TORRENT_STATUS: &str = "web.get_torrent_status";
/// `web.get_events`
pub const GET_EVENTS: &str = "web.get_events";
/// `web.register_event_listener`
pub const REGISTER_EVENT_LISTENER: &str = "web.register_event_listener";
/// `web.deregister_event_listener`
pub const DEREGISTER_EVENT_LISTENER: &str = "web.deregister_event_listener";
/// `web.get_plugins`
pub const GET_PLUGINS: &str = "web.get_plugins";
/// `web.get_hosts`
pub const GET_HOSTS: &str = "web.get_hosts";
/// `web.connect`
pub const CONNECT: &str = "web.connect";
/// `web.disconnect`
pub const DISCONNECT: &str = "web.disconnect";

// ============================================================================
// WebApi
// ============================================================================

/// Typed facade over the `web` namespace.
#[derive(Debug, Clone, Copy)]
pub struct WebApi<'a> {
    client: &'a RpcClient,
}

impl<'a> WebApi<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    /// Returns whether the web server is attached to a daemon.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn connected(&self) -> Result<bool> {
        self.client.call_as(CONNECTED, Vec::new()).await
    }

    /// Fetches the batch UI state for the grid `keys` and `filters`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn update_ui<K: AsRef<str>>(&self, keys: &[K], filters: &FilterState) -> Result<UiSnapshot> {
        self.client
            .call_as(UPDATE_UI, vec![key_list(keys), Value::Object(filters.clone())])
            .await
    }

    /// Fetches `keys` of one torrent.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn get_torrent_status<K: AsRef<str>>(
        &self,
        id: &TorrentId,
        keys: &[K],
    ) -> Result<TorrentStatus> {
        self.client
            .call_as(GET_TORRENT_STATUS, vec![json!(id), key_list(keys)])
            .await
    }

    /// Drains the events queued for this session.
    ///
    /// The server answers `null` when nothing arrived in time; that is
    /// returned as an empty list.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn get_events(&self) -> Result<Vec<RemoteEvent>> {
        let events: Option<Vec<RemoteEvent>> = self.client.call_as(GET_EVENTS, Vec::new()).await?;
        Ok(events.unwrap_or_default())
    }

    /// Asks the server to queue events named `name` for this session.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn register_event_listener(&self, name: &str) -> Result<()> {
        self.client
            .execute(REGISTER_EVENT_LISTENER, vec![json!(name)])
            .await?;
        Ok(())
    }

    /// Stops queueing events named `name` for this session.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn deregister_event_listener(&self, name: &str) -> Result<()> {
        self.client
            .execute(DEREGISTER_EVENT_LISTENER, vec![json!(name)])
            .await?;
        Ok(())
    }

    /// Lists enabled and available web UI plugins.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn get_plugins(&self) -> Result<PluginList> {
        self.client.call_as(GET_PLUGINS, Vec::new()).await
    }

    /// Lists the configured daemon hosts.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn get_hosts(&self) -> Result<Vec<HostEntry>> {
        self.client.call_as(GET_HOSTS, Vec::new()).await
    }

    /// Attaches the web server to the daemon `host_id`.
    ///
    /// Returns the server's raw answer.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn connect(&self, host_id: &str) -> Result<Value> {
        self.client.call(CONNECT, vec![json!(host_id)]).await
    }

    /// Detaches the web server from its daemon.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn disconnect(&self) -> Result<()> {
        self.client.execute(DISCONNECT, Vec::new()).await?;
        Ok(())
    }
}

/// Encodes a key list as a JSON array.
fn key_list<K: AsRef<str>>(keys: &[K]) -> Value {
    Value::Array(keys.iter().map(|k| Value::from(k.as_ref())).collect())
}

// ============================================================================
// Tests
// ============================================================================
