//! Typed calls of the `core` namespace.
//!
//! The web server only lists `core` methods while it is attached to a
//! daemon, so none of them are part of the required schema.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value, json};

use crate::client::RpcClient;
use crate::error::Result;
use crate::identifiers::TorrentId;

use super::types::FilterState;

// ============================================================================
// Method Names
// ============================================================================

/// `core.get_torrents_status`
pub const GET_TORRENTS_STATUS: &str = "core.get_torrents_status";
/// `core.pause_torrent`
pub const PAUSE_TORRENT: &str = "core.pause_torrent";
/// `core.resume_torrent`
pub const RESUME_TORRENT: &str = "core.resume_torrent";
/// `core.remove_torrent`
pub const REMOVE_TORRENT: &str = "core.remove_torrent";
/// `core.get_config_value`
pub const GET_CONFIG_VALUE: &str = "core.get_config_value";

// ============================================================================
// CoreApi
// ============================================================================

/// Typed facade over the daemon's `core` namespace.
#[derive(Debug, Clone, Copy)]
pub struct CoreApi<'a> {
    client: &'a RpcClient,
}

impl<'a> CoreApi<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    /// Fetches `keys` of every torrent matching `filters`, keyed by id.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn get_torrents_status<K: AsRef<str>>(
        &self,
        filters: &FilterState,
        keys: &[K],
    ) -> Result<Map<String, Value>> {
        let keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        self.client
            .call_as(
                GET_TORRENTS_STATUS,
                vec![Value::Object(filters.clone()), json!(keys)],
            )
            .await
    }

    /// Pauses the given torrents.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn pause_torrent(&self, ids: &[TorrentId]) -> Result<()> {
        self.client.execute(PAUSE_TORRENT, vec![json!(ids)]).await?;
        Ok(())
    }

    /// Resumes the given torrents.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn resume_torrent(&self, ids: &[TorrentId]) -> Result<()> {
        self.client.execute(RESUME_TORRENT, vec![json!(ids)]).await?;
        Ok(())
    }

    /// Removes one torrent, optionally with its data.
    ///
    /// Returns whether the daemon removed it.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn remove_torrent(&self, id: &TorrentId, remove_data: bool) -> Result<bool> {
        self.client
            .call_as(REMOVE_TORRENT, vec![json!(id), json!(remove_data)])
            .await
    }

    /// Reads one daemon configuration value.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn get_config_value(&self, key: &str) -> Result<Value> {
        self.client.call(GET_CONFIG_VALUE, vec![json!(key)]).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::transport::Transport;
    use crate::transport::testing::{Reply, ScriptedTransport};

    #[tokio::test]
    async fn test_get_torrents_status_params() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(
            GET_TORRENTS_STATUS,
            Reply::Result(json!({ "abc": { "name": "ubuntu.iso" } })),
        );
        let client = RpcClient::with_transport(Arc::clone(&transport) as Arc<dyn Transport>);

        let torrents = client
            .core()
            .get_torrents_status(&FilterState::new(), &["name"])
            .await
            .expect("call");
        assert_eq!(torrents["abc"]["name"], json!("ubuntu.iso"));

        let request = transport.requests().pop().expect("request");
        assert_eq!(request.params, vec![json!({}), json!(["name"])]);
    }

    #[tokio::test]
    async fn test_pause_sends_id_list() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(PAUSE_TORRENT, Reply::Result(Value::Null));
        let client = RpcClient::with_transport(Arc::clone(&transport) as Arc<dyn Transport>);

        client
            .core()
            .pause_torrent(&[TorrentId::from("a"), TorrentId::from("b")])
            .await
            .expect("call");

        let request = transport.requests().pop().expect("request");
        assert_eq!(request.params, vec![json!(["a", "b"])]);
    }
}
