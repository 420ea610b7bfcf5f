//! Typed results of the web API.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::TorrentId;

// ============================================================================
// Types
// ============================================================================

/// Filter selection sent with `web.update_ui` (e.g. `{"state": "Seeding"}`).
pub type FilterState = Map<String, Value>;

/// Per-torrent status keyed by requested status key.
pub type TorrentStatus = Map<String, Value>;

// ============================================================================
// UiSnapshot
// ============================================================================

/// Batch state returned by `web.update_ui`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    /// Whether the web server is attached to a daemon.
    pub connected: bool,

    /// Torrents matching the filters, keyed by id.
    #[serde(default)]
    pub torrents: Option<Map<String, Value>>,

    /// Filter tree for the sidebar.
    #[serde(default)]
    pub filters: Option<Value>,

    /// Session statistics for the status bar.
    #[serde(default)]
    pub stats: SessionStats,
}

impl UiSnapshot {
    /// Returns the number of torrents in the snapshot.
    #[inline]
    #[must_use]
    pub fn torrent_count(&self) -> usize {
        self.torrents.as_ref().map_or(0, Map::len)
    }

    /// Returns the status of one torrent.
    #[must_use]
    pub fn torrent(&self, id: &TorrentId) -> Option<&Value> {
        self.torrents.as_ref()?.get(id.as_str())
    }
}

// ============================================================================
// SessionStats
// ============================================================================

/// Session statistics; every field is optional because a disconnected
/// server only reports the configured limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Configured download limit.
    #[serde(default)]
    pub max_download: Option<f64>,
    /// Configured upload limit.
    #[serde(default)]
    pub max_upload: Option<f64>,
    /// Configured connection limit.
    #[serde(default)]
    pub max_num_connections: Option<i64>,
    /// Connected peers.
    #[serde(default)]
    pub num_connections: Option<i64>,
    /// Payload upload rate in bytes/s.
    #[serde(default)]
    pub upload_rate: Option<f64>,
    /// Payload download rate in bytes/s.
    #[serde(default)]
    pub download_rate: Option<f64>,
    /// Protocol overhead download rate in bytes/s.
    #[serde(default)]
    pub download_protocol_rate: Option<f64>,
    /// Protocol overhead upload rate in bytes/s.
    #[serde(default)]
    pub upload_protocol_rate: Option<f64>,
    /// DHT routing table size.
    #[serde(default)]
    pub dht_nodes: Option<i64>,
    /// Whether incoming connections were seen.
    #[serde(default)]
    pub has_incoming_connections: Option<bool>,
    /// Free space in the download location, in bytes.
    #[serde(default)]
    pub free_space: Option<i64>,
    /// External IP as seen by the daemon.
    #[serde(default)]
    pub external_ip: Option<String>,
}

// ============================================================================
// PluginList
// ============================================================================

/// Result of `web.get_plugins`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginList {
    /// Plugins currently enabled in the web UI.
    #[serde(default)]
    pub enabled_plugins: Vec<String>,
    /// Plugins that could be enabled.
    #[serde(default)]
    pub available_plugins: Vec<String>,
}

// ============================================================================
// HostEntry
// ============================================================================

/// One entry of `web.get_hosts`, sent as `[id, host, port, username]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// Host id.
    pub id: String,
    /// Daemon hostname or IP.
    pub host: String,
    /// Daemon port.
    pub port: u16,
    /// Login user.
    pub username: String,
}

// ============================================================================
// RemoteEvent
// ============================================================================

/// One queued server event from `web.get_events`, sent as `[name, [args...]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEvent(pub String, pub Vec<Value>);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_snapshot_from_disconnected_server() {
        let snapshot: UiSnapshot = serde_json::from_value(json!({
            "connected": false,
            "torrents": null,
            "filters": null,
            "stats": { "max_download": -1.0, "max_upload": -1.0, "max_num_connections": 200 }
        }))
        .expect("parse");

        assert!(!snapshot.connected);
        assert_eq!(snapshot.torrent_count(), 0);
        assert_eq!(snapshot.stats.max_num_connections, Some(200));
        assert_eq!(snapshot.stats.download_rate, None);
    }

    #[test]
    fn test_snapshot_torrent_lookup() {
        let snapshot: UiSnapshot = serde_json::from_value(json!({
            "connected": true,
            "torrents": { "abc": { "name": "ubuntu.iso" } },
            "stats": { "download_rate": 1024.0, "external_ip": "203.0.113.5" }
        }))
        .expect("parse");

        let torrent = snapshot.torrent(&TorrentId::from("abc")).expect("torrent");
        assert_eq!(torrent["name"], json!("ubuntu.iso"));
        assert_eq!(snapshot.stats.external_ip.as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn test_host_entry_from_array() {
        let host: HostEntry =
            serde_json::from_value(json!(["ab12", "127.0.0.1", 58846, "localclient"])).expect("parse");
        assert_eq!(host.port, 58846);
        assert_eq!(host.username, "localclient");
    }

    #[test]
    fn test_remote_event_from_pair() {
        let event: RemoteEvent =
            serde_json::from_value(json!(["TorrentAddedEvent", ["abc", false]])).expect("parse");
        assert_eq!(event.0, "TorrentAddedEvent");
        assert_eq!(event.1, vec![json!("abc"), json!(false)]);
    }
}
