//! Torrent status keys requested by the display components.
//!
//! The server returns only the keys asked for, so each view names the
//! fields it renders.

// ============================================================================
// Key Lists
// ============================================================================

/// Keys shown in the torrent grid; sent with every poll tick.
pub const GRID: &[&str] = &[
    "queue",
    "name",
    "total_size",
    "state",
    "progress",
    "num_seeds",
    "total_seeds",
    "num_peers",
    "total_peers",
    "download_payload_rate",
    "upload_payload_rate",
    "eta",
    "ratio",
    "distributed_copies",
    "is_auto_managed",
    "time_added",
    "tracker_host",
];

/// Keys of the status tab, in addition to [`GRID`].
pub const STATUS: &[&str] = &[
    "total_done",
    "total_payload_download",
    "total_uploaded",
    "total_payload_upload",
    "next_announce",
    "tracker_status",
    "num_pieces",
    "piece_length",
    "is_auto_managed",
    "active_time",
    "seeding_time",
    "seed_rank",
];

/// Keys of the files tab.
pub const FILES: &[&str] = &["files", "file_progress", "file_priorities"];

/// Keys of the peers tab.
pub const PEERS: &[&str] = &["peers"];

/// Keys of the details tab.
pub const DETAILS: &[&str] = &[
    "name",
    "save_path",
    "total_size",
    "num_files",
    "tracker_status",
    "tracker",
    "comment",
];

/// Keys of the options tab.
pub const OPTIONS: &[&str] = &[
    "max_download_speed",
    "max_upload_speed",
    "max_connections",
    "max_upload_slots",
    "is_auto_managed",
    "stop_at_ratio",
    "stop_ratio",
    "remove_at_ratio",
    "private",
    "prioritize_first_last",
];

// ============================================================================
// DetailTab
// ============================================================================

/// The detail view currently showing the focused torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTab {
    /// Transfer statistics.
    Status,
    /// Static torrent metadata.
    Details,
    /// File list and priorities.
    Files,
    /// Connected peers.
    Peers,
    /// Per-torrent options.
    Options,
}

impl DetailTab {
    /// Returns the keys this tab requests.
    ///
    /// The status tab asks for its own keys plus every grid key.
    #[must_use]
    pub fn keys(self) -> Vec<&'static str> {
        match self {
            Self::Status => {
                let mut keys = STATUS.to_vec();
                for key in GRID {
                    if !keys.contains(key) {
                        keys.push(key);
                    }
                }
                keys
            }
            Self::Details => DETAILS.to_vec(),
            Self::Files => FILES.to_vec(),
            Self::Peers => PEERS.to_vec(),
            Self::Options => OPTIONS.to_vec(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keys_include_grid() {
        let keys = DetailTab::Status.keys();
        for key in GRID {
            assert!(keys.contains(key), "missing {key}");
        }
        assert!(keys.contains(&"seed_rank"));
    }

    #[test]
    fn test_status_keys_have_no_duplicates() {
        let keys = DetailTab::Status.keys();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }

    #[test]
    fn test_peers_keys() {
        assert_eq!(DetailTab::Peers.keys(), vec!["peers"]);
    }
}
