//! Session-level UI events.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use super::Event;

// ============================================================================
// UiEvent
// ============================================================================

/// Cross-cutting signals shared by the poll loops and the hosting UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The user logged in to the web server.
    Login,
    /// The user logged out.
    Logout,
    /// The web server is attached to a daemon.
    Connect,
    /// The web server lost or dropped its daemon.
    Disconnect,
    /// Consecutive poll failures reached the threshold.
    ConnectionLost {
        /// Failures counted when the threshold was hit.
        error_count: u32,
    },
    /// The web server answered again after a loss.
    ConnectionRestored {
        /// Whether the web server is attached to a daemon.
        daemon_connected: bool,
    },
    /// An event pushed by the server through `web.get_events`.
    Remote {
        /// Event name (e.g. `TorrentAddedEvent`).
        name: String,
        /// Positional event arguments.
        args: Vec<Value>,
    },
}

/// Discriminant of [`UiEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// [`UiEvent::Login`].
    Login,
    /// [`UiEvent::Logout`].
    Logout,
    /// [`UiEvent::Connect`].
    Connect,
    /// [`UiEvent::Disconnect`].
    Disconnect,
    /// [`UiEvent::ConnectionLost`].
    ConnectionLost,
    /// [`UiEvent::ConnectionRestored`].
    ConnectionRestored,
    /// [`UiEvent::Remote`].
    Remote,
}

impl Event for UiEvent {
    type Kind = UiEventKind;

    fn kind(&self) -> UiEventKind {
        match self {
            Self::Login => UiEventKind::Login,
            Self::Logout => UiEventKind::Logout,
            Self::Connect => UiEventKind::Connect,
            Self::Disconnect => UiEventKind::Disconnect,
            Self::ConnectionLost { .. } => UiEventKind::ConnectionLost,
            Self::ConnectionRestored { .. } => UiEventKind::ConnectionRestored,
            Self::Remote { .. } => UiEventKind::Remote,
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
    fn test_kind_mapping() {
        assert_eq!(UiEvent::Login.kind(), UiEventKind::Login);
        assert_eq!(
            UiEvent::ConnectionLost { error_count: 3 }.kind(),
            UiEventKind::ConnectionLost
        );
        assert_eq!(
            UiEvent::Remote {
                name: "TorrentAddedEvent".into(),
                args: Vec::new(),
            }
            .kind(),
            UiEventKind::Remote
        );
    }
}
