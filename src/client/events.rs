//! Signals raised by the RPC client.

// ============================================================================
// Imports
// ============================================================================

use crate::events::Event;
use crate::protocol::{Request, Response, RpcError};
use crate::transport::HttpReply;

use super::RpcClient;

// ============================================================================
// ClientEvent
// ============================================================================

/// Signals observed by cross-cutting listeners (login flow, status bar).
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Introspection finished and the method surface was (re)installed.
    ///
    /// Fires exactly once per introspection cycle.
    Connected(RpcClient),

    /// A call failed, at HTTP level or with a server-reported error.
    ///
    /// Fires before the caller sees the error.
    Error(ErrorEvent),
}

/// Discriminant of [`ClientEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientEventKind {
    /// [`ClientEvent::Connected`].
    Connected,
    /// [`ClientEvent::Error`].
    Error,
}

impl Event for ClientEvent {
    type Kind = ClientEventKind;

    fn kind(&self) -> ClientEventKind {
        match self {
            Self::Connected(_) => ClientEventKind::Connected,
            Self::Error(_) => ClientEventKind::Error,
        }
    }
}

// ============================================================================
// ErrorEvent
// ============================================================================

/// Payload of [`ClientEvent::Error`].
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// The request that failed.
    pub request: Request,
    /// The error object: as decoded for server errors, synthesised
    /// (code 255) for transport failures.
    pub response: Response,
    /// HTTP status of the exchange, `0` when no reply arrived.
    pub status: u16,
    /// Raw HTTP reply, `None` when no reply arrived.
    pub http: Option<HttpReply>,
}

impl ErrorEvent {
    /// Returns the error object carried by the response.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&RpcError> {
        self.response.error.as_ref()
    }

    /// Returns `true` for client-synthesised transport failures.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.error().is_some_and(RpcError::is_transport)
    }
}
