//! HTTP transport layer.
//!
//! This module moves request bodies to the web server's JSON endpoint and
//! hands the raw HTTP reply back to the client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  RpcClient      │                              │  Web server     │
//! │                 │       HTTP POST (JSON)       │                 │
//! │  Transport      │─────────────────────────────►│  /json          │
//! │  (HttpTransport)│◄─────────────────────────────│                 │
//! │                 │   status + body per call     │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! Every call is one request/response exchange; nothing is multiplexed,
//! so the transport keeps no correlation table.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `http` | reqwest-backed transport |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// reqwest-backed transport.
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use http::HttpTransport;

// ============================================================================
// HttpReply
// ============================================================================

/// Raw HTTP reply for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase.
    pub status_text: String,
    /// Response body.
    pub body: String,
}

impl HttpReply {
    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Moves one JSON body to the endpoint and returns the reply.
///
/// Implementations return `Ok` for every HTTP reply, whatever its status,
/// and `Err` only when no reply was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` and waits for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Http`] on network failure or timeout.
    async fn post(&self, body: String) -> Result<HttpReply>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_reply_success_range() {
        let reply = |status| HttpReply {
            status,
            status_text: String::new(),
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(301).is_success());
        assert!(!reply(500).is_success());
    }
}
