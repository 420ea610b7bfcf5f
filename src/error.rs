//! Error types for the web UI RPC client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use torrent_webui_client::{Error, Result, RpcClient};
//!
//! async fn example(client: &RpcClient) -> Result<()> {
//!     let connected = client.web().connected().await?;
//!     println!("daemon connected: {connected}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Method surface | [`Error::NotConnected`], [`Error::MethodNotFound`], [`Error::InvalidMethodName`] |
//! | Transport | [`Error::Transport`], [`Error::Http`] |
//! | Protocol | [`Error::Remote`], [`Error::Decode`] |
//! | External | [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::RequestId;
use crate::protocol::RpcError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client or poll loop configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Method Surface Errors
    // ========================================================================
    /// Method list has not been retrieved yet.
    ///
    /// Returned when a stub is requested before introspection completed.
    #[error("Not connected: method list not loaded")]
    NotConnected,

    /// Method is not exposed by the server.
    #[error("Method not found: {method}")]
    MethodNotFound {
        /// The dotted method name that was looked up.
        method: String,
    },

    /// Method name is not of the form `namespace.method`.
    #[error("Invalid method name: {name:?}")]
    InvalidMethodName {
        /// The rejected name.
        name: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// HTTP-level failure (non-2xx status or network failure).
    ///
    /// `status` is `0` when no HTTP response was received at all.
    /// The matching wire object carries code `255`.
    #[error("Request {id} failed: HTTP: {status} {status_text}")]
    Transport {
        /// Id of the failed request.
        id: RequestId,
        /// HTTP status code, `0` for network failures.
        status: u16,
        /// HTTP reason phrase or network error message.
        status_text: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The server answered with a JSON-RPC `error` object.
    ///
    /// The object is passed through exactly as the server sent it.
    #[error("Request {id} failed: {error}")]
    Remote {
        /// Id of the failed request.
        id: RequestId,
        /// Server-defined error object.
        error: RpcError,
    },

    /// The response body could not be decoded.
    #[error("Request {id}: undecodable response: {message}")]
    Decode {
        /// Id of the request.
        id: RequestId,
        /// Decoder message.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL could not be parsed.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a method not found error.
    #[inline]
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Creates an invalid method name error.
    #[inline]
    pub fn invalid_method_name(name: impl Into<String>) -> Self {
        Self::InvalidMethodName { name: name.into() }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(id: RequestId, status: u16, status_text: impl Into<String>) -> Self {
        Self::Transport {
            id,
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates a remote (server-reported) error.
    #[inline]
    pub fn remote(id: RequestId, error: RpcError) -> Self {
        Self::Remote { id, error }
    }

    /// Creates a decode error.
    #[inline]
    pub fn decode(id: RequestId, message: impl Into<String>) -> Self {
        Self::Decode {
            id,
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is an HTTP-level failure.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http(_))
    }

    /// Returns `true` if the server reported this error.
    #[inline]
    #[must_use]
    pub fn is_remote_error(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` if the server rejected the call for a missing session.
    #[inline]
    #[must_use]
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::Remote { error, .. } if error.is_not_authenticated())
    }

    /// Returns `true` if this error means the web server is unreachable.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http(_) | Self::NotConnected
        )
    }

    /// Returns the request id the error belongs to, if any.
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Transport { id, .. } | Self::Remote { id, .. } | Self::Decode { id, .. } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
