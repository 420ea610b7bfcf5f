//! Typed calls of the `auth` namespace.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

use crate::client::RpcClient;
use crate::error::Result;

// ============================================================================
// Method Names
// ============================================================================

/// `auth.login`
pub const LOGIN: &str = "auth.login";
/// `auth.check_session`
pub const CHECK_SESSION: &str = "auth.check_session";
/// `auth.delete_session`
pub const DELETE_SESSION: &str = "auth.delete_session";

// ============================================================================
// AuthApi
// ============================================================================

/// Typed facade over the `auth` namespace.
///
/// The session itself lives in the transport's cookie store.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a RpcClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    /// Logs in with `password`.
    ///
    /// The server answers with a session id on success and `false`
    /// otherwise; this returns whether a session was created.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::execute`].
    pub async fn login(&self, password: &str) -> Result<bool> {
        let result = self.client.call(LOGIN, vec![json!(password)]).await?;
        Ok(match result {
            Value::String(session) => !session.is_empty(),
            Value::Bool(ok) => ok,
            _ => false,
        })
    }

    /// Returns whether the current session is still valid.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn check_session(&self) -> Result<bool> {
        self.client.call_as(CHECK_SESSION, Vec::new()).await
    }

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call_as`].
    pub async fn delete_session(&self) -> Result<bool> {
        self.client.call_as(DELETE_SESSION, Vec::new()).await
    }
}

// ============================================================================
// Tests
// ============================================================================
