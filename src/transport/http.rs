//! reqwest-backed transport.
//!
//! One [`reqwest::Client`] per transport; the cookie store keeps the
//! session cookie set by `auth.login` and replays it on every call.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::trace;
use url::Url;

use crate::error::Result;

use super::{HttpReply, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Content type of request and response bodies.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Reason phrase for statuses without a canonical one.
const UNKNOWN_REASON: &str = "Unknown";

// ============================================================================
// HttpTransport
// ============================================================================

/// Transport that POSTs to the JSON endpoint over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    /// Endpoint URL.
    url: Url,
    /// Shared HTTP client.
    client: Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport for `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Full endpoint URL (e.g. `http://localhost:8112/json`)
    /// * `timeout` - Per-request timeout
    /// * `user_agent` - Value of the `User-Agent` header
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Http`] if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { url, client })
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<HttpReply> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let status_text = reason_phrase(status);
        let body = response.text().await?;

        trace!(status = status.as_u16(), len = body.len(), "HTTP reply received");

        Ok(HttpReply {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// Returns the canonical reason phrase, or [`UNKNOWN_REASON`].
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or(UNKNOWN_REASON).to_string()
}

// ============================================================================
// Tests
// ============================================================================
