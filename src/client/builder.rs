//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`RpcClient`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use torrent_webui_client::RpcClient;
//!
//! # async fn example() -> torrent_webui_client::Result<()> {
//! let client = RpcClient::builder()
//!     .base_url("http://localhost:8112/")
//!     .timeout(Duration::from_secs(10))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::transport::HttpTransport;

use super::RpcClient;

// ============================================================================
// Constants
// ============================================================================

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("torrent-webui-client/", env!("CARGO_PKG_VERSION"));

/// Path of the JSON endpoint below the web UI base URL.
pub const JSON_PATH: &str = "json";

// ============================================================================
// Endpoint
// ============================================================================

/// Where the endpoint URL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    /// Full endpoint URL.
    Url(String),
    /// Web UI base URL; the JSON path is appended.
    Base(String),
}

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring an [`RpcClient`] instance.
///
/// Use [`RpcClient::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Endpoint location.
    endpoint: Option<Endpoint>,
    /// Per-request timeout.
    timeout: Duration,
    /// `User-Agent` header.
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new builder with default settings and no endpoint.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full endpoint URL.
    ///
    /// # Arguments
    ///
    /// * `url` - Endpoint URL (e.g. "http://localhost:8112/json")
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(Endpoint::Url(url.into()));
        self
    }

    /// Sets the web UI base URL; the endpoint is `<base>json`.
    ///
    /// # Arguments
    ///
    /// * `base` - Base URL (e.g. "http://localhost:8112/")
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.endpoint = Some(Endpoint::Base(base.into()));
        self
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[inline]
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the client without running introspection.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint is missing or not http(s)
    /// - [`Error::Config`] if the timeout is zero
    /// - [`Error::Url`] if the URL cannot be parsed
    /// - [`Error::Http`] if the HTTP client cannot be built
    pub fn build(self) -> Result<RpcClient> {
        let url = self.validate_endpoint()?;
        self.validate_timeout()?;

        let transport = HttpTransport::new(url, self.timeout, &self.user_agent)?;
        Ok(RpcClient::with_transport(Arc::new(transport)))
    }

    /// Builds the client and runs introspection.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build) and [`RpcClient::reload_methods`].
    pub async fn connect(self) -> Result<RpcClient> {
        let client = self.build()?;
        client.reload_methods().await?;
        Ok(client)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientBuilder {
    /// Resolves and validates the endpoint URL.
    fn validate_endpoint(&self) -> Result<Url> {
        let endpoint = self.endpoint.clone().ok_or_else(|| {
            Error::config(
                "Endpoint URL is required. Use .url() or .base_url() to set it.\n\
                 Example: RpcClient::builder().base_url(\"http://localhost:8112/\")",
            )
        })?;

        let url = match endpoint {
            Endpoint::Url(url) => Url::parse(&url)?,
            Endpoint::Base(base) => {
                let mut base = Url::parse(&base)?;
                if !base.path().ends_with('/') {
                    let path = format!("{}/", base.path());
                    base.set_path(&path);
                }
                base.join(JSON_PATH)?
            }
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Unsupported endpoint scheme: {}\n\
                 The web UI is reached over http or https.",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Validates the timeout.
    fn validate_timeout(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::config("Request timeout must be greater than zero."));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
