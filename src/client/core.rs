//! Core RPC client implementation.
//!
//! [`RpcClient`] is a cheap, cloneable handle. Components that talk to the
//! server receive a clone explicitly; there is no global instance.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::identifiers::{RequestCounter, RequestId, SubscriptionId};
use crate::protocol::{MethodName, Request, Response, RpcError, TRANSPORT_ERROR_CODE};
use crate::transport::{HttpReply, Transport};

use super::builder::ClientBuilder;
use super::dispatch::Callbacks;
use super::events::{ClientEvent, ClientEventKind, ErrorEvent};
use super::registry::{Method, MethodRegistry, Namespace};

// ============================================================================
// Constants
// ============================================================================

/// Introspection method returning every callable name.
pub const LIST_METHODS: &str = "system.listMethods";

// ============================================================================
// Reply
// ============================================================================

/// A successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Id the request was sent with.
    pub id: RequestId,
    /// Decoded response body.
    pub response: Response,
    /// Raw HTTP reply the body was decoded from.
    pub http: HttpReply,
}

impl Reply {
    /// Returns the HTTP status of the exchange.
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.http.status
    }

    /// Returns the call's `result`, `Null` when absent.
    #[inline]
    #[must_use]
    pub fn result(&self) -> &Value {
        self.response.result()
    }

    /// Consumes the reply and returns the `result`.
    #[inline]
    #[must_use]
    pub fn into_result(self) -> Value {
        self.response.result.unwrap_or(Value::Null)
    }
}

/// A failed call: the error object callers and listeners see, the raw
/// reply when one arrived, plus the typed error.
struct Failure {
    response: Response,
    http: Option<HttpReply>,
    error: Error,
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a client.
pub(crate) struct ClientInner {
    /// Moves bodies to the endpoint.
    transport: Arc<dyn Transport>,
    /// Request id source.
    counter: RequestCounter,
    /// Current method surface, `None` before the first introspection.
    registry: RwLock<Option<Arc<MethodRegistry>>>,
    /// Connected/error signals.
    events: EventBus<ClientEvent>,
}

// ============================================================================
// RpcClient
// ============================================================================

/// JSON-RPC client for the web server's `/json` endpoint.
///
/// # Example
///
/// ```no_run
/// use torrent_webui_client::{RpcClient, Result};
///
/// # async fn example() -> Result<()> {
/// let client = RpcClient::builder()
///     .url("http://localhost:8112/json")
///     .connect()
///     .await?;
///
/// let add = client.namespace("core")?.method("get_torrents_status")?;
/// let reply = add.call(vec![serde_json::json!({}), serde_json::json!(["name"])]).await?;
/// println!("{}", reply.result());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcClient {
    /// Shared inner state.
    pub(crate) inner: Arc<ClientInner>,
}

// ============================================================================
// RpcClient - Display
// ============================================================================

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods = self.inner.registry.read().as_ref().map(|r| r.len());
        f.debug_struct("RpcClient")
            .field("next_id", &self.inner.counter.peek())
            .field("methods", &methods)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RpcClient - Constructor
// ============================================================================

impl RpcClient {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client over `transport` without running introspection.
    ///
    /// No stubs exist until [`reload_methods`](Self::reload_methods) completes.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                counter: RequestCounter::default(),
                registry: RwLock::new(None),
                events: EventBus::new(),
            }),
        }
    }

    /// Creates a client over `transport` and runs introspection.
    ///
    /// # Errors
    ///
    /// Returns the introspection call's error.
    pub async fn connect_with(transport: Arc<dyn Transport>) -> Result<Self> {
        let client = Self::with_transport(transport);
        client.reload_methods().await?;
        Ok(client)
    }
}

// ============================================================================
// RpcClient - Introspection
// ============================================================================

impl RpcClient {
    /// Fetches the method list and installs a fresh method surface.
    ///
    /// Emits [`ClientEvent::Connected`] once the new surface is in place.
    /// Namespaces missing from the new list disappear; stubs obtained
    /// earlier keep sending their original names.
    ///
    /// # Errors
    ///
    /// Returns the call's error, or [`Error::Decode`] if the result is not
    /// a list of strings. The previous surface is kept on error.
    pub async fn reload_methods(&self) -> Result<Arc<MethodRegistry>> {
        let reply = self.execute(LIST_METHODS, Vec::new()).await?;
        let id = reply.id;
        let names: Vec<String> = serde_json::from_value(reply.into_result())
            .map_err(|e| Error::decode(id, e.to_string()))?;

        let registry = Arc::new(MethodRegistry::from_names(&names));
        *self.inner.registry.write() = Some(Arc::clone(&registry));

        info!(
            methods = registry.len(),
            namespaces = registry.namespaces().len(),
            "Method surface installed"
        );

        self.inner.events.emit(&ClientEvent::Connected(self.clone()));
        Ok(registry)
    }

    /// Returns the current method surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] before the first introspection.
    pub fn registry(&self) -> Result<Arc<MethodRegistry>> {
        self.inner
            .registry
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(Error::NotConnected)
    }

    /// Returns `true` once a method surface is installed.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.registry.read().is_some()
    }

    /// Returns the stub for a namespace.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] before introspection completed
    /// - [`Error::MethodNotFound`] if no method lives in `name`
    pub fn namespace(&self, name: &str) -> Result<Namespace> {
        if !self.registry()?.has_namespace(name) {
            return Err(Error::method_not_found(format!("{name}.*")));
        }
        Ok(Namespace::new(self.clone(), name))
    }

    /// Returns the stub for a dotted method name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMethodName`] if `name` is not dotted
    /// - [`Error::NotConnected`] before introspection completed
    /// - [`Error::MethodNotFound`] if the server does not expose it
    pub fn method(&self, name: &str) -> Result<Method> {
        let parsed = MethodName::parse(name)?;
        let registry = self.registry()?;
        let found = registry
            .get(parsed.namespace(), parsed.method())
            .cloned()
            .ok_or_else(|| Error::method_not_found(name))?;
        Ok(Method::new(self.clone(), found))
    }

    /// Returns `true` if the server exposes `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.registry().is_ok_and(|r| r.contains(name))
    }

    /// Returns the sorted namespace names, empty before introspection.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        self.registry()
            .map(|r| r.namespaces().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Returns every dotted method name, sorted; empty before introspection.
    #[must_use]
    pub fn methods(&self) -> Vec<String> {
        self.registry()
            .map(|r| r.all().into_iter().map(|n| n.as_str().to_string()).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// RpcClient - Calls
// ============================================================================

impl RpcClient {
    /// Sends one call and waits for its reply.
    ///
    /// The request id is taken from the client's counter, which starts at
    /// 0 and advances by one per call whatever the outcome.
    ///
    /// Every failure emits [`ClientEvent::Error`] before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] on non-2xx status or network failure
    /// - [`Error::Remote`] if the server reported an error
    /// - [`Error::Decode`] if the body is not a JSON-RPC response
    pub async fn execute(&self, method: &str, params: Vec<Value>) -> Result<Reply> {
        self.exchange(method, params).await.map_err(|f| f.error)
    }

    /// Sends one call and returns only its `result`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        Ok(self.execute(method, params).await?.into_result())
    }

    /// Sends one call and decodes its `result` into `T`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute); additionally [`Error::Decode`] if
    /// the result does not match `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let reply = self.execute(method, params).await?;
        let id = reply.id;
        serde_json::from_value(reply.into_result()).map_err(|e| Error::decode(id, e.to_string()))
    }

    /// Sends one call in the background and reports through `callbacks`.
    ///
    /// Exactly one of the callbacks runs, once, after the exchange
    /// completed; a missing callback drops the outcome. The error signal
    /// fires regardless. Both callbacks see the raw HTTP reply; the
    /// failure callback gets `None` when no reply arrived.
    ///
    /// Must be called within a Tokio runtime.
    pub fn dispatch(&self, method: &str, params: Vec<Value>, callbacks: Callbacks) -> JoinHandle<()> {
        let client = self.clone();
        let method = method.to_string();

        tokio::spawn(async move {
            match client.exchange(&method, params).await {
                Ok(reply) => {
                    let result = reply.result().clone();
                    callbacks.succeed(result, &reply.response, &reply.http);
                }
                Err(failure) => callbacks.fail(&failure.response, failure.http.as_ref()),
            }
        })
    }

    /// Returns the id the next call will carry.
    #[inline]
    #[must_use]
    pub fn next_request_id(&self) -> RequestId {
        self.inner.counter.peek()
    }

    /// One request/response exchange with error classification.
    async fn exchange(&self, method: &str, params: Vec<Value>) -> StdResult<Reply, Failure> {
        let id = self.inner.counter.next();
        let request = Request::new(id, method, params);

        let body = match serde_json::to_string(&request) {
            Ok(body) => body,
            Err(e) => {
                let response = Response::transport_failure(id, 0, &e.to_string());
                return Err(self.fail(request, response, None, Error::Json(e)));
            }
        };

        debug!(%id, method, "Sending request");
        trace!(%id, body = %body, "Request body");

        let http = match self.inner.transport.post(body).await {
            Ok(http) => http,
            Err(e) => {
                let text = e.to_string();
                let response = Response::transport_failure(id, 0, &text);
                return Err(self.fail(request, response, None, Error::transport(id, 0, text)));
            }
        };

        if !http.is_success() {
            let response = Response::transport_failure(id, http.status, &http.status_text);
            let error = Error::transport(id, http.status, http.status_text.clone());
            return Err(self.fail(request, response, Some(http), error));
        }

        trace!(%id, body = %http.body, "Response body");

        let response: Response = match serde_json::from_str(&http.body) {
            Ok(response) => response,
            Err(e) => {
                let message = e.to_string();
                let response = Response {
                    result: None,
                    error: Some(RpcError::new(
                        format!("Invalid response: {message}"),
                        TRANSPORT_ERROR_CODE,
                    )),
                    id: Some(id),
                };
                return Err(self.fail(request, response, Some(http), Error::decode(id, message)));
            }
        };

        if let Some(error) = response.error.clone() {
            return Err(self.fail(request, response, Some(http), Error::remote(id, error)));
        }

        debug!(%id, method, "Request succeeded");

        Ok(Reply { id, response, http })
    }

    /// Emits the error signal and packs the failure.
    fn fail(&self, request: Request, response: Response, http: Option<HttpReply>, error: Error) -> Failure {
        let status = http.as_ref().map_or(0, |h| h.status);
        warn!(id = %request.id, method = %request.method, status, error = %error, "Request failed");

        self.inner.events.emit(&ClientEvent::Error(ErrorEvent {
            request,
            response: response.clone(),
            status,
            http: http.clone(),
        }));

        Failure { response, http, error }
    }
}

// ============================================================================
// RpcClient - Events
// ============================================================================

impl RpcClient {
    /// Returns the client's signal bus.
    #[inline]
    #[must_use]
    pub fn events(&self) -> &EventBus<ClientEvent> {
        &self.inner.events
    }

    /// Subscribes to [`ClientEvent::Connected`].
    pub fn on_connected<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&RpcClient) + Send + Sync + 'static,
    {
        self.inner
            .events
            .subscribe(ClientEventKind::Connected, move |event| {
                if let ClientEvent::Connected(client) = event {
                    handler(client);
                }
            })
    }

    /// Subscribes to [`ClientEvent::Error`].
    pub fn on_error<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        self.inner
            .events
            .subscribe(ClientEventKind::Error, move |event| {
                if let ClientEvent::Error(error) = event {
                    handler(error);
                }
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
