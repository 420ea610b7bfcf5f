//! Callback-style call completion.
//!
//! [`Callbacks`] carries at most one success and one failure closure. Both
//! are `FnOnce` and the dispatcher consumes the pair, so for each call
//! exactly one of them can run, once, after the HTTP exchange completed.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::Value;

use crate::protocol::Response;
use crate::transport::HttpReply;

// ============================================================================
// Types
// ============================================================================

/// Success callback: receives the `result`, the full decoded body and the
/// raw HTTP reply.
pub type SuccessFn = Box<dyn FnOnce(Value, &Response, &HttpReply) + Send + 'static>;

/// Failure callback: receives the error object (decoded or synthesised)
/// and the raw HTTP reply, `None` when no reply arrived.
pub type FailureFn = Box<dyn FnOnce(&Response, Option<&HttpReply>) + Send + 'static>;

// ============================================================================
// Callbacks
// ============================================================================

/// Completion handlers for [`RpcClient::dispatch`](super::RpcClient::dispatch).
///
/// Closures capture whatever receiver they need; there is no separate
/// scope argument.
#[derive(Default)]
pub struct Callbacks {
    success: Option<SuccessFn>,
    failure: Option<FailureFn>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("success", &self.success.is_some())
            .field("failure", &self.failure.is_some())
            .finish()
    }
}

impl Callbacks {
    /// Creates an empty set; results are dropped.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the success callback.
    #[inline]
    #[must_use]
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Value, &Response, &HttpReply) + Send + 'static,
    {
        self.success = Some(Box::new(f));
        self
    }

    /// Sets the failure callback.
    #[inline]
    #[must_use]
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Response, Option<&HttpReply>) + Send + 'static,
    {
        self.failure = Some(Box::new(f));
        self
    }

    /// Runs the success callback, if any.
    pub(crate) fn succeed(self, result: Value, response: &Response, http: &HttpReply) {
        if let Some(success) = self.success {
            success(result, response, http);
        }
    }

    /// Runs the failure callback, if any.
    pub(crate) fn fail(self, response: &Response, http: Option<&HttpReply>) {
        if let Some(failure) = self.failure {
            failure(response, http);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::identifiers::RequestId;

    fn ok_reply() -> HttpReply {
        HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body: r#"{"result":42,"error":null,"id":0}"#.to_string(),
        }
    }

    #[test]
    fn test_succeed_runs_only_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let misses = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        let m = Arc::clone(&misses);
        let callbacks = Callbacks::new()
            .on_success(move |result, _, http| {
                assert_eq!(result, json!(42));
                assert_eq!(http.status, 200);
                h.fetch_add(1, Ordering::SeqCst);
            })
            .on_failure(move |_, _| {
                m.fetch_add(1, Ordering::SeqCst);
            });

        let response = Response::success(RequestId::new(0), json!(42));
        callbacks.succeed(json!(42), &response, &ok_reply());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(misses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_callbacks_are_noops() {
        let response = Response::transport_failure(RequestId::new(1), 500, "Internal Server Error");
        Callbacks::new().fail(&response, None);
        Callbacks::new().succeed(Value::Null, &response, &ok_reply());
    }

    #[test]
    fn test_debug_reports_presence() {
        let callbacks = Callbacks::new().on_failure(|_, _| {});
        let debug = format!("{callbacks:?}");
        assert!(debug.contains("success: false"));
        assert!(debug.contains("failure: true"));
    }
}
