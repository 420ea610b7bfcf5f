//! Scripted in-memory transport for unit tests.
//!
//! Replies are looked up by method name: queued replies first, then the
//! method's default, then HTTP 404.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::protocol::Request;

use super::{HttpReply, Transport};

// ============================================================================
// Reply
// ============================================================================

/// What the fake server answers.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// 200 with `{"result": value, "error": null}`.
    Result(Value),
    /// 200 with `{"result": null, "error": value}`.
    Error(Value),
    /// Non-2xx status with an empty body.
    Status(u16, &'static str),
    /// 200 with a raw body.
    Raw(&'static str),
    /// No reply at all.
    Network,
}

enum Step {
    Now(Reply),
    Gated(oneshot::Receiver<()>, Reply),
}

// ============================================================================
// ScriptedTransport
// ============================================================================

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    queued: Mutex<FxHashMap<String, VecDeque<Step>>>,
    defaults: Mutex<FxHashMap<String, Reply>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers every call of `method` with `reply` unless something is queued.
    pub(crate) fn always(&self, method: &str, reply: Reply) -> &Self {
        self.defaults.lock().insert(method.to_string(), reply);
        self
    }

    /// Answers the next call of `method` with `reply`.
    pub(crate) fn push(&self, method: &str, reply: Reply) -> &Self {
        self.queued
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Step::Now(reply));
        self
    }

    /// Holds the next call of `method` until the returned sender fires.
    pub(crate) fn push_gated(&self, method: &str, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queued
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Step::Gated(rx, reply));
        tx
    }

    /// Returns every request received so far.
    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Returns how many calls of `method` were received.
    pub(crate) fn count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    fn next_step(&self, method: &str) -> Step {
        if let Some(step) = self
            .queued
            .lock()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return step;
        }
        let reply = self
            .defaults
            .lock()
            .get(method)
            .cloned()
            .unwrap_or(Reply::Status(404, "Not Found"));
        Step::Now(reply)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, body: String) -> Result<HttpReply> {
        let request: Request = serde_json::from_str(&body)?;
        self.requests.lock().push(request.clone());

        let reply = match self.next_step(&request.method) {
            Step::Now(reply) => reply,
            Step::Gated(gate, reply) => {
                let _ = gate.await;
                reply
            }
        };

        let ok = |body: String| HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body,
        };

        match reply {
            Reply::Result(result) => Ok(ok(
                json!({ "result": result, "error": null, "id": request.id }).to_string(),
            )),
            Reply::Error(error) => Ok(ok(
                json!({ "result": null, "error": error, "id": request.id }).to_string(),
            )),
            Reply::Raw(body) => Ok(ok(body.to_string())),
            Reply::Status(status, text) => Ok(HttpReply {
                status,
                status_text: text.to_string(),
                body: String::new(),
            }),
            Reply::Network => Err(Error::config("scripted network failure")),
        }
    }
}
