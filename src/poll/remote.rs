//! Server event poller.
//!
//! The server queues events per session for every name registered with
//! `web.register_event_listener`. The poller drains that queue with
//! `web.get_events` every interval and re-emits each entry on the bus as
//! [`UiEvent::Remote`].
//!
//! Names listened to before [`EventPoller::start`] are kept and
//! registered when polling starts; every start registers all known names
//! again, since a new login opens a new server session.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::api::RemoteEvent;
use crate::client::RpcClient;
use crate::error::Result;
use crate::events::{EventBus, UiEvent, UiEventKind};
use crate::identifiers::SubscriptionId;

use super::PollState;
use super::config::{DEFAULT_INTERVAL, PollConfig};

// ============================================================================
// Types
// ============================================================================

struct PollerInner {
    client: RpcClient,
    bus: EventBus<UiEvent>,
    interval: Duration,
    state: Mutex<PollerState>,
}

#[derive(Default)]
struct PollerState {
    poll: PollState,
    epoch: u64,
    /// Every event name listened to, in order.
    names: Vec<String>,
    timer: Option<JoinHandle<()>>,
}

impl Drop for PollerInner {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

// ============================================================================
// EventPoller
// ============================================================================

/// Polls `web.get_events` and republishes server events.
///
/// Cloning yields another handle to the same poller.
#[derive(Clone)]
pub struct EventPoller {
    inner: Arc<PollerInner>,
}

impl fmt::Debug for EventPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("EventPoller")
            .field("state", &state.poll)
            .field("names", &state.names)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EventPoller - Constructor
// ============================================================================

impl EventPoller {
    /// Creates a stopped poller with the default 2 s interval.
    #[must_use]
    pub fn new(client: RpcClient, bus: EventBus<UiEvent>) -> Self {
        Self::build(client, bus, DEFAULT_INTERVAL)
    }

    /// Creates a stopped poller using `config.interval`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn with_config(client: RpcClient, bus: EventBus<UiEvent>, config: &PollConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(client, bus, config.interval))
    }

    fn build(client: RpcClient, bus: EventBus<UiEvent>, interval: Duration) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                client,
                bus,
                interval,
                state: Mutex::new(PollerState::default()),
            }),
        }
    }
}

// ============================================================================
// EventPoller - Listeners
// ============================================================================

impl EventPoller {
    /// Asks the server to queue events named `name`.
    ///
    /// Registers immediately while running, otherwise on the next start.
    /// Repeated names are ignored.
    pub fn listen(&self, name: &str) {
        let mut state = self.inner.state.lock();
        if state.names.iter().any(|n| n == name) {
            return;
        }
        state.names.push(name.to_string());
        let running = state.poll == PollState::Running;
        drop(state);

        if running {
            self.inner.register(vec![name.to_string()]);
        } else {
            debug!(name, "Event listener queued until start");
        }
    }

    /// Subscribes `handler` to the server event `name`.
    ///
    /// Server events are capitalised (`TorrentAddedEvent`); those names are
    /// also passed to [`listen`](Self::listen). Other names only subscribe
    /// locally.
    pub fn on<F>(&self, name: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            self.listen(name);
        }

        let wanted = name.to_string();
        self.inner.bus.subscribe(UiEventKind::Remote, move |event| {
            if let UiEvent::Remote { name, args } = event
                && *name == wanted
            {
                handler(args);
            }
        })
    }

    /// Returns every name listened to.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner.state.lock().names.clone()
    }
}

// ============================================================================
// EventPoller - Control
// ============================================================================

impl EventPoller {
    /// Registers every known name and starts polling: once immediately,
    /// then every interval. No-op while running.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(&self) {
        self.inner.start();
    }

    /// Stops polling. No-op while stopped.
    pub fn stop(&self) {
        if self.inner.halt() {
            info!("Event poller stopped");
        }
    }

    /// Drives the poller from the bus: `Login` starts it, `Logout` stops it.
    ///
    /// The subscriptions do not keep the poller alive.
    pub fn attach(&self) -> Vec<SubscriptionId> {
        let login = {
            let weak = Arc::downgrade(&self.inner);
            self.inner.bus.subscribe(UiEventKind::Login, move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.start();
                }
            })
        };

        let logout = {
            let weak = Arc::downgrade(&self.inner);
            self.inner.bus.subscribe(UiEventKind::Logout, move |_| {
                if let Some(inner) = weak.upgrade()
                    && inner.halt()
                {
                    info!("Event poller stopped");
                }
            })
        };

        vec![login, logout]
    }

    /// Returns the run state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PollState {
        self.inner.state.lock().poll
    }

    /// Returns `true` while polling.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == PollState::Running
    }
}

// ============================================================================
// PollerInner
// ============================================================================

impl PollerInner {
    fn start(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.poll == PollState::Running {
            return;
        }

        state.poll = PollState::Running;
        state.epoch += 1;
        let epoch = state.epoch;
        let names = state.names.clone();
        state.timer = Some(self.spawn_timer(epoch));
        drop(state);

        info!(epoch, listeners = names.len(), "Event poller started");
        if !names.is_empty() {
            self.register(names);
        }
    }

    fn halt(&self) -> bool {
        let mut state = self.state.lock();
        if state.poll == PollState::Stopped {
            return false;
        }

        state.poll = PollState::Stopped;
        state.epoch += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        true
    }

    fn register(&self, names: Vec<String>) {
        let client = self.client.clone();
        tokio::spawn(async move {
            for name in names {
                match client.web().register_event_listener(&name).await {
                    Ok(()) => debug!(name = %name, "Event listener registered"),
                    Err(e) => warn!(name = %name, error = %e, "Failed to register event listener"),
                }
            }
        });
    }

    fn spawn_timer(self: &Arc<Self>, epoch: u64) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.interval;

        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                tokio::spawn(inner.poll(epoch));
            }
        })
    }

    async fn poll(self: Arc<Self>, epoch: u64) {
        let result = self.client.web().get_events().await;

        if self.state.lock().epoch != epoch {
            debug!(epoch, "Discarding events received after stop");
            return;
        }

        match result {
            Ok(events) => {
                for RemoteEvent(name, args) in events {
                    trace!(name = %name, args = args.len(), "Server event");
                    self.bus.emit(&UiEvent::Remote { name, args });
                }
            }
            Err(e) => debug!(error = %e, "Event poll failed"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
