//! UI update loop.
//!
//! Every interval the loop asks the server for a batch snapshot of the
//! torrent grid, the sidebar filters and the session statistics, and
//! refreshes the focused detail tab alongside it.
//!
//! # State Machine
//!
//! | From | Trigger | To |
//! |------|---------|----|
//! | Stopped | `start()`, `Connect`, `Login` | Running |
//! | Running | `stop()`, `Disconnect`, `Logout` | Stopped |
//! | Running | snapshot with `connected == false` | Stopped (emits `Disconnect`) |
//! | Running | failure count reaches the threshold | Stopped (emits `ConnectionLost`, `Disconnect`) |
//!
//! Each start opens a new epoch. Ticks carry the epoch they were issued
//! in; a response from an older epoch is dropped, so a late reply can
//! neither resume the loop, reset the failure count nor reach a sink.
//!
//! After a connection loss a checker calls `web.connected` every interval
//! until the server answers, then emits `ConnectionRestored`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use futures_util::future::join;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::api::{FilterState, TorrentStatus, UiSnapshot};
use crate::client::RpcClient;
use crate::error::Result;
use crate::events::{EventBus, UiEvent, UiEventKind};
use crate::identifiers::{SubscriptionId, TorrentId};
use crate::protocol::DetailTab;

use super::config::PollConfig;
use super::{DetailSource, FilterSource, PollState, Refresh, UpdateSink};

// ============================================================================
// Types
// ============================================================================

/// Shared state of one update loop.
struct LoopInner {
    client: RpcClient,
    bus: EventBus<UiEvent>,
    config: PollConfig,
    filters: Box<dyn FilterSource>,
    detail: Option<Box<dyn DetailSource>>,
    sinks: Vec<Box<dyn UpdateSink>>,
    state: Mutex<LoopState>,
}

/// Mutable loop state.
#[derive(Default)]
struct LoopState {
    poll: PollState,
    /// Bumped on every start and stop.
    epoch: u64,
    /// Consecutive failed ticks.
    error_count: u32,
    /// Filters sent with the previous tick.
    filters: Option<FilterState>,
    timer: Option<JoinHandle<()>>,
    checker: Option<JoinHandle<()>>,
}

impl Drop for LoopInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        if let Some(checker) = state.checker.take() {
            checker.abort();
        }
    }
}

// ============================================================================
// UpdateLoop
// ============================================================================

/// Fixed-interval `web.update_ui` poller.
///
/// Cloning yields another handle to the same loop.
///
/// # Example
///
/// ```ignore
/// let updates = UpdateLoop::builder(client.clone(), bus.clone())
///     .filters(|| sidebar_filters())
///     .sink(|snapshot: &UiSnapshot, refresh: Refresh| render(snapshot, refresh))
///     .build()?;
///
/// updates.attach();
/// bus.emit(&UiEvent::Connect);
/// ```
#[derive(Clone)]
pub struct UpdateLoop {
    inner: Arc<LoopInner>,
}

impl fmt::Debug for UpdateLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("UpdateLoop")
            .field("state", &state.poll)
            .field("epoch", &state.epoch)
            .field("error_count", &state.error_count)
            .field("sinks", &self.inner.sinks.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// UpdateLoop - Constructor
// ============================================================================

impl UpdateLoop {
    /// Creates a builder for a loop polling through `client` and
    /// publishing on `bus`.
    #[inline]
    #[must_use]
    pub fn builder(client: RpcClient, bus: EventBus<UiEvent>) -> UpdateLoopBuilder {
        UpdateLoopBuilder::new(client, bus)
    }
}

// ============================================================================
// UpdateLoop - Control
// ============================================================================

impl UpdateLoop {
    /// Starts ticking: once immediately, then every interval.
    ///
    /// Resets the failure count and forces a full refresh on the first
    /// tick. Cancels a running connection check. No-op while running.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(&self) {
        self.inner.start();
    }

    /// Stops ticking.
    ///
    /// Requests already sent are not aborted; their responses are
    /// dropped. No-op while stopped.
    pub fn stop(&self) {
        if self.inner.halt() {
            info!("Update loop stopped");
        }
    }

    /// Drives the loop from the bus: `Connect` and `Login` start it,
    /// `Disconnect` and `Logout` stop it.
    ///
    /// The subscriptions do not keep the loop alive.
    pub fn attach(&self) -> Vec<SubscriptionId> {
        let mut ids = Vec::with_capacity(4);

        for kind in [UiEventKind::Connect, UiEventKind::Login] {
            let weak = Arc::downgrade(&self.inner);
            ids.push(self.inner.bus.subscribe(kind, move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.start();
                }
            }));
        }

        for kind in [UiEventKind::Disconnect, UiEventKind::Logout] {
            let weak = Arc::downgrade(&self.inner);
            ids.push(self.inner.bus.subscribe(kind, move |_| {
                if let Some(inner) = weak.upgrade()
                    && inner.halt()
                {
                    info!("Update loop stopped");
                }
            }));
        }

        ids
    }

    /// Removes subscriptions returned by [`attach`](Self::attach).
    pub fn detach(&self, ids: &[SubscriptionId]) {
        for id in ids {
            self.inner.bus.unsubscribe(*id);
        }
    }
}

// ============================================================================
// UpdateLoop - Accessors
// ============================================================================

impl UpdateLoop {
    /// Returns the run state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PollState {
        self.inner.state.lock().poll
    }

    /// Returns `true` while ticking.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == PollState::Running
    }

    /// Returns the number of consecutive failed ticks.
    #[inline]
    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.inner.state.lock().error_count
    }

    /// Returns `true` while a connection check is pending.
    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.inner
            .state
            .lock()
            .checker
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PollConfig {
        &self.inner.config
    }
}

// ============================================================================
// LoopInner - Control
// ============================================================================

impl LoopInner {
    fn start(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.poll == PollState::Running {
            return;
        }

        state.poll = PollState::Running;
        state.epoch += 1;
        state.error_count = 0;
        state.filters = None;
        if let Some(checker) = state.checker.take() {
            checker.abort();
        }

        let epoch = state.epoch;
        state.timer = Some(self.spawn_timer(epoch));
        drop(state);

        info!(
            epoch,
            interval_ms = self.config.interval.as_millis() as u64,
            "Update loop started"
        );
    }

    /// Returns `false` if the loop was already stopped.
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

    fn spawn_timer(self: &Arc<Self>, epoch: u64) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.config.interval;

        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                tokio::spawn(inner.tick(epoch));
            }
        })
    }
}

// ============================================================================
// LoopInner - Tick
// ============================================================================

impl LoopInner {
    async fn tick(self: Arc<Self>, epoch: u64) {
        let filters = self.filters.filter_states();

        let refresh = {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                return;
            }
            let refresh = if state.filters.as_ref() == Some(&filters) {
                Refresh::Incremental
            } else {
                Refresh::Full
            };
            state.filters = Some(filters.clone());
            refresh
        };

        let focused = self.detail.as_ref().and_then(|d| d.focused());
        let web = self.client.web();

        trace!(epoch, ?refresh, focused = ?focused, "Tick");

        let update = web.update_ui(&self.config.grid_keys, &filters);
        let detail = async {
            match &focused {
                Some((id, tab)) => Some(web.get_torrent_status(id, &tab.keys()).await),
                None => None,
            }
        };
        let (update, detail) = join(update, detail).await;

        self.on_update(epoch, refresh, update);
        if let (Some((id, tab)), Some(detail)) = (focused, detail) {
            self.on_detail(epoch, &id, tab, detail);
        }
    }

    fn on_update(self: &Arc<Self>, epoch: u64, refresh: Refresh, result: Result<UiSnapshot>) {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            debug!(epoch, "Discarding update received after stop");
            return;
        }

        match result {
            Ok(snapshot) => {
                state.error_count = 0;
                drop(state);

                if !snapshot.connected {
                    info!("Web server has no daemon attached");
                    if self.halt() {
                        info!("Update loop stopped");
                    }
                    self.bus.emit(&UiEvent::Disconnect);
                    return;
                }

                trace!(torrents = snapshot.torrent_count(), ?refresh, "Applying update");
                for sink in &self.sinks {
                    sink.update(&snapshot, refresh);
                }
            }
            Err(e) => {
                state.error_count += 1;
                let count = state.error_count;
                drop(state);

                warn!(
                    error = %e,
                    count,
                    threshold = self.config.error_threshold,
                    "Update failed"
                );

                if count == self.config.error_threshold {
                    self.connection_lost(count);
                }
            }
        }
    }

    fn on_detail(&self, epoch: u64, id: &TorrentId, tab: DetailTab, result: Result<TorrentStatus>) {
        if self.state.lock().epoch != epoch {
            return;
        }

        match result {
            Ok(status) => {
                for sink in &self.sinks {
                    sink.detail(id, tab, &status);
                }
            }
            Err(e) => debug!(torrent = %id, ?tab, error = %e, "Detail refresh failed"),
        }
    }
}

// ============================================================================
// LoopInner - Connection Check
// ============================================================================

impl LoopInner {
    fn connection_lost(self: &Arc<Self>, error_count: u32) {
        self.halt();
        warn!(error_count, "Connection lost");

        self.start_checker();
        self.bus.emit(&UiEvent::ConnectionLost { error_count });
        self.bus.emit(&UiEvent::Disconnect);
    }

    fn start_checker(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.config.interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };

                match inner.client.web().connected().await {
                    Ok(daemon_connected) => {
                        info!(daemon_connected, "Connection restored");
                        inner
                            .bus
                            .emit(&UiEvent::ConnectionRestored { daemon_connected });
                        break;
                    }
                    Err(e) => debug!(error = %e, "Server still unreachable"),
                }
            }
        });

        if let Some(previous) = self.state.lock().checker.replace(handle) {
            previous.abort();
        }
    }
}

// ============================================================================
// UpdateLoopBuilder
// ============================================================================

/// Builder for [`UpdateLoop`].
pub struct UpdateLoopBuilder {
    client: RpcClient,
    bus: EventBus<UiEvent>,
    config: PollConfig,
    filters: Option<Box<dyn FilterSource>>,
    detail: Option<Box<dyn DetailSource>>,
    sinks: Vec<Box<dyn UpdateSink>>,
}

impl fmt::Debug for UpdateLoopBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateLoopBuilder")
            .field("config", &self.config)
            .field("has_filters", &self.filters.is_some())
            .field("has_detail", &self.detail.is_some())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl UpdateLoopBuilder {
    fn new(client: RpcClient, bus: EventBus<UiEvent>) -> Self {
        Self {
            client,
            bus,
            config: PollConfig::default(),
            filters: None,
            detail: None,
            sinks: Vec::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the filter source. Without one, every tick sends no filters.
    #[must_use]
    pub fn filters(mut self, source: impl FilterSource + 'static) -> Self {
        self.filters = Some(Box::new(source));
        self
    }

    /// Sets the focused-record source.
    #[must_use]
    pub fn detail(mut self, source: impl DetailSource + 'static) -> Self {
        self.detail = Some(Box::new(source));
        self
    }

    /// Adds a sink. Sinks are called in the order they were added.
    #[must_use]
    pub fn sink(mut self, sink: impl UpdateSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Builds the loop in the stopped state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn build(self) -> Result<UpdateLoop> {
        self.config.validate()?;

        let filters = self
            .filters
            .unwrap_or_else(|| Box::new(FilterState::new));

        Ok(UpdateLoop {
            inner: Arc::new(LoopInner {
                client: self.client,
                bus: self.bus,
                config: self.config,
                filters,
                detail: self.detail,
                sinks: self.sinks,
                state: Mutex::new(LoopState::default()),
            }),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
