//! Typed publish/subscribe bus.
//!
//! Subscribers are kept in one list per event kind and called in
//! subscription order. The lock is released before any handler runs, so
//! handlers may subscribe, unsubscribe or emit from inside a callback.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::identifiers::SubscriptionId;

use super::Event;

// ============================================================================
// Types
// ============================================================================

/// Event handler callback type.
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// One registered handler.
struct Subscriber<E> {
    id: SubscriptionId,
    handler: Handler<E>,
    once: bool,
}

/// Subscriber lists keyed by event kind.
type SubscriberMap<E> = FxHashMap<<E as Event>::Kind, Vec<Subscriber<E>>>;

// ============================================================================
// EventBus
// ============================================================================

/// Multi-subscriber fan-out for one event family.
///
/// Cloning the bus yields another handle to the same subscriber lists.
pub struct EventBus<E: Event> {
    subscribers: Arc<Mutex<SubscriberMap<E>>>,
}

impl<E: Event> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.subscribers.lock();
        let total: usize = subscribers.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("subscribers", &total)
            .finish()
    }
}

impl<E: Event> EventBus<E> {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Registers `handler` for every event of `kind`.
    pub fn subscribe<F>(&self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.insert(kind, Arc::new(handler), false)
    }

    /// Registers `handler` for the next event of `kind` only.
    pub fn once<F>(&self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.insert(kind, Arc::new(handler), true)
    }

    /// Removes a subscription.
    ///
    /// Returns `false` if the id was unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        for list in subscribers.values_mut() {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Delivers `event` to every subscriber of its kind.
    ///
    /// Returns the number of handlers called.
    pub fn emit(&self, event: &E) -> usize {
        let kind = event.kind();

        let handlers: Vec<Handler<E>> = {
            let mut subscribers = self.subscribers.lock();
            let Some(list) = subscribers.get_mut(&kind) else {
                return 0;
            };
            let handlers = list.iter().map(|s| Arc::clone(&s.handler)).collect();
            list.retain(|s| !s.once);
            handlers
        };

        trace!(?kind, count = handlers.len(), "Emitting event");

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Returns the number of subscribers for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.subscribers.lock().get(&kind).map_or(0, Vec::len)
    }

    fn insert(&self, kind: E::Kind, handler: Handler<E>, once: bool) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers
            .lock()
            .entry(kind)
            .or_default()
            .push(Subscriber { id, handler, once });
        id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    #[derive(Debug)]
    struct Msg(Kind, u32);

    impl Event for Msg {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            self.0
        }
    }

    #[test]
    fn test_emit_reaches_only_matching_kind() {
        let bus = EventBus::<Msg>::new();
        let pings = Arc::new(AtomicUsize::new(0));
        let pongs = Arc::new(AtomicUsize::new(0));

        let p = Arc::clone(&pings);
        bus.subscribe(Kind::Ping, move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });
        let p = Arc::clone(&pongs);
        bus.subscribe(Kind::Pong, move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.emit(&Msg(Kind::Ping, 1)), 1);
        assert_eq!(pings.load(Ordering::SeqCst), 1);
        assert_eq!(pongs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fan_out_in_subscription_order() {
        let bus = EventBus::<Msg>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.subscribe(Kind::Ping, move |msg| order.lock().push((n, msg.1)));
        }

        bus.emit(&Msg(Kind::Ping, 7));
        assert_eq!(*order.lock(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let bus = EventBus::<Msg>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        bus.once(Kind::Ping, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&Msg(Kind::Ping, 1));
        bus.emit(&Msg(Kind::Ping, 2));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(Kind::Ping), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::<Msg>::new();
        let id = bus.subscribe(Kind::Pong, |_| {});

        assert_eq!(bus.subscriber_count(Kind::Pong), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.emit(&Msg(Kind::Pong, 0)), 0);
    }

    #[test]
    fn test_handler_may_emit_reentrantly() {
        let bus = EventBus::<Msg>::new();
        let pongs = Arc::new(AtomicUsize::new(0));

        let inner = bus.clone();
        bus.subscribe(Kind::Ping, move |msg| {
            inner.emit(&Msg(Kind::Pong, msg.1));
        });
        let p = Arc::clone(&pongs);
        bus.subscribe(Kind::Pong, move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&Msg(Kind::Ping, 1));
        assert_eq!(pongs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clone_shares_subscribers() {
        let bus = EventBus::<Msg>::new();
        let other = bus.clone();
        other.subscribe(Kind::Ping, |_| {});
        assert_eq!(bus.subscriber_count(Kind::Ping), 1);
    }
}
