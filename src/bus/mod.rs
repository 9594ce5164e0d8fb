//! Synchronous publish/subscribe fan-out.
//!
//! An [`EventBus`] keeps an explicit list of subscriber closures. Emission
//! calls every subscriber on the emitting thread; there is no ordering
//! guarantee between subscribers. Subscriptions are removed explicitly with
//! [`Subscription::disconnect`]; dropping the handle leaves them connected.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Identifier of one subscriber on one bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registry<E> {
    subscribers: RwLock<Vec<(SubscriptionId, Callback<E>)>>,
    next_id: AtomicU64,
}

impl<E> Registry<E> {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }
}

/// Cloneable handle to a shared subscriber registry.
///
/// # Example
///
/// ```rust
/// use strata::bus::EventBus;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let bus = EventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&seen);
/// let subscription = bus.connect(move |value: &usize| {
///     counter.fetch_add(*value, Ordering::SeqCst);
/// });
///
/// bus.emit(&3);
/// subscription.disconnect();
/// bus.emit(&4);
///
/// assert_eq!(seen.load(Ordering::SeqCst), 3);
/// ```
pub struct EventBus<E> {
    registry: Arc<Registry<E>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a subscriber and return the handle that removes it.
    pub fn connect<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
        E: 'static,
    {
        let id = SubscriptionId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry
            .subscribers
            .write()
            .push((id, Arc::new(handler)));

        let weak: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            remover: Box::new(move || weak.upgrade().is_some_and(|r| r.remove(id))),
        }
    }

    /// Invoke every connected subscriber with `event`.
    ///
    /// Subscribers run outside the registry lock, so they may connect or
    /// disconnect while being called.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .registry
            .subscribers
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers.read().len()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`EventBus::connect`].
///
/// The handle does not hold the bus alive; disconnecting after the bus is
/// gone is a no-op.
pub struct Subscription {
    id: SubscriptionId,
    remover: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the subscriber. Returns `false` if it was already gone.
    pub fn disconnect(&self) -> bool {
        (self.remover)()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn emit_reaches_every_subscriber() {
        let bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let received = Arc::clone(&received);
            bus.connect(move |event: &u32| received.lock().push((tag, *event)));
        }

        bus.emit(&5);

        let mut received = received.lock().clone();
        received.sort();
        assert_eq!(received, vec![("first", 5), ("second", 5)]);
    }

    #[test]
    fn disconnect_removes_only_that_subscriber() {
        let bus = EventBus::new();
        let first = bus.connect(|_: &u32| {});
        let second = bus.connect(|_: &u32| {});

        assert_eq!(bus.subscriber_count(), 2);
        assert_ne!(first.id(), second.id());
        assert!(first.disconnect());
        assert!(!first.disconnect());
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn dropping_handle_keeps_subscription() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0));
        {
            let hits = Arc::clone(&hits);
            let _subscription = bus.connect(move |_: &()| *hits.lock() += 1);
        }

        bus.emit(&());

        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn disconnect_after_bus_dropped_is_noop() {
        let bus = EventBus::new();
        let subscription = bus.connect(|_: &u8| {});
        drop(bus);

        assert!(!subscription.disconnect());
    }

    #[test]
    fn subscriber_may_connect_during_emit() {
        let bus: EventBus<u8> = EventBus::new();
        let inner = bus.clone();
        bus.connect(move |_| {
            inner.connect(|_| {});
        });

        bus.emit(&0);

        assert_eq!(bus.subscriber_count(), 2);
    }
}
