use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: BTreeMap<u64, Handler<E>>,
}

/// Narrow publish/subscribe channel for one event type.
///
/// Handles are cheap to clone and all clones share one registry. Handlers run
/// synchronously on the publishing thread, in subscription order. The registry
/// lock is not held while handlers run, so a handler may publish or
/// unsubscribe without deadlocking.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
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

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: BTreeMap::new(),
            })),
        }
    }

    /// Registers `handler`; it stays registered until the returned
    /// [`Subscription`] is dropped or explicitly unsubscribed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut reg = self.registry.lock();
        let id = reg.next_id;
        reg.next_id = reg.next_id.wrapping_add(1);
        reg.handlers.insert(id, Arc::new(handler));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every current subscriber.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: E) -> usize {
        let handlers: Vec<Handler<E>> = self.registry.lock().handlers.values().cloned().collect();
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().handlers.len()
    }
}

/// Live registration on an [`EventBus`].
pub struct Subscription<E> {
    id: u64,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> Subscription<E> {
    pub fn unsubscribe(self) {
        // Removal happens in Drop.
    }

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().handlers.remove(&self.id);
        }
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.remove();
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn delivers_to_subscribers_in_subscription_order() {
        let bus: EventBus<&'static str> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s1 = {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |e: &&'static str| seen.lock().push(format!("a:{e}")))
        };
        let s2 = {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |e: &&'static str| seen.lock().push(format!("b:{e}")))
        };

        assert_eq!(bus.publish("x"), 2);
        assert_eq!(*seen.lock(), vec!["a:x", "b:x"]);
        drop((s1, s2));
    }

    #[test]
    fn dropping_or_unsubscribing_removes_handler() {
        let bus: EventBus<u32> = EventBus::new();
        let hits = Arc::new(Mutex::new(0u32));

        let sub = {
            let hits = Arc::clone(&hits);
            bus.subscribe(move |_| *hits.lock() += 1)
        };
        bus.publish(1);
        sub.unsubscribe();
        bus.publish(2);
        assert_eq!(*hits.lock(), 1);
        assert_eq!(bus.subscriber_count(), 0);

        {
            let hits = Arc::clone(&hits);
            let _scoped = bus.subscribe(move |_| *hits.lock() += 1);
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.publish(3), 0);
    }

    #[test]
    fn clones_share_one_registry() {
        let a: EventBus<u8> = EventBus::new();
        let b = a.clone();
        let _sub = b.subscribe(|_| {});
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(a.publish(7), 1);
    }

    #[test]
    fn handler_may_publish_reentrantly() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let bus2 = bus.clone();
            let seen = Arc::clone(&seen);
            bus.subscribe(move |e: &u32| {
                seen.lock().push(*e);
                if *e == 0 {
                    bus2.publish(1);
                }
            })
        };
        bus.publish(0);
        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus: EventBus<u8> = EventBus::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        sub.unsubscribe();
    }
}
