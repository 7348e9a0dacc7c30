//! Process-wide publish/subscribe registry.
//!
//! Topics map to ordered listener lists. Delivery is synchronous and happens
//! on the caller's stack; nothing is buffered, so a handler registered after a
//! publish never observes it.

use fnv::FnvHashMap;
use std::hash::Hash;

/// Handle returned by [`EventBus::subscribe`], used to remove the listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<P> = Box<dyn FnMut(&P)>;

pub struct EventBus<K, P> {
    topics: FnvHashMap<K, Vec<(SubscriptionId, Handler<P>)>>,
    next_id: u64,
}

impl<K, P> Default for EventBus<K, P>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> EventBus<K, P>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            topics: FnvHashMap::default(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, topic: K, handler: impl FnMut(&P) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.topics
            .entry(topic)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Invoke every handler registered for `topic`, in registration order.
    /// Returns how many handlers ran; an unknown topic is a no-op.
    pub fn publish(&mut self, topic: K, payload: &P) -> usize {
        match self.topics.get_mut(&topic) {
            Some(handlers) => {
                for (_, handler) in handlers.iter_mut() {
                    handler(payload);
                }
                handlers.len()
            }
            None => 0,
        }
    }

    /// Remove one handler. The topic entry disappears once its list is empty.
    pub fn unsubscribe(&mut self, topic: K, id: SubscriptionId) -> bool {
        let Some(handlers) = self.topics.get_mut(&topic) else {
            log::debug!("[bus] unsubscribe on unknown topic {:?}", topic);
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.topics.remove(&topic);
        }
        if !removed {
            log::debug!("[bus] no listener {:?} on {:?}", id, topic);
        }
        removed
    }

    pub fn listener_count(&self, topic: K) -> usize {
        self.topics.get(&topic).map(Vec::len).unwrap_or(0)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
