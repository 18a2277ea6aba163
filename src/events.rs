//! App-wide events.
//!
//! A small typed bus: each subscriber gets its own channel and drains it on
//! its own schedule (the new-tab screen does so once per frame). Dropping a
//! [`Subscription`] unregisters it, so a torn-down screen never receives
//! callbacks.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, Weak};

/// Events the new-tab screen reacts to. They carry no payload; receivers
/// query current state themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
    /// Legacy bookmarks were imported into the favorites store.
    LegacyFavoritesMigrated,
    /// Private browsing was switched on or off.
    PrivacyModeChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, mpsc::Sender<AppEvent>)>,
}

/// Cloneable handle to a shared event bus.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut reg = self.registry.lock().unwrap_or_else(|p| p.into_inner());
        let id = SubscriptionId(reg.next_id);
        reg.next_id += 1;
        reg.subscribers.push((id, tx));
        log::debug!("Event subscriber {:?} registered", id);
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every live subscriber. Returns the delivery count.
    pub fn publish(&self, event: AppEvent) -> usize {
        let mut reg = self.registry.lock().unwrap_or_else(|p| p.into_inner());
        // Disconnected receivers are pruned as a side effect.
        reg.subscribers.retain(|(_, tx)| tx.send(event).is_ok());
        log::debug!("Published {:?} to {} subscribers", event, reg.subscribers.len());
        reg.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .subscribers
            .len()
    }
}

/// A registered receiver; unsubscribes on drop.
pub struct Subscription {
    id: SubscriptionId,
    rx: mpsc::Receiver<AppEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Take every event delivered since the last drain, oldest first.
    pub fn drain(&self) -> Vec<AppEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.lock().unwrap_or_else(|p| p.into_inner());
            reg.subscribers.retain(|(id, _)| *id != self.id);
            log::debug!("Event subscriber {:?} removed", self.id);
        }
    }
}
