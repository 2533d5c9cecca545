//! Post-mutation change notifications.
//!
//! [`NotificationBus`] is an injected capability owned by each
//! [`Document`](crate::Document) rather than a process-wide singleton,
//! so tests can subscribe a capturing stub. Delivery is synchronous and
//! fire-and-forget: every current subscriber has observed the event
//! before [`NotificationBus::publish`] returns, which is what actions
//! rely on when they publish after completing their mutations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A change event published after a mutation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// The shape of the object tree changed (objects moved, added or
    /// removed).
    TreeStructureChanged,
    /// Derived membership tags were recomputed.
    MembershipsChanged,
    /// The current selection set changed.
    SelectionChanged,
}

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(Notification) + Send>;

/// Synchronous publish/subscribe bus for [`Notification`]s.
///
/// Subscribers are invoked in subscription order, on the publishing
/// thread, before `publish` returns. Handlers must not assume access to
/// the document — they receive only the event kind and react on their
/// own state (dirty flags, pending-refresh queues, captured logs).
pub struct NotificationBus {
    subscribers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
}

impl NotificationBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a handler, returning its removal handle.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(Notification) + Send + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was not
    /// registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != id);
        self.subscribers.len() != before
    }

    /// Delivers `notification` to every current subscriber before
    /// returning.
    pub fn publish(&mut self, notification: Notification) {
        for (_, handler) in &mut self.subscribers {
            handler(notification);
        }
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
