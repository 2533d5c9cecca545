//! The editable map document.

use std::collections::HashSet;

use mapforge_core::Editable;

use crate::map::{MapTree, ObjectId};
use crate::membership::{AutoMembership, MembershipUpdater};
use crate::notify::{Notification, NotificationBus, SubscriberId};

/// One open map: the object tree plus the editing state around it.
///
/// The document is the [`Editable`] target that actions mutate. It owns
/// the [`MapTree`], the injected [`NotificationBus`] and
/// [`MembershipUpdater`], and the current selection set. The undo/redo
/// ledger ([`ActionHistory`](mapforge_core::ActionHistory)) is owned by
/// the embedding shell; this core only produces actions compatible with
/// it.
pub struct Document {
    tree: MapTree,
    bus: NotificationBus,
    membership: Box<dyn MembershipUpdater>,
    selection: HashSet<ObjectId>,
}

impl Editable for Document {}

impl Document {
    /// Creates an empty document with the standard
    /// [`AutoMembership`] tag rules.
    pub fn new() -> Self {
        Self::with_membership(Box::new(AutoMembership))
    }

    /// Creates an empty document with a custom membership updater.
    pub fn with_membership(membership: Box<dyn MembershipUpdater>) -> Self {
        Self {
            tree: MapTree::new(),
            bus: NotificationBus::new(),
            membership,
            selection: HashSet::new(),
        }
    }

    /// Returns the object tree.
    pub fn tree(&self) -> &MapTree {
        &self.tree
    }

    /// Returns the object tree for mutation.
    ///
    /// Callers mutating the tree are responsible for recomputing
    /// memberships and publishing notifications afterwards; actions do
    /// this as part of their contract.
    pub fn tree_mut(&mut self) -> &mut MapTree {
        &mut self.tree
    }

    /// Recomputes derived membership tags for a batch of objects.
    pub fn update_memberships(&mut self, objects: &[ObjectId]) {
        self.membership.update(&mut self.tree, objects);
    }

    /// Registers a notification handler.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(Notification) + Send + 'static,
    {
        self.bus.subscribe(handler)
    }

    /// Removes a notification handler.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Publishes a notification to all current subscribers before
    /// returning.
    pub fn publish(&mut self, notification: Notification) {
        self.bus.publish(notification);
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &HashSet<ObjectId> {
        &self.selection
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// Adds live objects to the selection. Ids that do not resolve are
    /// ignored.
    pub fn select(&mut self, objects: &[ObjectId]) {
        let mut changed = false;
        for &id in objects {
            if self.tree.contains(id) && self.selection.insert(id) {
                changed = true;
            }
        }
        if changed {
            self.bus.publish(Notification::SelectionChanged);
        }
    }

    /// Removes objects from the selection.
    pub fn deselect(&mut self, objects: &[ObjectId]) {
        let mut changed = false;
        for id in objects {
            if self.selection.remove(id) {
                changed = true;
            }
        }
        if changed {
            self.bus.publish(Notification::SelectionChanged);
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.bus.publish(Notification::SelectionChanged);
        }
    }

    /// Drops selected ids that no longer resolve to live objects.
    ///
    /// Called after deletions so the selection never holds stale ids.
    pub fn prune_selection(&mut self) {
        let before = self.selection.len();
        let tree = &self.tree;
        self.selection.retain(|&id| tree.contains(id));
        if self.selection.len() != before {
            self.bus.publish(Notification::SelectionChanged);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("objects", &self.tree.len())
            .field("selected", &self.selection.len())
            .finish()
    }
}
