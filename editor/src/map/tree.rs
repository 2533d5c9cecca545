//! The map tree arena.

use std::collections::BTreeSet;
use std::collections::HashMap;

use thiserror::Error;

use super::object::{ClassificationProvider, MapObject, ObjectId, ObjectKind};

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id does not resolve to a live object in this tree.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    /// The root cannot be reparented or removed.
    #[error("the root object cannot be moved or removed")]
    RootImmovable,
    /// Attaching `child` under `parent` would create a cycle.
    #[error("cannot attach {child} under {parent}: would create a cycle")]
    Cycle {
        /// The object being moved.
        child: ObjectId,
        /// The requested new parent.
        parent: ObjectId,
    },
    /// A tree has exactly one root, created with the tree itself.
    #[error("a tree has exactly one root")]
    SecondRoot,
}

/// The owned hierarchy of map objects for one document.
///
/// Objects live in an arena keyed by [`ObjectId`]; parent/child
/// relationships are stored as ids, never as references, so mutations
/// stay atomic and the acyclicity invariant is checked on every move.
/// The tree exclusively owns the root and, transitively, every object.
///
/// Ids are allocated monotonically and never reused, so an id held
/// across an unrelated deletion simply stops resolving instead of
/// aliasing a new object.
#[derive(Debug, Clone)]
pub struct MapTree {
    objects: HashMap<ObjectId, MapObject>,
    root: ObjectId,
    next_id: u64,
}

impl MapTree {
    /// Creates a tree containing only the root object.
    pub fn new() -> Self {
        let root = ObjectId::from_raw(1);
        let mut objects = HashMap::new();
        objects.insert(root, MapObject::new(root, None, ObjectKind::Root));
        Self {
            objects,
            root,
            next_id: 2,
        }
    }

    /// Returns the root object's id.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Returns the number of live objects, including the root.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.objects.len() == 1
    }

    /// Returns `true` if `id` resolves to a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Looks up an object by id.
    pub fn find_by_id(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.get(&id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: ObjectId) -> Option<&mut MapObject> {
        self.objects.get_mut(&id)
    }

    /// Creates a new object of the given kind under `parent`.
    ///
    /// Returns the freshly allocated id. Fails if `parent` does not
    /// resolve or if `kind` is [`ObjectKind::Root`] — the root is
    /// created with the tree and is unique.
    pub fn new_object(&mut self, kind: ObjectKind, parent: ObjectId) -> Result<ObjectId, TreeError> {
        if matches!(kind, ObjectKind::Root) {
            return Err(TreeError::SecondRoot);
        }
        if !self.objects.contains_key(&parent) {
            return Err(TreeError::UnknownObject(parent));
        }
        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        self.objects
            .insert(id, MapObject::new(id, Some(parent), kind));
        if let Some(p) = self.objects.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Creates an entity under `parent`, classified through the given
    /// provider.
    pub fn new_entity(
        &mut self,
        parent: ObjectId,
        class_name: &str,
        provider: &dyn ClassificationProvider,
    ) -> Result<ObjectId, TreeError> {
        let class = provider.classify(class_name);
        self.new_object(ObjectKind::Entity { class }, parent)
    }

    /// Moves `object` under `new_parent`.
    ///
    /// Atomically detaches the object from its current parent's child set
    /// and attaches it to the new parent's, updating the back-reference;
    /// no partial state is observable between detach and attach. Moving
    /// an object to its current parent is a no-op.
    ///
    /// Fails without mutating anything if either id does not resolve, if
    /// `object` is the root, or if the move would create a cycle (the new
    /// parent is the object itself or one of its descendants).
    pub fn set_parent(&mut self, object: ObjectId, new_parent: ObjectId) -> Result<(), TreeError> {
        let old_parent = match self.objects.get(&object) {
            Some(o) => o.parent.ok_or(TreeError::RootImmovable)?,
            None => return Err(TreeError::UnknownObject(object)),
        };
        if !self.objects.contains_key(&new_parent) {
            return Err(TreeError::UnknownObject(new_parent));
        }
        if new_parent == object || self.is_ancestor(object, new_parent) {
            return Err(TreeError::Cycle {
                child: object,
                parent: new_parent,
            });
        }
        if old_parent == new_parent {
            return Ok(());
        }

        // All checks passed; the three writes below cannot fail.
        if let Some(old) = self.objects.get_mut(&old_parent) {
            old.children.retain(|&c| c != object);
        }
        if let Some(obj) = self.objects.get_mut(&object) {
            obj.parent = Some(new_parent);
        }
        if let Some(new) = self.objects.get_mut(&new_parent) {
            new.children.push(object);
        }
        Ok(())
    }

    /// Detaches `object` from its parent and drops it and its whole
    /// subtree from the arena.
    ///
    /// The removed ids stop resolving; they are never reallocated.
    pub fn remove_subtree(&mut self, object: ObjectId) -> Result<(), TreeError> {
        let parent = match self.objects.get(&object) {
            Some(o) => o.parent.ok_or(TreeError::RootImmovable)?,
            None => return Err(TreeError::UnknownObject(object)),
        };
        if let Some(p) = self.objects.get_mut(&parent) {
            p.children.retain(|&c| c != object);
        }
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.objects.remove(&id) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Returns a lazy, restartable depth-first search over the subtree
    /// rooted at `start`.
    ///
    /// Traversal is deterministic: pre-order, current child order.
    /// `start` itself is yielded only when the predicate matches it —
    /// it is never implicitly included. The iterator borrows the tree,
    /// so the tree cannot be mutated while a search is live; create a
    /// fresh iterator to restart after a mutation.
    pub fn find<P>(&self, start: ObjectId, predicate: P) -> Find<'_, P>
    where
        P: FnMut(&MapObject) -> bool,
    {
        Find {
            tree: self,
            stack: vec![start],
            predicate,
        }
    }

    /// Returns every object in the subtree rooted at `start`, including
    /// `start` itself, in depth-first order.
    pub fn subtree(&self, start: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.find(start, |_| true)
    }

    /// Replaces the derived membership tags of `object`.
    ///
    /// Used by [`MembershipUpdater`](crate::membership::MembershipUpdater)
    /// implementations; returns `false` if the id does not resolve.
    pub fn set_memberships(&mut self, object: ObjectId, memberships: BTreeSet<String>) -> bool {
        match self.objects.get_mut(&object) {
            Some(o) => {
                o.memberships = memberships;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `of`
    /// (or equals it).
    fn is_ancestor(&self, ancestor: ObjectId, of: ObjectId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.objects.get(&id).and_then(|o| o.parent);
        }
        false
    }
}

impl Default for MapTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy depth-first predicate search over a subtree.
///
/// Returned by [`MapTree::find`]. Yields ids rather than references so
/// results can be collected and resolved later.
pub struct Find<'a, P> {
    tree: &'a MapTree,
    stack: Vec<ObjectId>,
    predicate: P,
}

impl<P> Iterator for Find<'_, P>
where
    P: FnMut(&MapObject) -> bool,
{
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        while let Some(id) = self.stack.pop() {
            let Some(object) = self.tree.objects.get(&id) else {
                continue;
            };
            // Reversed push keeps the traversal in child order.
            for &child in object.children.iter().rev() {
                self.stack.push(child);
            }
            if (self.predicate)(object) {
                return Some(id);
            }
        }
        None
    }
}
