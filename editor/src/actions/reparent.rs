//! Moving objects to a new parent.

use std::collections::HashMap;

use mapforge_core::{Action, ActionError, ActionResult};

use crate::document::Document;
use crate::map::{MapTree, ObjectId, TreeError};
use crate::notify::Notification;

/// Captured pre-state for one moved object.
#[derive(Debug, Clone, Copy)]
struct ReparentRecord {
    id: ObjectId,
    original_parent: ObjectId,
}

/// Moves a set of objects under a new parent, reversibly.
///
/// Construction is observation-only: for every input object the action
/// records the object's id and its parent id *at construction time*, so
/// reversal restores each object to its own original parent even when
/// the moved set was drawn from several distinct parents.
///
/// `perform` is all-or-nothing: if the target parent does not resolve,
/// or any individual move fails, the already-moved prefix is rolled back
/// to the captured parents and the document is left unchanged. Derived
/// memberships are recomputed in one batched pass per direction, and the
/// two change notifications are published only after all mutation for
/// that call has completed.
///
/// `reverse` tolerates staleness: a recorded object or original parent
/// deleted by an unrelated later edit is skipped with a warning instead
/// of failing the whole reversal.
#[derive(Debug)]
pub struct Reparent {
    target_parent: ObjectId,
    records: Vec<ReparentRecord>,
    applied: bool,
}

impl Reparent {
    /// Captures the pre-state for moving `objects` under
    /// `target_parent`.
    ///
    /// Fails with [`ActionError::Precondition`] if any input object does
    /// not resolve or has no parent (the root cannot be reparented). The
    /// target parent is deliberately *not* resolved here — it is
    /// re-resolved at perform time, since a fix built from a stale scan
    /// must never dereference stale state.
    pub fn new(
        tree: &MapTree,
        target_parent: ObjectId,
        objects: impl IntoIterator<Item = ObjectId>,
    ) -> ActionResult<Self> {
        let mut records = Vec::new();
        for id in objects {
            let object = tree
                .find_by_id(id)
                .ok_or_else(|| ActionError::Precondition(format!("object {id} does not exist")))?;
            let original_parent = object.parent().ok_or_else(|| {
                ActionError::Precondition(format!("object {id} has no parent to restore"))
            })?;
            records.push(ReparentRecord {
                id,
                original_parent,
            });
        }
        Ok(Self {
            target_parent,
            records,
            applied: false,
        })
    }

    /// Restores already-moved objects to their captured parents after a
    /// mid-perform failure.
    fn roll_back(&self, doc: &mut Document, moved: &[ObjectId]) {
        for record in self.records.iter().filter(|r| moved.contains(&r.id)) {
            if let Err(e) = doc.tree_mut().set_parent(record.id, record.original_parent) {
                log::error!("reparent rollback failed for {}: {e}", record.id);
            }
        }
    }
}

impl Action<Document> for Reparent {
    fn perform(&mut self, doc: &mut Document) -> ActionResult {
        debug_assert!(!self.applied, "Reparent performed twice without reversal");

        // Resolve the target once; a missing target fails the action
        // outright rather than attaching anywhere else.
        if !doc.tree().contains(self.target_parent) {
            return Err(ActionError::TargetNotFound(format!(
                "reparent target {}",
                self.target_parent
            )));
        }

        let mut moved = Vec::with_capacity(self.records.len());
        for record in &self.records {
            match doc.tree_mut().set_parent(record.id, self.target_parent) {
                Ok(()) => moved.push(record.id),
                Err(e) => {
                    self.roll_back(doc, &moved);
                    return Err(tree_error(e));
                }
            }
        }

        // Tags like the brush-entity contents marker depend on ancestry,
        // so every descendant of a moved object needs recomputing too.
        let batch: Vec<ObjectId> = self
            .records
            .iter()
            .flat_map(|r| doc.tree().subtree(r.id))
            .collect();
        doc.update_memberships(&batch);
        doc.publish(Notification::TreeStructureChanged);
        doc.publish(Notification::MembershipsChanged);
        self.applied = true;
        Ok(())
    }

    fn reverse(&mut self, doc: &mut Document) -> ActionResult {
        // One-time resolution of every distinct original parent; a
        // parent deleted since perform makes its objects unrestorable,
        // which is a per-object skip, not a failure.
        let mut parents: HashMap<ObjectId, bool> = HashMap::new();
        for record in &self.records {
            parents
                .entry(record.original_parent)
                .or_insert_with(|| doc.tree().contains(record.original_parent));
        }

        let mut restored = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if !doc.tree().contains(record.id) {
                log::warn!("skipping reversal of deleted object {}", record.id);
                continue;
            }
            if !parents[&record.original_parent] {
                log::warn!(
                    "skipping reversal of {}: original parent {} no longer exists",
                    record.id,
                    record.original_parent
                );
                continue;
            }
            match doc.tree_mut().set_parent(record.id, record.original_parent) {
                Ok(()) => restored.push(record.id),
                Err(e) => log::warn!("skipping reversal of {}: {e}", record.id),
            }
        }

        let batch: Vec<ObjectId> = restored
            .iter()
            .flat_map(|&id| doc.tree().subtree(id))
            .collect();
        doc.update_memberships(&batch);
        doc.publish(Notification::TreeStructureChanged);
        doc.publish(Notification::MembershipsChanged);
        self.applied = false;
        Ok(())
    }

    fn description(&self) -> &str {
        "Reparent objects"
    }

    fn dispose(&mut self) {
        self.records.clear();
    }
}

fn tree_error(e: TreeError) -> ActionError {
    match e {
        TreeError::UnknownObject(id) => ActionError::TargetNotFound(id.to_string()),
        other => ActionError::InvalidState(other.to_string()),
    }
}
