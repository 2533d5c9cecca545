//! Derived membership tags.
//!
//! Membership tags ("Solids", "Groups", ...) are visibility/grouping
//! markers computed from an object's kind and its position in the tree,
//! never assigned directly by the user. Actions recompute them after
//! every structural change so that no observer ever sees tags that
//! disagree with the tree shape.
//!
//! The updater is an injected trait object on the
//! [`Document`](crate::Document) so tests can substitute a stub.

use std::collections::BTreeSet;

use crate::map::{EntityClass, MapTree, ObjectId, ObjectKind};

/// Tag for solid geometry.
pub const TAG_SOLIDS: &str = "Solids";
/// Tag for grouping containers.
pub const TAG_GROUPS: &str = "Groups";
/// Tag for point-classified (or unclassified) entities.
pub const TAG_POINT_ENTITIES: &str = "Point Entities";
/// Tag for solid-classified (brush) entities.
pub const TAG_BRUSH_ENTITIES: &str = "Brush Entities";
/// Tag for objects owned, directly or transitively, by a brush entity.
pub const TAG_BRUSH_ENTITY_CONTENTS: &str = "Brush Entity Contents";

/// Recomputes derived membership tags after structural change.
///
/// `update` receives the whole batch of objects touched by one action so
/// implementations can recompute tags that depend on more than a single
/// object's own state (the default updater's contents tag depends on
/// ancestry). Ids that no longer resolve are skipped.
pub trait MembershipUpdater: Send {
    /// Recomputes tags for the given objects against the current tree
    /// shape.
    fn update(&self, tree: &mut MapTree, objects: &[ObjectId]);
}

/// The standard tag rules.
///
/// - `Solids` / `Groups` for the plain structural kinds;
/// - `Point Entities` for point and unclassified entities,
///   `Brush Entities` for solid-classified ones;
/// - `Brush Entity Contents` for any object with a brush entity among
///   its ancestors.
#[derive(Debug, Default)]
pub struct AutoMembership;

impl AutoMembership {
    fn compute(&self, tree: &MapTree, id: ObjectId) -> Option<BTreeSet<String>> {
        let object = tree.find_by_id(id)?;
        let mut tags = BTreeSet::new();
        match object.kind() {
            ObjectKind::Root => {}
            ObjectKind::Group => {
                tags.insert(TAG_GROUPS.to_string());
            }
            ObjectKind::Solid => {
                tags.insert(TAG_SOLIDS.to_string());
            }
            ObjectKind::Entity { class } => {
                if class == Some(EntityClass::Solid) {
                    tags.insert(TAG_BRUSH_ENTITIES.to_string());
                } else {
                    tags.insert(TAG_POINT_ENTITIES.to_string());
                }
            }
        }
        if self.has_brush_entity_ancestor(tree, id) {
            tags.insert(TAG_BRUSH_ENTITY_CONTENTS.to_string());
        }
        Some(tags)
    }

    fn has_brush_entity_ancestor(&self, tree: &MapTree, id: ObjectId) -> bool {
        let mut current = tree.find_by_id(id).and_then(|o| o.parent());
        while let Some(ancestor) = current {
            match tree.find_by_id(ancestor) {
                Some(o) if o.is_solid_entity() => return true,
                Some(o) => current = o.parent(),
                None => return false,
            }
        }
        false
    }
}

impl MembershipUpdater for AutoMembership {
    fn update(&self, tree: &mut MapTree, objects: &[ObjectId]) {
        for &id in objects {
            if let Some(tags) = self.compute(tree, id) {
                tree.set_memberships(id, tags);
            }
        }
    }
}
