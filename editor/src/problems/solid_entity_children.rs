//! Brush entities must only contain solid geometry.

use std::sync::Arc;

use mapforge_core::{Action, ActionError, ActionResult};

use crate::actions::Reparent;
use crate::document::Document;
use crate::map::{MapTree, ObjectId};
use crate::problems::{Problem, ProblemCheck};

const KIND: &str = "solid-entity-with-entity-children";

const TITLE: &str = "Brush entity has child entities";

const DESCRIPTION: &str = "A brush entity with child entities was found. A brush entity must \
     only have solid contents. Fixing the problem will move the child \
     entities up to the entity's own parent.";

/// Flags solid-classified entities that own non-solid descendants.
///
/// A brush entity may only own, directly or transitively, solid
/// geometry and transparent grouping containers. Anything else among
/// its descendants (groups are pass-throughs, not counted themselves)
/// produces one problem naming the entity.
///
/// The fix relocates every entity-typed descendant of the offender one
/// level up, to the offender's own parent — a structural move, never a
/// deletion, so no data is lost.
#[derive(Debug, Default)]
pub struct SolidEntityWithEntityChildren;

impl ProblemCheck for SolidEntityWithEntityChildren {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn check<'a>(&self, tree: &'a MapTree) -> Box<dyn Iterator<Item = Problem> + 'a> {
        let offenders = tree
            .find(tree.root(), |o| o.is_solid_entity())
            .filter(|&id| has_foreign_descendant(tree, id))
            .map(|id| {
                Problem::new(KIND, vec![id], TITLE, DESCRIPTION, Arc::new(build_fix))
            });
        Box::new(offenders)
    }
}

/// Does the entity's descendant set contain anything that is neither
/// solid geometry nor a grouping container?
fn has_foreign_descendant(tree: &MapTree, entity: ObjectId) -> bool {
    let Some(object) = tree.find_by_id(entity) else {
        return false;
    };
    object.children().iter().any(|&child| {
        tree.find(child, |o| !o.kind().is_group() && !o.kind().is_solid())
            .next()
            .is_some()
    })
}

/// Builds the reparent that lifts the offender's entity-typed
/// descendants up to the offender's own parent.
///
/// Re-resolves everything against `tree` at call time; the scan that
/// produced the problem may be stale.
fn build_fix(problem: &Problem, tree: &MapTree) -> ActionResult<Box<dyn Action<Document>>> {
    let offender_id = problem
        .objects()
        .first()
        .copied()
        .ok_or_else(|| ActionError::InvalidState("problem names no objects".into()))?;
    let offender = tree.find_by_id(offender_id).ok_or_else(|| {
        ActionError::TargetNotFound(format!("offending entity {offender_id}"))
    })?;
    let target = offender.parent().ok_or_else(|| {
        ActionError::InvalidState(format!("offending entity {offender_id} has no parent"))
    })?;

    let movers: Vec<ObjectId> = offender
        .children()
        .iter()
        .flat_map(|&child| tree.find(child, |o| o.kind().is_entity()))
        .collect();

    let action = Reparent::new(tree, target, movers)?;
    Ok(Box::new(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{EntityClass, ObjectKind};
    use crate::problems::scan;

    fn brush_entity() -> ObjectKind {
        ObjectKind::Entity {
            class: Some(EntityClass::Solid),
        }
    }

    fn point_entity() -> ObjectKind {
        ObjectKind::Entity {
            class: Some(EntityClass::Point),
        }
    }

    /// Root(1) -> brush entity E(2) -> group G(3) -> point entity F(4).
    fn offending_tree() -> (MapTree, ObjectId, ObjectId, ObjectId) {
        let mut tree = MapTree::new();
        let root = tree.root();
        let entity = tree.new_object(brush_entity(), root).unwrap();
        let group = tree.new_object(ObjectKind::Group, entity).unwrap();
        let point = tree.new_object(point_entity(), group).unwrap();
        (tree, entity, group, point)
    }

    #[test]
    fn clean_brush_entities_pass() {
        let mut tree = MapTree::new();
        let root = tree.root();
        let entity = tree.new_object(brush_entity(), root).unwrap();
        let group = tree.new_object(ObjectKind::Group, entity).unwrap();
        tree.new_object(ObjectKind::Solid, group).unwrap();
        tree.new_object(ObjectKind::Solid, entity).unwrap();

        assert!(SolidEntityWithEntityChildren
            .check(&tree)
            .next()
            .is_none());
    }

    #[test]
    fn point_entities_are_never_flagged() {
        let mut tree = MapTree::new();
        let root = tree.root();
        let point = tree.new_object(point_entity(), root).unwrap();
        // Even a malformed point entity with children is another check's
        // business.
        tree.new_object(point_entity(), point).unwrap();

        assert!(SolidEntityWithEntityChildren
            .check(&tree)
            .next()
            .is_none());
    }

    #[test]
    fn nested_foreign_descendant_is_detected_through_groups() {
        let (tree, entity, _, _) = offending_tree();
        let problems: Vec<_> = SolidEntityWithEntityChildren.check(&tree).collect();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind(), KIND);
        assert_eq!(problems[0].objects(), &[entity]);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let (tree, _, _, _) = offending_tree();
        let check = SolidEntityWithEntityChildren;
        let first: Vec<_> = check.check(&tree).map(|p| p.objects().to_vec()).collect();
        let second: Vec<_> = check.check(&tree).map(|p| p.objects().to_vec()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn fix_moves_entity_descendants_up_and_reverses() {
        let (tree, entity, group, point) = offending_tree();
        let root = tree.root();
        let mut doc = Document::new();
        *doc.tree_mut() = tree;

        let problems = scan(&crate::problems::all_checks(), doc.tree());
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].objects(), &[entity]);

        let mut fix = problems[0].fix(doc.tree()).unwrap();
        fix.perform(&mut doc).unwrap();

        // F moved up to the entity's own parent (the root); the entity
        // has no entity-typed descendant left.
        assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));
        let leftover = doc
            .tree()
            .find(entity, |o| o.kind().is_entity())
            .filter(|&id| id != entity)
            .count();
        assert_eq!(leftover, 0);
        assert!(SolidEntityWithEntityChildren
            .check(doc.tree())
            .next()
            .is_none());

        fix.reverse(&mut doc).unwrap();
        assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(group));
    }

    #[test]
    fn fix_factory_fails_cleanly_on_a_stale_problem() {
        let (tree, entity, _, _) = offending_tree();
        let mut doc = Document::new();
        *doc.tree_mut() = tree;

        let problems = scan(&crate::problems::all_checks(), doc.tree());
        doc.tree_mut().remove_subtree(entity).unwrap();

        assert!(matches!(
            problems[0].fix(doc.tree()),
            Err(ActionError::TargetNotFound(_))
        ));
    }

    #[test]
    fn fixes_are_independent() {
        // Two unrelated offenders; fixing the second first must not
        // invalidate the first problem's fix.
        let mut tree = MapTree::new();
        let root = tree.root();
        let e1 = tree.new_object(brush_entity(), root).unwrap();
        let p1 = tree.new_object(point_entity(), e1).unwrap();
        let e2 = tree.new_object(brush_entity(), root).unwrap();
        let p2 = tree.new_object(point_entity(), e2).unwrap();

        let mut doc = Document::new();
        *doc.tree_mut() = tree;

        let problems: Vec<_> = SolidEntityWithEntityChildren.check(doc.tree()).collect();
        assert_eq!(problems.len(), 2);

        // Apply in reverse order; each fix re-resolves at build time.
        let mut fix2 = problems[1].fix(doc.tree()).unwrap();
        fix2.perform(&mut doc).unwrap();
        let mut fix1 = problems[0].fix(doc.tree()).unwrap();
        fix1.perform(&mut doc).unwrap();

        assert_eq!(doc.tree().find_by_id(p1).unwrap().parent(), Some(root));
        assert_eq!(doc.tree().find_by_id(p2).unwrap().parent(), Some(root));
        assert!(SolidEntityWithEntityChildren
            .check(doc.tree())
            .next()
            .is_none());
    }
}
