//! End-to-end tests: detection, remediation, and undo through the full
//! action path.

use std::sync::{Arc, Mutex};

use mapforge_core::{ActionHistory, ActionQueue};
use mapforge_editor::map::{EntityClass, MapTree, ObjectId, ObjectKind};
use mapforge_editor::notify::Notification;
use mapforge_editor::problems::{all_checks, scan};
use mapforge_editor::Document;

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

/// Root -> brush entity -> group -> point entity, the canonical
/// offending shape.
fn offending_document() -> (Document, ObjectId, ObjectId, ObjectId) {
    let mut doc = Document::new();
    let root = doc.tree().root();
    let tree = doc.tree_mut();
    let entity = tree.new_object(brush_entity(), root).unwrap();
    let group = tree.new_object(ObjectKind::Group, entity).unwrap();
    let point = tree.new_object(point_entity(), group).unwrap();
    (doc, entity, group, point)
}

#[test]
fn detect_fix_undo_cycle() {
    let (mut doc, entity, group, point) = offending_document();
    let root = doc.tree().root();

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    doc.subscribe(move |n| sink.lock().unwrap().push(n));

    // Detect.
    let problems = scan(&all_checks(), doc.tree());
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].objects(), &[entity]);

    // Fix through the history, like any user edit.
    let mut history = ActionHistory::<Document>::new(10);
    let fix = problems[0].fix(doc.tree()).unwrap();
    history.execute(fix, &mut doc).unwrap();

    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));
    assert!(scan(&all_checks(), doc.tree()).is_empty());
    assert!(history.has_unsaved_changes());

    // Undo restores the offending shape, problem and all.
    history.undo(&mut doc).unwrap();
    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(group));
    assert_eq!(scan(&all_checks(), doc.tree()).len(), 1);

    // Redo replays in mirrored order.
    history.redo(&mut doc).unwrap();
    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));

    // Each perform/reverse published its two notifications, after the
    // mutation, exactly once.
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            Notification::TreeStructureChanged,
            Notification::MembershipsChanged,
            Notification::TreeStructureChanged,
            Notification::MembershipsChanged,
            Notification::TreeStructureChanged,
            Notification::MembershipsChanged,
        ]
    );
}

#[test]
fn tree_lookups_match_pre_perform_state_after_undo() {
    let (mut doc, entity, group, point) = offending_document();

    let before: Vec<(ObjectId, Option<ObjectId>)> = doc
        .tree()
        .subtree(doc.tree().root())
        .map(|id| (id, doc.tree().find_by_id(id).unwrap().parent()))
        .collect();

    let mut history = ActionHistory::<Document>::new(10);
    let problems = scan(&all_checks(), doc.tree());
    let fix = problems[0].fix(doc.tree()).unwrap();
    history.execute(fix, &mut doc).unwrap();
    history.undo(&mut doc).unwrap();

    let after: Vec<(ObjectId, Option<ObjectId>)> = doc
        .tree()
        .subtree(doc.tree().root())
        .map(|id| (id, doc.tree().find_by_id(id).unwrap().parent()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(group));
    assert!(doc.tree().contains(entity));
}

#[test]
fn off_thread_scan_feeds_fixes_through_the_queue() {
    let (mut doc, _, _, point) = offending_document();
    let root = doc.tree().root();

    // Scans are read-only; hand a snapshot to another thread and let it
    // submit fixes through the queue. Ids survive the round trip because
    // fixes re-resolve them at build time against the live tree.
    let snapshot: MapTree = doc.tree().clone();
    let queue = Arc::new(ActionQueue::<Document>::new());

    let offenders: Vec<ObjectId> = {
        let scanner = std::thread::spawn(move || {
            scan(&all_checks(), &snapshot)
                .iter()
                .flat_map(|p| p.objects().to_vec())
                .collect()
        });
        scanner.join().unwrap()
    };
    assert_eq!(offenders.len(), 1);

    // Back on the editing thread: rebuild problems against the live
    // tree and queue their fixes.
    for problem in scan(&all_checks(), doc.tree()) {
        queue.push(problem.fix(doc.tree()).unwrap());
    }

    let mut history = ActionHistory::<Document>::new(10);
    for action in queue.drain() {
        history.execute(action, &mut doc).unwrap();
    }

    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));
    assert!(scan(&all_checks(), doc.tree()).is_empty());
}

#[test]
fn stale_fix_reversal_survives_unrelated_deletion() {
    let (mut doc, _, _, point) = offending_document();
    let root = doc.tree().root();

    // Add a second offender so the fix moves two objects.
    let entity2 = doc.tree_mut().new_object(brush_entity(), root).unwrap();
    let point2 = doc.tree_mut().new_object(point_entity(), entity2).unwrap();

    let mut history = ActionHistory::<Document>::new(10);
    for problem in scan(&all_checks(), doc.tree()) {
        let fix = problem.fix(doc.tree()).unwrap();
        history.execute(fix, &mut doc).unwrap();
    }
    assert_eq!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));
    assert_eq!(doc.tree().find_by_id(point2).unwrap().parent(), Some(root));

    // An unrelated edit deletes one of the moved objects; both undos
    // still complete, skipping the missing object.
    doc.tree_mut().remove_subtree(point2).unwrap();
    history.undo(&mut doc).unwrap();
    history.undo(&mut doc).unwrap();

    assert!(!doc.tree().contains(point2));
    assert_ne!(doc.tree().find_by_id(point).unwrap().parent(), Some(root));
}

#[test]
fn memberships_are_consistent_after_every_step() {
    use mapforge_editor::membership::TAG_BRUSH_ENTITY_CONTENTS;

    let (mut doc, _, group, point) = offending_document();

    // Seed tags for the objects the fix will touch.
    doc.update_memberships(&[group, point]);
    assert!(doc
        .tree()
        .find_by_id(point)
        .unwrap()
        .memberships()
        .contains(TAG_BRUSH_ENTITY_CONTENTS));

    let mut history = ActionHistory::<Document>::new(10);
    let problems = scan(&all_checks(), doc.tree());
    let fix = problems[0].fix(doc.tree()).unwrap();
    history.execute(fix, &mut doc).unwrap();

    // Outside the brush entity the contents tag is gone.
    assert!(!doc
        .tree()
        .find_by_id(point)
        .unwrap()
        .memberships()
        .contains(TAG_BRUSH_ENTITY_CONTENTS));

    history.undo(&mut doc).unwrap();
    assert!(doc
        .tree()
        .find_by_id(point)
        .unwrap()
        .memberships()
        .contains(TAG_BRUSH_ENTITY_CONTENTS));
}
