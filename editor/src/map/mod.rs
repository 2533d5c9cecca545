//! The map object tree.
//!
//! A map is a single-rooted, acyclic hierarchy of editable objects:
//! solid geometry, point and brush entities, and grouping containers.
//! The tree is stored as an arena keyed by stable [`ObjectId`]s, with
//! parent/child relationships expressed as ids rather than references,
//! so structural invariants stay mechanically checkable and every
//! mutation is atomic from the caller's point of view.
//!
//! - [`MapObject`] — one node: kind, parent back-reference, owned children
//! - [`MapTree`] — the arena: id lookup, predicate search, reparenting
//! - [`ObjectKind`] / [`EntityClass`] — type tags and entity classification
//! - [`ClassificationProvider`] — read-only entity class lookup

mod object;
mod tree;

pub use object::{ClassificationProvider, EntityClass, MapObject, ObjectId, ObjectKind};
pub use tree::{Find, MapTree, TreeError};
