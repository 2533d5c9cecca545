//! Map objects and their type tags.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A stable object identifier.
///
/// Ids are allocated monotonically by [`MapTree`](super::MapTree) and are
/// never reused, even after the object is deleted. Two objects in the
/// same tree never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Builds an id from its raw value.
    ///
    /// Intended for tests and for external collaborators that persist
    /// ids; the tree itself allocates ids internally.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of an entity: does it represent solid (brush) geometry
/// or a point placement?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityClass {
    /// A brush entity — the entity owns solid geometry.
    Solid,
    /// A point entity — a single placement with no owned geometry.
    Point,
}

/// The type tag of a map object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// The single top-level container owning the entire tree.
    Root,
    /// A transparent grouping container.
    Group,
    /// Solid geometry (a brush).
    Solid,
    /// An entity, optionally classified by a
    /// [`ClassificationProvider`].
    Entity {
        /// Geometry-vs-point classification, `None` when the entity's
        /// class is unknown to the game data.
        class: Option<EntityClass>,
    },
}

impl ObjectKind {
    /// Returns `true` for grouping containers (not the root).
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Returns `true` for solid geometry.
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid)
    }

    /// Returns `true` for entities of any classification.
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity { .. })
    }

    /// Returns the entity classification, if this is a classified entity.
    pub fn classification(&self) -> Option<EntityClass> {
        match self {
            Self::Entity { class } => *class,
            _ => None,
        }
    }
}

/// Read-only lookup of an entity's geometry-vs-point classification.
///
/// Implemented by the game-data layer outside this core; this core only
/// consumes it when entities are created. No mutation capability is
/// exposed.
pub trait ClassificationProvider {
    /// Classifies an entity class name, or `None` if the class is
    /// unknown.
    fn classify(&self, class_name: &str) -> Option<EntityClass>;
}

/// One node in the map tree.
///
/// Owns its children (as ids into the arena) and carries a non-owning
/// back-reference to its parent, which is `None` only for the root.
/// Membership tags are derived by the
/// [`MembershipUpdater`](crate::membership::MembershipUpdater) after
/// every completed mutation; they are never assigned directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObject {
    pub(crate) id: ObjectId,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) kind: ObjectKind,
    pub(crate) memberships: BTreeSet<String>,
}

impl MapObject {
    pub(crate) fn new(id: ObjectId, parent: Option<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            kind,
            memberships: BTreeSet::new(),
        }
    }

    /// Returns this object's id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the parent id, `None` only for the root.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Returns the owned child ids, in current child order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Returns the type tag.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns the derived membership tags.
    pub fn memberships(&self) -> &BTreeSet<String> {
        &self.memberships
    }

    /// Returns `true` if this entity is classified as owning solid
    /// geometry.
    pub fn is_solid_entity(&self) -> bool {
        self.kind.classification() == Some(EntityClass::Solid)
    }
}
