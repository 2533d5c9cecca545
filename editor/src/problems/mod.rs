//! Structural invariant checks and their fixes.
//!
//! A [`ProblemCheck`] is a pure, read-only scan of the map tree that
//! yields [`Problem`] records — detected invariant violations are data,
//! never errors. Each problem carries a fix factory that *constructs* a
//! remediation [`Action`] without performing it, so a caller can review,
//! filter, or batch fixes and push the chosen ones through the normal
//! action path.
//!
//! Checks traverse depth-first in current child order, so repeated scans
//! of an unmodified tree yield identical problem sequences. Scans may
//! run off the editing thread (for example against a cloned snapshot);
//! fix factories therefore re-resolve every id against the tree passed
//! at *call* time rather than trusting the scan.

mod solid_entity_children;

use std::fmt;
use std::sync::Arc;

use mapforge_core::{Action, ActionResult};

use crate::document::Document;
use crate::map::{MapTree, ObjectId};

pub use solid_entity_children::SolidEntityWithEntityChildren;

/// Builds a remediation action for a problem against a current tree.
///
/// Pure: calling the factory mutates nothing. The returned action flows
/// through the same perform path as any user edit.
pub type FixFactory =
    Arc<dyn Fn(&Problem, &MapTree) -> ActionResult<Box<dyn Action<Document>>> + Send + Sync>;

/// A detected violation of a structural invariant.
///
/// Problems are ephemeral — recomputed on demand, never persisted — and
/// independent: a caller may fix any subset in any order, because each
/// fix re-resolves identities when it is built.
#[derive(Clone)]
pub struct Problem {
    kind: &'static str,
    objects: Vec<ObjectId>,
    title: &'static str,
    description: &'static str,
    fix: FixFactory,
}

impl Problem {
    /// Creates a problem record.
    pub fn new(
        kind: &'static str,
        objects: Vec<ObjectId>,
        title: &'static str,
        description: &'static str,
        fix: FixFactory,
    ) -> Self {
        Self {
            kind,
            objects,
            title,
            description,
            fix,
        }
    }

    /// The kind tag of the check that produced this problem.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The offending objects, in the order the check found them.
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// A short human-readable title.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// A longer human-readable description, including what fixing does.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Builds (but does not perform) the remediation action against the
    /// given tree.
    ///
    /// Fails with a resolution error if the offending objects no longer
    /// exist in `tree` — the tree may have been edited since the scan.
    pub fn fix(&self, tree: &MapTree) -> ActionResult<Box<dyn Action<Document>>> {
        (self.fix)(self, tree)
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("kind", &self.kind)
            .field("objects", &self.objects)
            .field("title", &self.title)
            .finish()
    }
}

/// A pure, read-only scanner producing [`Problem`]s from a tree.
///
/// Checks must not mutate the tree, must be safe to invoke repeatedly,
/// and must traverse deterministically so that scanning an unmodified
/// tree twice yields structurally identical sequences.
pub trait ProblemCheck: Send + Sync {
    /// The kind tag stamped onto produced problems.
    fn kind(&self) -> &'static str;

    /// Lazily scans `tree` for violations.
    fn check<'a>(&self, tree: &'a MapTree) -> Box<dyn Iterator<Item = Problem> + 'a>;
}

/// Returns every built-in check.
pub fn all_checks() -> Vec<Box<dyn ProblemCheck>> {
    vec![Box::new(SolidEntityWithEntityChildren)]
}

/// Runs every given check against the tree, concatenating results in
/// check order.
pub fn scan(checks: &[Box<dyn ProblemCheck>], tree: &MapTree) -> Vec<Problem> {
    checks.iter().flat_map(|c| c.check(tree)).collect()
}
