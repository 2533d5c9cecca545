//! Editable targets and reversible editor actions.
//!
//! This module defines the core abstractions of the editing system:
//!
//! - [`Editable`] — marker trait for types that can be edited
//! - [`Action`] — a reversible edit operation (Command pattern)
//! - [`ActionError`] / [`ActionResult`] — error handling for actions
//!
//! Actions are self-contained: each implementation internally stores
//! whatever data it needs to apply and reverse itself (target
//! identifiers, original parents, old values, and so on).

use std::fmt;

/// Marker trait for types that serve as editing targets.
///
/// Implement this on any type that actions operate on — a map document,
/// a scene graph, a material library, etc.
///
/// # Example
///
/// ```ignore
/// struct MyDocument { /* ... */ }
/// impl Editable for MyDocument {}
/// ```
pub trait Editable: 'static {}

/// Error type for action construction and execution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// An identity expected to resolve to a live object did not.
    TargetNotFound(String),
    /// The target is in an invalid state for this action.
    InvalidState(String),
    /// A construction precondition was violated — the action was built
    /// from objects lacking required state. Raised before any mutation.
    Precondition(String),
    /// A custom error with a description.
    Custom(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(msg) => write!(f, "target not found: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Precondition(msg) => write!(f, "precondition failed: {msg}"),
            Self::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result type for action operations.
pub type ActionResult<T = ()> = Result<T, ActionError>;

/// A reversible editor action (Command pattern).
///
/// Actions encapsulate a single logical edit. Construction is
/// observation-only: the constructor captures the pre-state needed for
/// reversal but mutates nothing. [`perform`](Self::perform) then applies
/// the edit and [`reverse`](Self::reverse) restores the exact
/// pre-construction state.
///
/// # Contract
///
/// - `perform` is never called twice without an intervening `reverse`;
///   the [`ActionHistory`](crate::ActionHistory) ledger enforces this.
/// - If an intermediate step inside `perform` or `reverse` fails, the
///   implementation must roll the target back to the pre-call state
///   using its captured pre-state before returning the error. The
///   target is never left half-mutated.
/// - [`dispose`](Self::dispose) runs when the action leaves history for
///   good; it must drop captured references so unreferenced data can be
///   reclaimed.
///
/// # Object Safety
///
/// The trait is dyn-compatible so that heterogeneous actions can live in
/// one undo/redo stack as `Box<dyn Action<T>>`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct Rename {
///     target: ObjectId,
///     old_name: String,
///     new_name: String,
/// }
///
/// impl Action<Document> for Rename {
///     fn perform(&mut self, doc: &mut Document) -> ActionResult {
///         doc.set_name(self.target, &self.new_name)
///     }
///
///     fn reverse(&mut self, doc: &mut Document) -> ActionResult {
///         doc.set_name(self.target, &self.old_name)
///     }
///
///     fn description(&self) -> &str {
///         "Rename object"
///     }
/// }
/// ```
pub trait Action<T: Editable>: fmt::Debug + Send {
    /// Applies the action to the target (forward / redo direction).
    ///
    /// Returns `Ok(())` on success, or an [`ActionError`] if the action
    /// could not be applied. On error the target is unchanged.
    fn perform(&mut self, target: &mut T) -> ActionResult;

    /// Reverses the action (undo direction).
    ///
    /// Must restore the target to the state before
    /// [`perform`](Self::perform) was called.
    fn reverse(&mut self, target: &mut T) -> ActionResult;

    /// A short, human-readable description for display in the edit menu.
    ///
    /// Examples: `"Reparent objects"`, `"Delete selection"`.
    fn description(&self) -> &str;

    /// Releases captured references.
    ///
    /// Called exactly once by the history when the action is evicted and
    /// will never be performed or reversed again. The default does
    /// nothing.
    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    impl Editable for Counter {}

    #[derive(Debug)]
    struct Add {
        amount: i32,
        disposed: bool,
    }

    impl Add {
        fn new(amount: i32) -> Self {
            Self {
                amount,
                disposed: false,
            }
        }
    }

    impl Action<Counter> for Add {
        fn perform(&mut self, target: &mut Counter) -> ActionResult {
            target.value += self.amount;
            Ok(())
        }

        fn reverse(&mut self, target: &mut Counter) -> ActionResult {
            target.value -= self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Add"
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }
    }

    #[test]
    fn perform_modifies_target() {
        let mut counter = Counter { value: 0 };
        let mut action = Add::new(5);
        action.perform(&mut counter).unwrap();
        assert_eq!(counter.value, 5);
    }

    #[test]
    fn reverse_restores_pre_perform_state() {
        let mut counter = Counter { value: 7 };
        let mut action = Add::new(5);
        action.perform(&mut counter).unwrap();
        action.reverse(&mut counter).unwrap();
        assert_eq!(counter.value, 7);
    }

    #[test]
    fn dispose_releases_state() {
        let mut action = Add::new(1);
        assert!(!action.disposed);
        action.dispose();
        assert!(action.disposed);
    }

    #[test]
    fn action_error_display() {
        assert_eq!(
            ActionError::TargetNotFound("object 42".into()).to_string(),
            "target not found: object 42"
        );
        assert_eq!(
            ActionError::InvalidState("locked".into()).to_string(),
            "invalid state: locked"
        );
        assert_eq!(
            ActionError::Precondition("object has no parent".into()).to_string(),
            "precondition failed: object has no parent"
        );
        assert_eq!(
            ActionError::Custom("something went wrong".into()).to_string(),
            "something went wrong"
        );
    }

    #[test]
    fn action_is_dyn_compatible() {
        let mut counter = Counter { value: 0 };
        let mut boxed: Box<dyn Action<Counter>> = Box::new(Add::new(3));
        boxed.perform(&mut counter).unwrap();
        assert_eq!(counter.value, 3);
        boxed.reverse(&mut counter).unwrap();
        assert_eq!(counter.value, 0);
        assert_eq!(boxed.description(), "Add");
    }
}
