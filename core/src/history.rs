//! Undo/redo action history.
//!
//! [`ActionHistory`] manages a linear undo/redo ledger of [`Action`]
//! trait objects. Undo replays in LIFO order and redo in the mirrored
//! order; executing a new action after undoing discards the redo branch
//! (standard editor behavior). Actions that leave the ledger for good
//! are [disposed](Action::dispose) so captured state is released.

use std::collections::VecDeque;
use std::fmt;

use crate::action::{Action, ActionError, ActionResult, Editable};

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Manages an undo/redo ledger of editor actions.
///
/// The undo stack is a bounded [`VecDeque`] — when it exceeds `max_undo`,
/// the oldest action is disposed and dropped from the front. The redo
/// stack is an unbounded [`Vec`] (it can never grow larger than the undo
/// stack was).
///
/// All application goes through this ledger: no two actions are ever
/// performed or reversed concurrently against the same target, and an
/// action is never performed twice without an intervening reversal.
///
/// # Example
///
/// ```ignore
/// let mut history = ActionHistory::new(50);
/// let mut doc = Document::new();
///
/// // Execute and record an action
/// history.execute(Box::new(my_action), &mut doc)?;
///
/// // Undo the last action, then redo it
/// history.undo(&mut doc)?;
/// history.redo(&mut doc)?;
/// ```
pub struct ActionHistory<T: Editable> {
    undo_stack: VecDeque<Box<dyn Action<T>>>,
    redo_stack: Vec<Box<dyn Action<T>>>,
    max_undo: usize,
    /// Tracks distance from the saved state.
    ///
    /// - `Some(0)` — the current state matches the last save.
    /// - `Some(n)` where `n > 0` — `n` undos needed to reach the saved state.
    /// - `Some(n)` where `n < 0` — `|n|` redos needed to reach the saved state.
    /// - `None` — never saved, or the save point is permanently unreachable
    ///   (dropped by capacity overflow, or the redo branch was discarded).
    save_distance: Option<i64>,
}

impl<T: Editable> ActionHistory<T> {
    /// Creates a new empty action history with the given maximum undo depth.
    ///
    /// When the undo stack exceeds `max_undo`, the oldest action is
    /// disposed and dropped.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo,
            save_distance: Some(0),
        }
    }

    /// Performs an action against the target and records it on the undo
    /// stack.
    ///
    /// Recording a new action discards the redo branch: every action on
    /// the redo stack is disposed and dropped. If the action fails, it is
    /// not recorded and the stacks are unchanged.
    pub fn execute(&mut self, mut action: Box<dyn Action<T>>, target: &mut T) -> ActionResult {
        action.perform(target)?;

        // Discarding the redo branch invalidates a save point inside it.
        if !self.redo_stack.is_empty() {
            for mut discarded in self.redo_stack.drain(..) {
                discarded.dispose();
            }
            if matches!(self.save_distance, Some(d) if d < 0) {
                self.save_distance = None;
            }
        }

        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }

        log::debug!("executed action: {}", action.description());
        self.undo_stack.push_back(action);
        self.evict_overflow();
        Ok(())
    }

    /// Reverses the most recent action (LIFO order).
    ///
    /// Returns an error if the undo stack is empty or the reversal failed.
    /// A failed reversal stays on the undo stack so the caller can retry
    /// or inspect it.
    pub fn undo(&mut self, target: &mut T) -> ActionResult {
        let mut action = self
            .undo_stack
            .pop_back()
            .ok_or_else(|| ActionError::Custom("nothing to undo".into()))?;
        if let Err(e) = action.reverse(target) {
            self.undo_stack.push_back(action);
            return Err(e);
        }
        log::debug!("undid action: {}", action.description());
        self.redo_stack.push(action);
        if let Some(d) = &mut self.save_distance {
            *d -= 1;
        }
        Ok(())
    }

    /// Re-performs the most recently undone action.
    ///
    /// Returns an error if the redo stack is empty or the application
    /// failed. A failed redo stays on the redo stack.
    pub fn redo(&mut self, target: &mut T) -> ActionResult {
        let mut action = self
            .redo_stack
            .pop()
            .ok_or_else(|| ActionError::Custom("nothing to redo".into()))?;
        if let Err(e) = action.perform(target) {
            self.redo_stack.push(action);
            return Err(e);
        }
        log::debug!("redid action: {}", action.description());
        self.undo_stack.push_back(action);
        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        self.evict_overflow();
        Ok(())
    }

    /// Disposes and drops the oldest undo entry if capacity is exceeded.
    fn evict_overflow(&mut self) {
        if self.undo_stack.len() > self.max_undo {
            if let Some(mut evicted) = self.undo_stack.pop_front() {
                evicted.dispose();
            }
            // If the save point was beyond the oldest surviving entry, it's gone.
            if matches!(self.save_distance, Some(d) if d > self.undo_stack.len() as i64) {
                self.save_distance = None;
            }
        }
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns an iterator over undo action descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns an iterator over redo action descriptions, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns the number of actions in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of actions in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the maximum undo depth.
    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    ///
    /// After calling this, [`has_unsaved_changes`](Self::has_unsaved_changes)
    /// returns `false` until the history is modified by execute, undo, or
    /// redo.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the current state differs from the last saved state.
    ///
    /// A fresh history counts as saved. Returns `true` once the history
    /// has been modified since construction or the last
    /// [`mark_saved`](Self::mark_saved), or if the save point is
    /// permanently unreachable.
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Disposes every recorded action and clears both stacks.
    ///
    /// If the current state was the saved state it remains so after
    /// clearing; otherwise the save point is permanently lost.
    pub fn clear(&mut self) {
        for mut action in self.undo_stack.drain(..) {
            action.dispose();
        }
        for mut action in self.redo_stack.drain(..) {
            action.dispose();
        }
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }
}

impl<T: Editable> fmt::Debug for ActionHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_undo", &self.max_undo)
            .field("save_distance", &self.save_distance)
            .finish()
    }
}
