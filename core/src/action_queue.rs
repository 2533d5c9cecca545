//! Thread-safe action queue for submitting editor actions from read-only
//! contexts.
//!
//! [`ActionQueue`] uses interior mutability ([`Mutex`]) so that code with
//! only shared `&self` access — a consistency scan running off the
//! editing thread, an inspector panel — can still hand actions to the
//! editor. The editing thread drains the queue and executes the actions
//! through [`ActionHistory`](crate::ActionHistory), preserving the
//! single-threaded application contract.

use std::fmt;
use std::sync::Mutex;

use crate::action::{Action, Editable};

/// A thread-safe queue for submitting [`Action`]s from read-only contexts.
///
/// Because the inner storage is wrapped in a [`Mutex`],
/// [`push()`](Self::push) only requires `&self`. Queued actions are
/// executed in submission order when the editing thread calls
/// [`drain()`](Self::drain).
///
/// # Example
///
/// ```ignore
/// // On a scan thread:
/// let fix = problem.fix(&snapshot)?;
/// queue.push(fix);
///
/// // On the editing thread:
/// for action in queue.drain() {
///     history.execute(action, &mut document)?;
/// }
/// ```
pub struct ActionQueue<T: Editable> {
    queue: Mutex<Vec<Box<dyn Action<T>>>>,
}

impl<T: Editable> ActionQueue<T> {
    /// Creates a new empty action queue.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Enqueues an action. Callable from `&self` thanks to interior
    /// mutability.
    pub fn push(&self, action: Box<dyn Action<T>>) {
        self.queue.lock().unwrap().push(action);
    }

    /// Drains all queued actions, returning them in submission order.
    pub fn drain(&self) -> Vec<Box<dyn Action<T>>> {
        std::mem::take(&mut *self.queue.lock().unwrap())
    }

    /// Returns the number of queued actions.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Returns `true` if there are no queued actions.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl<T: Editable> Default for ActionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Editable> fmt::Debug for ActionQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.queue.lock().unwrap().len();
        f.debug_struct("ActionQueue")
            .field("pending", &len)
            .finish()
    }
}
