//! # Mapforge Core
//!
//! Foundational traits and types for the mapforge editor's reversible
//! editing system. This crate is decoupled from the concrete map document
//! so that higher-level crates can implement their own editable targets.
//!
//! - [`Editable`] — marker trait for types that can be edited
//! - [`Action`] — a reversible edit operation (Command pattern)
//! - [`ActionHistory`] — undo/redo ledger managing action sequences
//! - [`ActionQueue`] — thread-safe queue for submitting actions from
//!   read-only contexts
//!
//! # Action lifecycle
//!
//! An [`Action`] is constructed without touching its target: the
//! constructor captures whatever pre-state is needed to reverse the edit
//! later. [`Action::perform`] then applies the edit, at most once before
//! the next reversal; [`Action::reverse`] restores the exact
//! pre-construction state. When an action leaves the history for good
//! (capacity eviction, redo-branch discard, [`ActionHistory::clear`]),
//! [`Action::dispose`] runs so captured references are released and any
//! now-unreferenced data becomes reclaimable.
//!
//! All forward and reverse application is serialized through one
//! [`ActionHistory`] on a single logical editing thread. Read-only work
//! running elsewhere (consistency scans, inspectors) hands actions over
//! via an [`ActionQueue`].

mod action;
mod action_queue;
mod history;

pub use action::{Action, ActionError, ActionResult, Editable};
pub use action_queue::ActionQueue;
pub use history::{ActionHistory, DEFAULT_MAX_UNDO};
