//! Reversible map actions.
//!
//! Every edit of the map flows through an
//! [`Action<Document>`](mapforge_core::Action): the UI (or a problem
//! fix) constructs an action, the shell's
//! [`ActionHistory`](mapforge_core::ActionHistory) performs and records
//! it, and undo reverses it. Actions capture their pre-state at
//! construction time and publish change notifications only after all
//! mutation for a call has completed.

mod reparent;

pub use reparent::Reparent;
