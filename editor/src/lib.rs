//! # Mapforge Editor
//!
//! The editing core of the mapforge scene-graph tool: a hierarchical
//! tree of editable map objects, reversible actions that mutate it, and
//! a problem-detection framework that scans the tree for structural
//! invariant violations and synthesizes corrective actions through the
//! same action mechanism.
//!
//! - [`map`] — the owned object tree: id lookup, predicate search,
//!   atomic reparenting
//! - [`Document`] — the [`Editable`](mapforge_core::Editable) target:
//!   tree + notification bus + membership updater + selection
//! - [`actions`] — concrete reversible actions ([`actions::Reparent`])
//! - [`problems`] — pure checks producing [`problems::Problem`] records
//!   with fix factories
//! - [`notify`] / [`membership`] — change notifications and derived
//!   membership tags, both injected capabilities
//!
//! All mutation is serialized on one logical editing thread through an
//! [`ActionHistory`](mapforge_core::ActionHistory); problem scans are
//! read-only and may run elsewhere, handing their fixes back via an
//! [`ActionQueue`](mapforge_core::ActionQueue). No file I/O, rendering,
//! or UI dispatch happens here — those are external collaborators.

pub mod actions;
pub mod document;
pub mod map;
pub mod membership;
pub mod notify;
pub mod problems;

pub use document::Document;
