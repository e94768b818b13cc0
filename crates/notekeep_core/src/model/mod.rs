//! Domain model for notes and their read projections.
//!
//! # Responsibility
//! - Define the canonical note record persisted by the store.
//! - Define detail/summary/page/stats views returned to callers.
//!
//! # Invariants
//! - Every persisted note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod view;
