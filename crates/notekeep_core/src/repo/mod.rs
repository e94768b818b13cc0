//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note store contract consumed by the domain service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
