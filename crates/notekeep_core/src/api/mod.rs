//! Transport-agnostic boundary over the note service.
//!
//! # Responsibility
//! - Validate raw client input and apply request defaults.
//! - Translate service errors into status-coded `ApiError` envelopes.
//!
//! # Invariants
//! - NotFound maps to 404, validation to 400, everything else to 500.
//! - Validation messages list `field: message` entries joined by `"; "`.
//!
//! Routing and wire transport are left to the embedding process.

mod error;
mod notes;
mod request;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use notes::{note_path, note_stats_path, NotesApi, NOTES_PATH};
pub use request::{
    FieldError, ListParams, NoteRequest, ValidatedNoteRequest, ValidationError,
    DEFAULT_PAGE_SIZE,
};
