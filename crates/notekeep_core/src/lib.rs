//! Core domain logic for notekeep.
//! This crate is the single source of truth for note lifecycle rules.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{ApiError, ApiErrorKind, ApiResult, ListParams, NoteRequest, NotesApi};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteTag, UnknownTagError};
pub use model::view::{NoteDetails, NotePage, NoteSummary, WordCount, WordStats};
pub use repo::note_repo::{
    FilteredNotes, NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_service::{
    compute_word_stats, NoteSaveRequest, NoteService, NoteServiceError,
};
