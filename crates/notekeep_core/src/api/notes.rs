//! Note request handlers.
//!
//! # Responsibility
//! - Validate raw requests, call `NoteService`, attach the request path to
//!   failures.
//!
//! # Invariants
//! - Validation runs before any id is parsed or any store call is made.
//! - A malformed id is answered exactly like an unknown one.
//! - Only 5xx failures are logged here.

use super::error::{ApiError, ApiResult};
use super::request::{ListParams, NoteRequest};
use crate::model::note::NoteId;
use crate::model::view::{NoteDetails, NotePage, NoteSummary, WordStats};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteSaveRequest, NoteService, NoteServiceError};
use log::error;
use uuid::Uuid;

/// Collection path for note requests.
pub const NOTES_PATH: &str = "/api/notes";

/// Path of one note resource.
pub fn note_path(id: &str) -> String {
    format!("{NOTES_PATH}/{id}")
}

/// Path of the statistics resource of one note.
pub fn note_stats_path(id: &str) -> String {
    format!("{NOTES_PATH}/{id}/stats")
}

/// Boundary facade: validates input, calls the service, maps errors.
pub struct NotesApi<R: NoteRepository> {
    service: NoteService<R>,
}

impl<R: NoteRepository> NotesApi<R> {
    pub fn new(service: NoteService<R>) -> Self {
        Self { service }
    }

    /// Creates a note, or updates it when the request carries an id.
    pub fn save(&mut self, request: NoteRequest) -> ApiResult<NoteDetails> {
        let validated = request
            .validate()
            .map_err(|err| ApiError::bad_request(err.to_string(), NOTES_PATH))?;
        let id = validated
            .id
            .as_deref()
            .map(|raw| parse_note_id(raw, NOTES_PATH))
            .transpose()?;

        let request = NoteSaveRequest {
            id,
            title: validated.title,
            text: validated.text,
            tags: validated.tags,
        };
        self.service
            .create_or_update(request)
            .map_err(|err| service_failure(&err, NOTES_PATH))
    }

    /// Lists note summaries; defaults to the first page of 20.
    pub fn list(&self, params: &ListParams) -> ApiResult<NotePage<NoteSummary>> {
        let (tags, page, size) = params
            .validate()
            .map_err(|err| ApiError::bad_request(err.to_string(), NOTES_PATH))?;
        self.service
            .list(tags, page, size)
            .map_err(|err| service_failure(&err, NOTES_PATH))
    }

    pub fn get(&self, id: &str) -> ApiResult<NoteDetails> {
        let path = note_path(id);
        let id = parse_note_id(id, &path)?;
        self.service
            .get_by_id(id)
            .map_err(|err| service_failure(&err, &path))
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let path = note_path(id);
        let id = parse_note_id(id, &path)?;
        self.service
            .delete(id)
            .map_err(|err| service_failure(&err, &path))
    }

    pub fn stats(&self, id: &str) -> ApiResult<WordStats> {
        let path = note_stats_path(id);
        let id = parse_note_id(id, &path)?;
        self.service
            .get_stats(id)
            .map_err(|err| service_failure(&err, &path))
    }
}

/// Parses a client-supplied id. A malformed id cannot name any stored note,
/// so it is reported as not found.
fn parse_note_id(raw: &str, path: &str) -> ApiResult<NoteId> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::not_found(format!("Note with id {raw} not found"), path))
}

fn service_failure(err: &NoteServiceError, path: &str) -> ApiError {
    let api_error = ApiError::from_service(err, path);
    if !api_error.is_client_error() {
        error!(
            "event=api_request module=api status=error http_status={} path={} error={}",
            api_error.status, path, err
        );
    }
    api_error
}
