//! Client-facing error envelope.
//!
//! # Responsibility
//! - Map service failures to a status class and a serializable body.
//!
//! # Invariants
//! - `status` and `error` always come from the same `ApiErrorKind`.
//! - Not-found maps to 404, validation to 400, anything else to 500.

use crate::model::note::now_epoch_ms;
use crate::service::note_service::NoteServiceError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error classes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

impl ApiErrorKind {
    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    pub fn reason_phrase(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Internal => "Internal Server Error",
        }
    }
}

/// Error envelope returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Unix epoch milliseconds at which the error was produced.
    pub timestamp: i64,
    pub status: u16,
    /// Reason phrase of `status`.
    pub error: String,
    pub message: String,
    /// Request path that failed.
    pub path: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: now_epoch_ms(),
            status: kind.status(),
            error: kind.reason_phrase().to_string(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::BadRequest, message, path)
    }

    pub fn not_found(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message, path)
    }

    /// Maps a service failure to its client-facing envelope.
    pub fn from_service(err: &NoteServiceError, path: impl Into<String>) -> Self {
        let kind = match err {
            NoteServiceError::NoteNotFound(_) => ApiErrorKind::NotFound,
            NoteServiceError::Repo(_) | NoteServiceError::InconsistentState(_) => {
                ApiErrorKind::Internal
            }
        };
        Self::new(kind, err.to_string(), path)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} at {}: {}",
            self.status, self.error, self.path, self.message
        )
    }
}

impl Error for ApiError {}
