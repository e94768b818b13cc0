//! Raw request payloads and their validation.
//!
//! # Responsibility
//! - Turn untrusted input into typed values, collecting every field failure.
//!
//! # Invariants
//! - Failures render as `field: message`, joined by `; ` in field order.
//! - Listing defaults are page 0 and `DEFAULT_PAGE_SIZE`.

use crate::model::note::NoteTag;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page size applied when a listing request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const BLANK_MESSAGE: &str = "must not be blank";

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field failures of one request, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl Error for ValidationError {}

/// Raw create/update payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Create/update payload whose fields passed validation.
///
/// `id` stays raw: an id that does not parse can never name a stored note
/// and is reported as not found by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNoteRequest {
    pub id: Option<String>,
    pub title: String,
    pub text: String,
    pub tags: Option<BTreeSet<NoteTag>>,
}

impl NoteRequest {
    /// Checks required fields and tag membership.
    pub fn validate(self) -> Result<ValidatedNoteRequest, ValidationError> {
        let mut errors = ValidationError::default();

        let title = non_blank(self.title);
        if title.is_none() {
            errors.push("title", BLANK_MESSAGE);
        }
        let text = non_blank(self.text);
        if text.is_none() {
            errors.push("text", BLANK_MESSAGE);
        }
        let tags = self.tags.map(|raw| parse_tags(&raw, &mut errors));

        match (title, text) {
            (Some(title), Some(text)) => errors.into_result(ValidatedNoteRequest {
                id: self.id,
                title,
                text,
                tags,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ListParams {
    /// Applies defaults and returns `(tag filter, page, size)`.
    ///
    /// An empty tag list means no filtering.
    pub fn validate(&self) -> Result<(Option<BTreeSet<NoteTag>>, u32, u32), ValidationError> {
        let mut errors = ValidationError::default();

        let page = self.page.unwrap_or(0);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 {
            errors.push("size", "must be greater than 0");
        }
        let tags = if self.tags.is_empty() {
            None
        } else {
            Some(parse_tags(&self.tags, &mut errors))
        };

        errors.into_result((tags, page, size))
    }
}

/// Returns `Some` only for values containing a non-whitespace character.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_tags(raw: &[String], errors: &mut ValidationError) -> BTreeSet<NoteTag> {
    let mut tags = BTreeSet::new();
    for value in raw {
        match value.parse::<NoteTag>() {
            Ok(tag) => {
                tags.insert(tag);
            }
            Err(err) => errors.push("tags", err.to_string()),
        }
    }
    tags
}
