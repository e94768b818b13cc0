//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its closed tag enumeration.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first insert, and never
//!   changes afterwards.
//! - `created_at` is fixed at creation and never rewritten by updates.
//! - `tags` is always a set (possibly empty), never absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a persisted note.
pub type NoteId = Uuid;

/// Fixed tag enumeration for notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteTag {
    Personal,
    Business,
    Important,
}

impl NoteTag {
    /// All variants in declaration order.
    pub const ALL: [NoteTag; 3] = [NoteTag::Personal, NoteTag::Business, NoteTag::Important];

    /// Canonical upper-case name, shared by storage and serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Business => "BUSINESS",
            Self::Important => "IMPORTANT",
        }
    }
}

impl Display for NoteTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag name is outside the fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagError(pub String);

impl Display for UnknownTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown tag '{}'", self.0)
    }
}

impl Error for UnknownTagError {}

impl FromStr for NoteTag {
    type Err = UnknownTagError;

    /// Parses a tag name, ignoring surrounding whitespace and ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTagError(trimmed.to_string()))
    }
}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Assigned by the store on first insert.
    pub id: Option<NoteId>,
    pub title: String,
    pub text: String,
    pub tags: BTreeSet<NoteTag>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Creates an unsaved note with an empty tag set.
    pub fn new(title: impl Into<String>, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            text: text.into(),
            tags: BTreeSet::new(),
            created_at,
        }
    }

    /// Builder-style tag assignment.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = NoteTag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
