//! Read projections returned by the note service.
//!
//! Serialized field names follow the external camelCase schema
//! (`createdDate`, `totalElements`, `wordStats`).

use crate::model::note::{Note, NoteId, NoteTag};
use crate::repo::note_repo::RepoError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Full note fields, used in single-note responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDetails {
    pub id: NoteId,
    pub title: String,
    #[serde(rename = "createdDate")]
    pub created_at: i64,
    pub text: String,
    pub tags: BTreeSet<NoteTag>,
}

impl TryFrom<Note> for NoteDetails {
    type Error = RepoError;

    /// Fails with `RepoError::MissingId` for a note that was never persisted.
    fn try_from(note: Note) -> Result<Self, Self::Error> {
        let id = note.id.ok_or(RepoError::MissingId)?;
        Ok(Self {
            id,
            title: note.title,
            created_at: note.created_at,
            text: note.text,
            tags: note.tags,
        })
    }
}

/// Title and creation time only, used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    pub title: String,
    #[serde(rename = "createdDate")]
    pub created_at: i64,
}

impl From<Note> for NoteSummary {
    fn from(note: Note) -> Self {
        Self {
            title: note.title,
            created_at: note.created_at,
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage<T> {
    pub content: Vec<T>,
    /// Count of all records matching the filter, across every page.
    pub total_elements: u64,
    /// Zero-based page index that was requested.
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
}

impl<T> NotePage<T> {
    pub fn new(content: Vec<T>, total_elements: u64, page: u32, size: u32) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size))
        };
        Self {
            content,
            total_elements,
            page,
            size,
            total_pages,
        }
    }
}

/// One entry of a word-frequency result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Word frequencies sorted by count descending, then word ascending.
///
/// Serializes as `{"wordStats": {"word": count, ...}}` keeping entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordStats {
    pub entries: Vec<WordCount>,
}

impl WordStats {
    /// Returns `(word, count)` pairs in contract order.
    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.entries
            .iter()
            .map(|entry| (entry.word.as_str(), entry.count))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct OrderedCounts<'a>(&'a [WordCount]);

impl Serialize for OrderedCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(entry.word.as_str(), &entry.count)?;
        }
        map.end()
    }
}

impl Serialize for WordStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("wordStats", &OrderedCounts(&self.entries))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::NotePage;

    #[test]
    fn total_pages_rounds_up() {
        let page: NotePage<()> = NotePage::new(Vec::new(), 41, 0, 20);
        assert_eq!(page.total_pages, 3);

        let exact: NotePage<()> = NotePage::new(Vec::new(), 40, 1, 20);
        assert_eq!(exact.total_pages, 2);

        let empty: NotePage<()> = NotePage::new(Vec::new(), 0, 5, 20);
        assert_eq!(empty.total_pages, 0);
    }
}
