//! Note use-case service.
//!
//! # Responsibility
//! - Apply the create-or-update merge rule for notes.
//! - Guard get/delete/stats with an existence check.
//! - Project listings to summary views and compute word statistics.
//!
//! # Invariants
//! - Updates keep `id` and `created_at` of the stored note.
//! - A missing tag set in a save request becomes an empty set.
//! - Word statistics are ordered by count descending, then word ascending.
//! - Store failures propagate unchanged; nothing is retried here.

use crate::model::note::{now_epoch_ms, Note, NoteId, NoteTag};
use crate::model::view::{NoteDetails, NotePage, NoteSummary, WordCount, WordStats};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoError};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\s)+").expect("valid ws regex"));
static PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[[:punct:]]").expect("valid punctuation regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "Note with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Validated input for `NoteService::create_or_update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSaveRequest {
    /// `None` creates a new note; `Some` updates the existing one.
    pub id: Option<NoteId>,
    pub title: String,
    pub text: String,
    /// `None` is stored as an empty tag set.
    pub tags: Option<BTreeSet<NoteTag>>,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note when `request.id` is absent, otherwise overwrites title,
    /// text and tags of the stored note.
    ///
    /// # Errors
    /// - `NoteNotFound` when updating an id that is not stored.
    pub fn create_or_update(
        &mut self,
        request: NoteSaveRequest,
    ) -> Result<NoteDetails, NoteServiceError> {
        let tags = request.tags.unwrap_or_default();

        let Some(id) = request.id else {
            let note = Note::new(request.title, request.text, now_epoch_ms()).with_tags(tags);
            let saved = self.repo.insert(&note)?;
            info!(
                "event=note_create module=service status=ok note_id={} tag_count={}",
                saved.id.map(|id| id.to_string()).unwrap_or_default(),
                saved.tags.len()
            );
            return Ok(NoteDetails::try_from(saved)?);
        };

        let mut note = self.find_or_not_found(id)?;
        note.title = request.title;
        note.text = request.text;
        note.tags = tags;
        self.repo.replace(&note)?;
        info!(
            "event=note_update module=service status=ok note_id={id} tag_count={}",
            note.tags.len()
        );

        let saved = self
            .repo
            .find_by_id(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))?;
        Ok(NoteDetails::try_from(saved)?)
    }

    /// Deletes one note after confirming it exists.
    pub fn delete(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.find_or_not_found(id)?;
        self.repo.delete_by_id(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Gets the detail view of one note.
    pub fn get_by_id(&self, id: NoteId) -> Result<NoteDetails, NoteServiceError> {
        debug!("event=note_get module=service status=start note_id={id}");
        let note = self.find_or_not_found(id)?;
        Ok(NoteDetails::try_from(note)?)
    }

    /// Lists summary views newest first, filtered by any of `tags`.
    ///
    /// An absent or empty filter lists every note. Pages past the end are
    /// empty but still report the full match count.
    pub fn list(
        &self,
        tags: Option<BTreeSet<NoteTag>>,
        page: u32,
        size: u32,
    ) -> Result<NotePage<NoteSummary>, NoteServiceError> {
        let query = NoteListQuery {
            tags: tags.unwrap_or_default(),
            page,
            size,
        };
        let found = self.repo.find_filtered(&query)?;
        debug!(
            "event=note_list module=service status=ok tag_filter_count={} page={page} size={size} returned={} total={}",
            query.tags.len(),
            found.items.len(),
            found.total
        );

        let content = found.items.into_iter().map(NoteSummary::from).collect();
        Ok(NotePage::new(content, found.total, page, size))
    }

    /// Computes word frequencies for the text of one note.
    pub fn get_stats(&self, id: NoteId) -> Result<WordStats, NoteServiceError> {
        let note = self.find_or_not_found(id)?;
        let stats = compute_word_stats(&note.text);
        debug!(
            "event=note_stats module=service status=ok note_id={id} unique_words={}",
            stats.entries.len()
        );
        Ok(stats)
    }

    fn find_or_not_found(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo.find_by_id(id)?.ok_or_else(|| {
            warn!("event=note_lookup module=service status=not_found note_id={id}");
            NoteServiceError::NoteNotFound(id)
        })
    }
}

/// Counts words in `text`.
///
/// Rules:
/// - Tokens are separated by runs of ASCII whitespace (`[ \t\n\x0B\x0C\r]`);
///   other Unicode spaces stay inside a token.
/// - ASCII punctuation is removed from each token, then it is lower-cased.
/// - Tokens left empty are dropped.
/// - Result is sorted by count descending, ties by word ascending.
pub fn compute_word_stats(text: &str) -> WordStats {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for token in WHITESPACE_RE.split(text).filter(|token| !token.is_empty()) {
        let word = PUNCTUATION_RE.replace_all(token, "").to_lowercase();
        if word.is_empty() {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut entries: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));

    WordStats { entries }
}
