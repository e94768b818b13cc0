//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed insert/replace/lookup/delete for note records.
//! - Provide the tag-filtered, paginated scan used by listings.
//!
//! # Invariants
//! - Scans are ordered by `created_at DESC, uuid ASC`.
//! - Tag filters use match-any semantics; an empty filter matches all notes.
//! - The total count of a filtered scan ignores the page window.
//! - `replace` never rewrites `created_at`.
//! - Writes touching `notes` and `note_tags` run in one transaction.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteTag};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    text,
    created_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    /// A write that requires an assigned id received an unsaved note.
    MissingId,
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::MissingId => write!(f, "note has no id assigned"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and window for a note scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Match-any tag filter. Empty means no filtering.
    pub tags: BTreeSet<NoteTag>,
    /// Zero-based page index.
    pub page: u32,
    /// Page size. A size of zero yields an empty window.
    pub size: u32,
}

impl NoteListQuery {
    /// Number of rows skipped before the window starts.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// Result of a filtered scan: one window plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredNotes {
    /// Records in `created_at DESC` order.
    pub items: Vec<Note>,
    /// All records matching the filter, regardless of the window.
    pub total: u64,
}

/// Store contract consumed by the note service.
pub trait NoteRepository {
    /// Inserts a note and returns it with its assigned id.
    fn insert(&mut self, note: &Note) -> RepoResult<Note>;
    /// Overwrites title, text and tags of an existing note.
    fn replace(&mut self, note: &Note) -> RepoResult<()>;
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn delete_by_id(&self, id: NoteId) -> RepoResult<()>;
    /// Scans notes matching the tag filter, newest first.
    fn find_filtered(&self, query: &NoteListQuery) -> RepoResult<FilteredNotes>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert(&mut self, note: &Note) -> RepoResult<Note> {
        let id = note.id.unwrap_or_else(Uuid::new_v4);
        let id_text = id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (uuid, title, text, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.text.as_str(),
                note.created_at,
            ],
        )?;
        write_tags(&tx, id_text.as_str(), &note.tags)?;
        tx.commit()?;

        Ok(Note {
            id: Some(id),
            ..note.clone()
        })
    }

    fn replace(&mut self, note: &Note) -> RepoResult<()> {
        let id = note.id.ok_or(RepoError::MissingId)?;
        let id_text = id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                text = ?3
             WHERE uuid = ?1;",
            params![id_text.as_str(), note.title.as_str(), note.text.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM note_tags WHERE note_uuid = ?1;",
            [id_text.as_str()],
        )?;
        write_tags(&tx, id_text.as_str(), &note.tags)?;
        tx.commit()?;

        Ok(())
    }

    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn delete_by_id(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_filtered(&self, query: &NoteListQuery) -> RepoResult<FilteredNotes> {
        let mut filter_sql = String::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.tags.is_empty() {
            let placeholders = vec!["?"; query.tags.len()].join(", ");
            filter_sql.push_str(&format!(
                " WHERE EXISTS (
                    SELECT 1
                    FROM note_tags nt
                    WHERE nt.note_uuid = notes.uuid
                      AND nt.tag IN ({placeholders})
                )"
            ));
            bind_values.extend(
                query
                    .tags
                    .iter()
                    .map(|tag| Value::Text(tag.as_str().to_string())),
            );
        }

        // Best-effort: the count and the window are two independent reads.
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{filter_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;
        let total = u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))?;

        if query.size == 0 || query.offset() >= count {
            return Ok(FilteredNotes {
                items: Vec::new(),
                total,
            });
        }

        let sql = format!(
            "{NOTE_SELECT_SQL}{filter_sql}
             ORDER BY created_at DESC, uuid ASC
             LIMIT ? OFFSET ?;"
        );
        bind_values.push(Value::Integer(i64::from(query.size)));
        bind_values.push(Value::Integer(query.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_note_row(self.conn, row)?);
        }

        Ok(FilteredNotes { items, total })
    }
}

fn write_tags(tx: &Transaction<'_>, note_uuid: &str, tags: &BTreeSet<NoteTag>) -> RepoResult<()> {
    for tag in tags {
        tx.execute(
            "INSERT INTO note_tags (note_uuid, tag) VALUES (?1, ?2);",
            params![note_uuid, tag.as_str()],
        )?;
    }
    Ok(())
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    Ok(Note {
        id: Some(id),
        title: row.get("title")?,
        text: row.get("text")?,
        tags: load_tags_for_note(conn, &uuid_text)?,
        created_at: row.get("created_at")?,
    })
}

fn load_tags_for_note(conn: &Connection, note_uuid: &str) -> RepoResult<BTreeSet<NoteTag>> {
    let mut stmt = conn.prepare_cached("SELECT tag FROM note_tags WHERE note_uuid = ?1;")?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        let tag = value.parse::<NoteTag>().map_err(|err| {
            RepoError::InvalidData(format!("{err} in note_tags.tag for note `{note_uuid}`"))
        })?;
        tags.insert(tag);
    }
    Ok(tags)
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["uuid", "title", "text", "created_at"]),
        ("note_tags", &["note_uuid", "tag"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
