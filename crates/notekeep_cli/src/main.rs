//! Command-line front end for notekeep.
//!
//! # Responsibility
//! - Parse arguments and environment into one boundary call.
//! - Print successful bodies as JSON on stdout and error envelopes on stderr.

use clap::{Parser, Subcommand};
use log::info;
use notekeep_core::db::{open_db, DbError};
use notekeep_core::{
    default_log_level, init_logging, ApiError, ListParams, NoteRequest, NoteService, NotesApi,
    RepoError, SqliteNoteRepository,
};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notekeep", version, about = "Keep short tagged text notes")]
struct Cli {
    /// SQLite database file; created when missing.
    #[arg(long, env = "NOTEKEEP_DB", default_value = "notekeep.sqlite3", global = true)]
    db: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long, env = "NOTEKEEP_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "NOTEKEEP_LOG_DIR", global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note, or update the note named by --id.
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        /// Repeatable: PERSONAL, BUSINESS or IMPORTANT.
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// List notes newest first.
    List {
        /// Zero-based page index.
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// Repeatable; a note matches when it has any of the given tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show one note.
    Get { id: String },
    /// Delete one note.
    Delete { id: String },
    /// Show word frequencies of one note.
    Stats { id: String },
}

impl Cli {
    /// Explicit `--log-level`, else the build default.
    fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Save { .. } => "save",
            Self::List { .. } => "list",
            Self::Get { .. } => "get",
            Self::Delete { .. } => "delete",
            Self::Stats { .. } => "stats",
        }
    }
}

#[derive(Debug)]
enum CliError {
    Db(DbError),
    Repo(RepoError),
    Api(ApiError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "cannot open notes database: {err}"),
            Self::Repo(err) => write!(f, "notes database is not usable: {err}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "cannot encode response: {err}"),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ApiError> for CliError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(cli.log_level(), log_dir) {
            eprintln!("notekeep: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(Some(body)) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(CliError::Api(err)) => {
            match serde_json::to_string_pretty(&err) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("notekeep: {err}"),
            }
            ExitCode::from(if err.is_client_error() { 2 } else { 1 })
        }
        Err(err) => {
            eprintln!("notekeep: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<String>, CliError> {
    info!(
        "event=cli_run module=cli status=start command={} db={}",
        cli.command.name(),
        cli.db.display()
    );

    let mut conn = open_db(&cli.db)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut api = NotesApi::new(NoteService::new(repo));

    let body = match cli.command {
        Command::Save {
            id,
            title,
            text,
            tags,
        } => Some(to_json(&api.save(NoteRequest {
            id,
            title,
            text,
            tags,
        })?)?),
        Command::List { page, size, tags } => {
            Some(to_json(&api.list(&ListParams { page, size, tags })?)?)
        }
        Command::Get { id } => Some(to_json(&api.get(&id)?)?),
        Command::Delete { id } => {
            api.delete(&id)?;
            None
        }
        Command::Stats { id } => Some(to_json(&api.stats(&id)?)?),
    };

    Ok(body)
}

fn to_json(value: &impl Serialize) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use notekeep_core::default_log_level;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn save_distinguishes_missing_tags_from_given_tags() {
        let cli = Cli::parse_from(["notekeep", "save", "--title", "t", "--text", "x"]);
        assert!(matches!(cli.command, Command::Save { tags: None, .. }));

        let cli = Cli::parse_from([
            "notekeep", "save", "--title", "t", "--text", "x", "--tag", "PERSONAL", "--tag",
            "IMPORTANT",
        ]);
        match cli.command {
            Command::Save {
                tags: Some(tags), ..
            } => assert_eq!(tags, vec!["PERSONAL", "IMPORTANT"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_accepts_global_db_after_subcommand() {
        let cli = Cli::parse_from(["notekeep", "list", "--page", "2", "--db", "/tmp/n.db"]);
        assert_eq!(cli.db.to_str(), Some("/tmp/n.db"));
        assert!(matches!(
            cli.command,
            Command::List {
                page: Some(2),
                size: None,
                ..
            }
        ));
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let cli = Cli::parse_from(["notekeep", "get", "some-id"]);
        assert_eq!(cli.log_level(), default_log_level());

        let cli = Cli::parse_from(["notekeep", "--log-level", "warn", "get", "some-id"]);
        assert_eq!(cli.log_level(), "warn");
        assert!(matches!(cli.command, Command::Get { .. }));
    }
}
