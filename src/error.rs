//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level indexing error enum
//! - Module-specific errors (e.g., [`EnrichmentError`]) for detailed handling
//!
//! Not every variant aborts a file. The indexer maps them as follows:
//!
//! | Variant                | Effect on the run                          |
//! |------------------------|--------------------------------------------|
//! | `InvalidFile`          | file skipped silently (not a track)        |
//! | `TagWriteFailed`       | file aborted, logged, run continues        |
//! | `PersistenceConflict`  | unit of work rolled back, run continues    |
//! | `MissingField`         | file aborted (fail-fast strategy)          |
//! | `Cancelled`            | run stops before the next file             |
//!
//! Remote lookup failures never surface here; the resolver downgrades them
//! to warnings.
//!
//! [`EnrichmentError`]: crate::enrichment::EnrichmentError

use std::path::PathBuf;

use crate::metadata::TagField;

/// Primary SQLite result code shared by all constraint failures.
const SQLITE_CONSTRAINT: i32 = 19;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level indexing error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error that is not a constraint violation
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Path is not a usable audio track
    #[error("Not a track {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    /// Writing a resolved field back into the file failed
    #[error("Failed to write tags to {path}: {message}")]
    TagWriteFailed { path: PathBuf, message: String },

    /// A commit violated a uniqueness or foreign-key constraint
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    /// A required tag is absent and the strategy refused to supply it
    #[error("Missing {field} tag in {path}")]
    MissingField { path: PathBuf, field: TagField },

    /// The interactive prompt could not be read
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The run was cancelled by the operator
    #[error("Indexing cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid-file error.
    pub fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a tag write error.
    pub fn tag_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TagWriteFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify a database error, turning constraint violations into
    /// [`Error::PersistenceConflict`].
    ///
    /// Besides the kinds sqlx recognises, any SQLite extended result code in
    /// the `SQLITE_CONSTRAINT` family counts, which covers trigger aborts.
    pub fn persistence(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && (db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation()
                || db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .is_some_and(|code| code & 0xff == SQLITE_CONSTRAINT))
        {
            return Self::PersistenceConflict(db_err.message().to_string());
        }
        Self::Database(err)
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error means the file was never a track to begin with.
    pub fn is_invalid_file(&self) -> bool {
        match self {
            Self::InvalidFile { .. } => true,
            Self::WithContext { source, .. } => source.is_invalid_file(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}
