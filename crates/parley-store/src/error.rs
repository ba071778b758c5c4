use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// JSON encoding/decoding of an array column failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The mutex guarding the shared database handle was poisoned.
    #[error("Store mutex poisoned")]
    Poisoned,

    /// No free six-digit account number was found.
    #[error("User id space exhausted")]
    IdSpaceExhausted,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
