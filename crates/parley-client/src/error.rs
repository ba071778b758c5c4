use thiserror::Error;

use parley_store::StoreError;

/// Errors surfaced by session actions.
///
/// Validation, not-found, and authorization errors abort the action before
/// any remote call; transport errors wrap a failed gateway call; consistency
/// errors mark a detected divergence between local view-state and the store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Empty required field, taken username, invalid credentials.
    #[error("{0}")]
    Validation(String),

    /// Unresolved username or user id.
    #[error("{0}")]
    NotFound(String),

    /// Action reserved for the room admin.
    #[error("{0}")]
    Authorization(String),

    /// Store or network failure during a gateway call.
    #[error("Store error: {0}")]
    Transport(#[from] StoreError),

    /// Reading or writing the device-local preferences file failed.
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to determine a platform config directory.
    #[error("Could not determine application config directory")]
    NoConfigDir,

    /// JSON encoding of the preferences file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Detected removal-from-room or room deletion.
    #[error("{0}")]
    Consistency(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
