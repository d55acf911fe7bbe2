use thiserror::Error;

/// Storage-layer errors. Kept separate from the gateway's error type so the
/// HTTP layer can map them to status codes without coupling layers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user with the given id exists.
    #[error("User not found: {user_id}")]
    NotFound { user_id: i64 },

    /// Underlying SQLite / rusqlite failure, not otherwise distinguished.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
