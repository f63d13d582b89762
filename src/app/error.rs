use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A document id or path that no longer exists, e.g. a stale tab callback.
    #[error("Document not found")]
    NotFound,

    /// Session invariant violation. Unreachable while the coordinator owns
    /// the store, because an emptied session is refilled immediately.
    #[error("No active document")]
    NoActiveDocument,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Save the document before inserting images")]
    UnsavedDocument,
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
