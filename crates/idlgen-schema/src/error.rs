//! Error types for loading schemas

use thiserror::Error;

/// Result type alias for schema loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a program from the front-end
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error while reading the schema file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The schema document is not valid JSON or does not match the model
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
