use thiserror::Error;

use crate::app::services::format::FormatError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Live preview server error: {0}")]
    Server(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
