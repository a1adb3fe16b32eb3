use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YearsortError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move files: {0} files failed")]
    MoveFailed(usize),

    // Filesystem errors
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Metadata errors
    #[error("Exiftool error: {0}")]
    Exiftool(String),

    #[error("Failed to extract metadata from {path}: {reason}")]
    MetadataExtraction { path: PathBuf, reason: String },

    // Output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for yearsort operations.
pub type Result<T> = std::result::Result<T, YearsortError>;
