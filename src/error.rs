//! Error types for the namespace consolidation tool.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for consolidation and rewrite operations.
#[derive(Error, Debug)]
pub enum NamespacifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No model directories found under {0}")]
    NoModelDirectories(PathBuf),

    #[error("Invalid directory name: {0}")]
    InvalidDirectoryName(PathBuf),
}

/// A specialized Result type for consolidation operations.
pub type Result<T> = std::result::Result<T, NamespacifyError>;
