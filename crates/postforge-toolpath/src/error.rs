//! Error types for the toolpath model.

use thiserror::Error;

/// Errors that can occur while loading a toolpath.
#[derive(Error, Debug)]
pub enum ToolpathError {
    /// The toolpath document could not be parsed (including unknown segment kinds).
    #[error("invalid toolpath document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The toolpath file could not be read.
    #[error("failed to read toolpath: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for toolpath operations.
pub type Result<T> = std::result::Result<T, ToolpathError>;
