//! Error types for program generation.

use thiserror::Error;

/// Errors that can occur around a generation run.
///
/// The engine itself never fails; these cover dialect selection and
/// loading configuration or input documents.
#[derive(Error, Debug)]
pub enum PostError {
    /// No backend is registered under this name.
    #[error("unknown dialect '{0}' (expected one of: gcode, rapid, krl, fanuc)")]
    UnknownDialect(String),

    /// A TOML configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be written as TOML.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A JSON configuration or result could not be (de)serialized.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for post-processor operations.
pub type Result<T> = std::result::Result<T, PostError>;
