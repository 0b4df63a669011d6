//! Error types for cdrstat
//!
//! All errors derive from `thiserror` for convenient handling and automatic
//! `From` implementations. Note that parse failures of individual usage
//! strings are NOT errors: the parsers in [`crate::parse`] degrade to zero,
//! and the analyzer drops records with unparseable timestamps. Errors here
//! cover the surrounding machinery: IO, export discovery, configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cdrstat operations
#[derive(Error, Debug)]
pub enum CdrstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// No CDR export directories found
    #[error("No CDR export directories found")]
    NoExportDirectory,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone string
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// CDR source error
    #[error("CDR source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in cdrstat
pub type Result<T> = std::result::Result<T, CdrstatError>;
