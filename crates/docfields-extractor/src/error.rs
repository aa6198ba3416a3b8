//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
///
/// Every variant aborts the batch. Malformed model replies are not errors:
/// they degrade to an empty result instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Filesystem error
    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        /// Path being read, written or listed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// An input file is not a valid document record
    #[error("Invalid record {}: {}", .path.display(), .source)]
    InvalidRecord {
        /// Offending input file
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialize(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractorError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Serialize(e.to_string())
    }
}
