//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid label table
    #[error("Label error: {0}")]
    Labels(#[from] docfields_domain::LabelError),

    /// Provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] docfields_llm::LlmError),

    /// Batch failure
    #[error(transparent)]
    Extractor(#[from] docfields_extractor::ExtractorError),
}
