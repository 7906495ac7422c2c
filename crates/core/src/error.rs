//! Error types for the PromptCraft CLI.
//!
//! One unified enum covers every error category the pipeline can surface:
//! missing inputs, version-control failures, template/session lookups,
//! storage, and the upstream LLM call.

use thiserror::Error;

/// Unified error type for the PromptCraft CLI.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Extraction-level problems never become errors — the extraction engine
/// degrades to a best-effort summary instead. Everything else surfaces here.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file or other named input does not exist
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// Requested template is not in the registry
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Requested session is not in the store
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session persistence read/write failure
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Git binary missing or directory is not a repository
    #[error("Version control unavailable: {0}")]
    VcsUnavailable(String),

    /// A git subcommand exited non-zero
    #[error("Version control operation failed: {0}")]
    VcsOperationFailed(String),

    /// Prompt assembly / template rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// LLM provider errors (request failures, timeouts)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
