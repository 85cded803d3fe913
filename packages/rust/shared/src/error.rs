//! Error types for biosearch.
//!
//! Library crates use [`BiosearchError`] via `thiserror`.
//! App crates (cli/indexer) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all biosearch operations.
#[derive(Debug, thiserror::Error)]
pub enum BiosearchError {
    /// No catalog entry exists for the requested title.
    #[error("dataset item not found: {title}")]
    NotFound { title: String },

    /// Transport failure while retrieving a document link.
    #[error("error fetching link: {0}")]
    Fetch(String),

    /// The fetched page lacks the expected content region.
    #[error("extraction error: {message}")]
    Extraction { message: String },

    /// The summarizer credential is not configured.
    #[error("{var} not set")]
    MissingCredential { var: String },

    /// Transport failure talking to the generative text service.
    #[error("summarizer error: {0}")]
    Summarizer(String),

    /// The model output could not be parsed as the expected JSON object.
    #[error("invalid JSON response from summarizer: {raw}")]
    InvalidResponseFormat { raw: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed seed file, bad link, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BiosearchError>;

impl BiosearchError {
    /// Create a not-found error for a title.
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::NotFound {
            title: title.into(),
        }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    /// Create a missing-credential error naming the env var.
    pub fn missing_credential(var: impl Into<String>) -> Self {
        Self::MissingCredential { var: var.into() }
    }

    /// Create an invalid-response error carrying the raw model text.
    pub fn invalid_response(raw: impl Into<String>) -> Self {
        Self::InvalidResponseFormat { raw: raw.into() }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable snake_case label for logs and HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Fetch(_) => "fetch_error",
            Self::Extraction { .. } => "extraction_error",
            Self::MissingCredential { .. } => "missing_credential",
            Self::Summarizer(_) => "summarizer_error",
            Self::InvalidResponseFormat { .. } => "invalid_response_format",
            Self::Config { .. } => "config_error",
            Self::Storage(_) => "storage_error",
            Self::Io { .. } => "io_error",
            Self::Validation { .. } => "validation_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BiosearchError::missing_credential("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "GEMINI_API_KEY not set");

        let err = BiosearchError::extraction("content container not found");
        assert!(err.to_string().contains("content container not found"));

        let err = BiosearchError::invalid_response("not json");
        assert!(err.to_string().ends_with("not json"));
    }

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            BiosearchError::not_found("x"),
            BiosearchError::Fetch("x".into()),
            BiosearchError::extraction("x"),
            BiosearchError::missing_credential("x"),
            BiosearchError::Summarizer("x".into()),
            BiosearchError::invalid_response("x"),
        ];
        let mut kinds: Vec<&str> = errors.iter().map(BiosearchError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
