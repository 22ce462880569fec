use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the translator library.
///
/// Every variant except a per-file XML parse failure (which the pipeline
/// recovers from) aborts the run.
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// Missing or invalid settings. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Malformed provider response, YAML or XML.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A translated entry is missing its key or value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider call failed for a reason other than authentication.
    /// `transient` marks network errors and 429/5xx statuses.
    #[error("Translation request failed: {message}")]
    Provider { message: String, transient: bool },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranslatorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            transient: false,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            transient: true,
        }
    }

    /// Transient failures are worth another attempt; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider { transient: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
