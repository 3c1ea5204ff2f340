//! Unified error types for Lexis.
//!
//! Failures that a caller can recover from (missing file, unknown word) are
//! ordinary return values elsewhere in the crate. The variants here cover the
//! conditions that must be surfaced: persistence I/O, encoding, invalid
//! input and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Lexis operations.
#[derive(Error, Debug)]
pub enum LexisError {
    /// I/O errors from reading or writing the vocabulary file.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML encoding/decoding errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// A record failed validation (e.g. a word that is empty once normalized).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The requested word is not in the store.
    #[error("word not found: {word}")]
    ItemNotFound { word: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for Lexis operations.
pub type Result<T> = std::result::Result<T, LexisError>;

impl LexisError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn item_not_found(word: impl Into<String>) -> Self {
        Self::ItemNotFound { word: word.into() }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<io::Error> for LexisError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for LexisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Degrade an error to a logged warning and a fallback value.
pub trait FailOpen<T> {
    /// Log the error and return the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the Lexis CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command failed (e.g. the vocabulary file could not be saved).
    pub const ERROR: i32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = LexisError::storage(
            "/tmp/vocabulary.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/vocabulary.json"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = LexisError::validation("word is empty");
        assert_eq!(err.to_string(), "validation error: word is empty");
    }

    #[test]
    fn test_item_not_found_display() {
        let err = LexisError::item_not_found("serendipity");
        assert_eq!(err.to_string(), "word not found: serendipity");
    }

    #[test]
    fn test_config_error_display() {
        let err = LexisError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err: LexisError = io_err.into();
        assert!(matches!(err, LexisError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let err: LexisError = json_err.into();
        assert!(matches!(err, LexisError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(LexisError::config("broken"));
        assert!(result.fail_open_default("loading").is_empty());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 1);
    }
}
