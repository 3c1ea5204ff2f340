//! Remove command for Lexis.

use serde::{Deserialize, Serialize};

use crate::core::normalize_word;
use crate::error::LexisError;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the remove command.
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the remove command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveOutput {
    /// Whether the word was removed and the change persisted.
    pub success: bool,
    /// The normalized word.
    pub word: String,
    /// Error message if the removal failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoveOutput {
    /// Create a successful output.
    pub fn success(word: impl Into<String>) -> Self {
        Self {
            success: true,
            word: word.into(),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(word: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            word: word.into(),
            error: Some(error.into()),
        }
    }
}

/// The remove command implementation.
pub struct RemoveCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> RemoveCommand<'a, P> {
    /// Create a new remove command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the remove command.
    pub fn run(&self, word: &str, _options: &RemoveOptions) -> RemoveOutput {
        let key = normalize_word(word);
        match self.store.remove(word) {
            Ok(true) => RemoveOutput::success(key),
            Ok(false) => {
                let error = LexisError::item_not_found(&key).to_string();
                RemoveOutput::failure(key, error)
            }
            Err(e) => RemoveOutput::failure(key, e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RemoveOutput, options: &RemoveOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if output.success {
            format!("Removed '{}'.", output.word)
        } else {
            format!(
                "Remove failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
