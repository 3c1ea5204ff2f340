//! Add command for Lexis.
//!
//! Adds a word to the vocabulary or updates the content of an existing one.

use serde::{Deserialize, Serialize};

use crate::cli::show::ItemInfo;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the add command.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Definition text.
    pub definition: String,
    /// Example sentence.
    pub example: String,
    /// Tags. When empty, an existing item keeps its tags.
    pub tags: Vec<String>,
}

/// Output format for the add command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOutput {
    /// Whether the item was stored and persisted.
    pub success: bool,
    /// Whether a new item was created (as opposed to updated).
    pub created: bool,
    /// The stored item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemInfo>,
    /// Error message if the add failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddOutput {
    /// Create a successful output.
    pub fn success(item: ItemInfo, created: bool) -> Self {
        Self {
            success: true,
            created,
            item: Some(item),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            created: false,
            item: None,
            error: Some(error.into()),
        }
    }
}

/// The add command implementation.
pub struct AddCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> AddCommand<'a, P> {
    /// Create a new add command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the add command.
    pub fn run(&self, word: &str, options: &AddOptions) -> AddOutput {
        let tags: Vec<&str> = options.tags.iter().map(String::as_str).collect();

        match self
            .store
            .add_or_update(word, &options.definition, &options.example, &tags)
        {
            Ok((item, created)) => {
                AddOutput::success(ItemInfo::from_item(&item, self.store.today()), created)
            }
            Err(e) => AddOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &AddOutput, options: &AddOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        match (&output.item, &output.error) {
            (Some(item), _) if output.created => format!("Added '{}'.", item.word),
            (Some(item), _) => format!("Updated '{}'.", item.word),
            (None, error) => format!(
                "Add failed: {}",
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
