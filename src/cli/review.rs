//! Review command for Lexis.
//!
//! Records how well the learner recalled a word.

use serde::{Deserialize, Serialize};

use crate::cli::show::ItemInfo;
use crate::core::{normalize_word, Quality};
use crate::error::LexisError;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the review command.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the review command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutput {
    /// Whether the review was recorded and persisted.
    pub success: bool,
    /// The normalized word.
    pub word: String,
    /// Quality after clamping to 0..=5.
    pub quality: u8,
    /// Item state after the review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemInfo>,
    /// Error message if recording failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The review command implementation.
pub struct ReviewCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> ReviewCommand<'a, P> {
    /// Create a new review command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the review command.
    pub fn run(&self, word: &str, quality: i64, _options: &ReviewOptions) -> ReviewOutput {
        let quality = Quality::clamped(quality);
        let word = normalize_word(word);

        let (item, error) = match self.store.record_review(&word, quality) {
            Ok(Some(item)) => (Some(ItemInfo::from_item(&item, self.store.today())), None),
            Ok(None) => (None, Some(LexisError::item_not_found(&word).to_string())),
            Err(e) => (None, Some(e.to_string())),
        };

        ReviewOutput {
            success: error.is_none(),
            word,
            quality: quality.value(),
            item,
            error,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ReviewOutput, options: &ReviewOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        match &output.item {
            Some(item) => format!(
                "Recorded '{}' with quality {}. Next review {} (in {}d).",
                item.word, output.quality, item.next_review_date, item.interval
            ),
            None => format!(
                "Review failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
