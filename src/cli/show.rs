//! Show command for Lexis.
//!
//! Displays a single vocabulary item with its review state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::VocabularyItem;
use crate::error::LexisError;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the show command.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Item view shared by the commands that print items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub word: String,
    pub definition: String,
    pub example: String,
    pub tags: Vec<String>,
    /// Day the item was added (`YYYY-MM-DD`).
    pub date_added: String,
    pub easiness_factor: f64,
    pub repetition_number: u32,
    pub interval: u32,
    pub next_review_date: NaiveDate,
    pub last_review_date: Option<NaiveDate>,
    /// Days until the next review, zero when due.
    pub days_until_review: i64,
    pub due: bool,
    pub mastery: String,
}

impl ItemInfo {
    /// Build the view of `item` as of `today`.
    pub fn from_item(item: &VocabularyItem, today: NaiveDate) -> Self {
        Self {
            word: item.word().to_string(),
            definition: item.definition().to_string(),
            example: item.example().to_string(),
            tags: item.tags().iter().cloned().collect(),
            date_added: item.date_added().format("%Y-%m-%d").to_string(),
            easiness_factor: item.easiness_factor(),
            repetition_number: item.repetition_number(),
            interval: item.interval(),
            next_review_date: item.next_review_date(),
            last_review_date: item.last_review_date(),
            days_until_review: item.days_until_review_on(today),
            due: item.is_due_on(today),
            mastery: item.mastery().to_string(),
        }
    }

    /// One-line summary for lists.
    pub fn summary_line(&self) -> String {
        let when = if self.due {
            "due".to_string()
        } else {
            format!("in {}d", self.days_until_review)
        };
        format!("{} [{}] {}: {}", self.word, self.mastery, when, self.definition)
    }

    /// Multi-line detail view.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.word.clone(),
            format!("  Definition: {}", self.definition),
            format!("  Example:    {}", self.example),
        ];
        if !self.tags.is_empty() {
            lines.push(format!("  Tags:       {}", self.tags.join(", ")));
        }
        lines.push(format!("  Added:      {}", self.date_added));
        lines.push(format!(
            "  Mastery:    {} (repetitions {}, EF {:.2}, interval {}d)",
            self.mastery, self.repetition_number, self.easiness_factor, self.interval
        ));
        let last = self
            .last_review_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        lines.push(format!("  Last review: {}", last));
        let next = if self.due {
            format!("{} (due)", self.next_review_date)
        } else {
            format!("{} (in {}d)", self.next_review_date, self.days_until_review)
        };
        lines.push(format!("  Next review: {}", next));
        lines
    }
}

/// Output format for the show command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowOutput {
    /// Whether the word was found.
    pub success: bool,
    /// The item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemInfo>,
    /// Error message if the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShowOutput {
    /// Create a successful output.
    pub fn success(item: ItemInfo) -> Self {
        Self {
            success: true,
            item: Some(item),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            item: None,
            error: Some(error.into()),
        }
    }
}

/// The show command implementation.
pub struct ShowCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> ShowCommand<'a, P> {
    /// Create a new show command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the show command.
    pub fn run(&self, word: &str, _options: &ShowOptions) -> ShowOutput {
        match self.store.get(word) {
            Some(item) => ShowOutput::success(ItemInfo::from_item(&item, self.store.today())),
            None => ShowOutput::failure(LexisError::item_not_found(word.trim()).to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ShowOutput, options: &ShowOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        match &output.item {
            Some(item) => item.detail_lines().join("\n"),
            None => format!(
                "Show failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
