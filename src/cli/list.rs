//! List command for Lexis.
//!
//! Lists vocabulary items alphabetically, optionally filtered by tag.

use serde::{Deserialize, Serialize};

use crate::cli::show::ItemInfo;
use crate::core::VocabularyItem;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Only items carrying this tag.
    pub tag: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Output format for the list command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutput {
    /// Whether the list was successful.
    pub success: bool,
    /// Number of items listed.
    pub count: usize,
    /// Number of items matching before the limit was applied.
    pub total: usize,
    /// The items.
    pub items: Vec<ItemInfo>,
    /// Error message if listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListOutput {
    /// Create a successful output.
    pub fn success(items: Vec<ItemInfo>, total: usize) -> Self {
        Self {
            success: true,
            count: items.len(),
            total,
            items,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            total: 0,
            items: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The list command implementation.
pub struct ListCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> ListCommand<'a, P> {
    /// Create a new list command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the list command.
    pub fn run(&self, options: &ListOptions) -> ListOutput {
        let items: Vec<VocabularyItem> = match options.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => self.store.items_by_tag(tag),
            _ => {
                let mut all = self.store.all();
                all.sort_by(|a, b| a.word().cmp(b.word()));
                all
            }
        };

        let total = items.len();
        let today = self.store.today();
        let limit = options.limit.filter(|&l| l > 0).unwrap_or(usize::MAX);
        let infos = items
            .iter()
            .take(limit)
            .map(|item| ItemInfo::from_item(item, today))
            .collect();

        ListOutput::success(infos, total)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &ListOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, options)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &ListOutput, options: &ListOptions) -> String {
        if !output.success {
            return format!(
                "List failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.items.is_empty() {
            return match &options.tag {
                Some(tag) => format!("No vocabulary tagged '{}'.", tag),
                None => "No vocabulary yet.".to_string(),
            };
        }

        let mut lines = Vec::new();
        if output.count < output.total {
            lines.push(format!("Showing {} of {} item(s):", output.count, output.total));
        } else {
            lines.push(format!("{} item(s):", output.count));
        }
        for (i, item) in output.items.iter().enumerate() {
            lines.push(format!("{:>3}. {}", i + 1, item.summary_line()));
        }
        lines.join("\n")
    }
}
