//! Due command for Lexis.
//!
//! Lists the items due today, most overdue first.

use serde::{Deserialize, Serialize};

use crate::cli::show::ItemInfo;
use crate::review::Scheduler;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the due command.
#[derive(Debug, Clone, Default)]
pub struct DueOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Output format for the due command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueOutput {
    /// Always true; listing cannot fail.
    pub success: bool,
    /// Number of items listed.
    pub count: usize,
    /// Number of items due in total.
    pub due_total: usize,
    /// Due items in review priority order.
    pub items: Vec<ItemInfo>,
}

/// The due command implementation.
pub struct DueCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> DueCommand<'a, P> {
    /// Create a new due command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the due command.
    pub fn run(&self, options: &DueOptions) -> DueOutput {
        let today = self.store.today();
        let scheduler = Scheduler::new(self.store);

        let due_total = scheduler.due_count();
        let items: Vec<ItemInfo> = scheduler
            .due_items_on(today, options.limit)
            .iter()
            .map(|item| ItemInfo::from_item(item, today))
            .collect();

        DueOutput {
            success: true,
            count: items.len(),
            due_total,
            items,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &DueOutput, options: &DueOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if output.items.is_empty() {
            return "Nothing due today.".to_string();
        }

        let mut lines = vec![format!("{} item(s) due:", output.due_total)];
        for item in &output.items {
            lines.push(format!(
                "  {} (since {}): {}",
                item.word, item.next_review_date, item.definition
            ));
        }
        lines.join("\n")
    }
}
