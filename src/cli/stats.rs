//! Stats command for Lexis.
//!
//! Displays learning progress: mastery buckets, tags, and upcoming reviews.

use serde::Serialize;

use crate::stats::{LearningStats, StatsAggregator};
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Always true; stats are computed in memory.
    pub success: bool,
    /// The computed stats.
    #[serde(flatten)]
    pub stats: LearningStats,
}

/// The stats command implementation.
pub struct StatsCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> StatsCommand<'a, P> {
    /// Create a new stats command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the stats command.
    pub fn run(&self, _options: &StatsOptions) -> StatsOutput {
        StatsOutput {
            success: true,
            stats: StatsAggregator::new(self.store).learning_stats(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(&output.stats)
        }
    }

    fn format_human_readable(&self, stats: &LearningStats) -> String {
        if stats.total_items == 0 {
            return "No vocabulary yet.".to_string();
        }

        let mut lines = vec![
            format!("Vocabulary: {} item(s), {} due today", stats.total_items, stats.due_items),
            String::new(),
            "Mastery".to_string(),
            format!("  mastered  {:>5}", stats.mastery_levels.mastered),
            format!("  familiar  {:>5}", stats.mastery_levels.familiar),
            format!("  learning  {:>5}", stats.mastery_levels.learning),
            String::new(),
            "Upcoming reviews".to_string(),
        ];
        for (horizon, count) in &stats.upcoming_reviews {
            lines.push(format!("  within {:>2}d {:>5}", horizon, count));
        }

        if !stats.tag_distribution.is_empty() {
            lines.push(String::new());
            lines.push("Tags".to_string());
            let mut tags: Vec<(&String, &usize)> = stats.tag_distribution.iter().collect();
            // Most used first, alphabetical among equals
            tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (tag, count) in tags {
                lines.push(format!("  {:<16} {:>5}", tag, count));
            }
        }

        lines.join("\n")
    }
}
