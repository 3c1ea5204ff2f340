//! Session command for Lexis.
//!
//! Composes a review session: due items first, padded with a random sample
//! of the rest, in shuffled order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::cli::show::ItemInfo;
use crate::config::Config;
use crate::review::Scheduler;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Options for the session command.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session size; defaults to `session.size` from config.
    pub size: Option<usize>,
    /// Seed for a reproducible session.
    pub seed: Option<u64>,
}

/// Output format for the session command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutput {
    /// Always true; composing a session cannot fail.
    pub success: bool,
    /// Requested session size.
    pub size: usize,
    /// Number of items in the session.
    pub count: usize,
    /// How many session items are actually due.
    pub due: usize,
    /// Session items in presentation order.
    pub items: Vec<ItemInfo>,
}

/// The session command implementation.
pub struct SessionCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
    config: Config,
}

impl<'a, P: VocabularyPersistence> SessionCommand<'a, P> {
    /// Create a new session command.
    pub fn new(store: &'a VocabularyStore<P>, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the session command.
    pub fn run(&self, options: &SessionOptions) -> SessionOutput {
        let size = options.size.unwrap_or(self.config.session.size);
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let today = self.store.today();
        let session = Scheduler::new(self.store).review_session_on(today, size, &mut rng);
        let items: Vec<ItemInfo> = session
            .iter()
            .map(|item| ItemInfo::from_item(item, today))
            .collect();

        SessionOutput {
            success: true,
            size,
            count: items.len(),
            due: items.iter().filter(|i| i.due).count(),
            items,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SessionOutput, options: &SessionOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if output.items.is_empty() {
            return "No vocabulary to review.".to_string();
        }

        let mut lines = vec![format!(
            "Review session: {} item(s), {} due",
            output.count, output.due
        )];
        for (i, item) in output.items.iter().enumerate() {
            lines.push(format!("{:>3}. {}", i + 1, item.word));
            if !item.example.is_empty() {
                lines.push(format!("     e.g. {}", item.example));
            }
        }
        lines.push(String::new());
        lines.push("Record results with: lexis review <word> <quality 0-5>".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::core::FixedClock;
    use crate::storage::MemoryPersistence;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn create_store(words: usize) -> VocabularyStore<MemoryPersistence> {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()));
        let store = VocabularyStore::new(MemoryPersistence::new(), clock);
        for i in 0..words {
            store.add_or_update(&format!("w{i:02}"), "d", "e", &[]).unwrap();
        }
        store
    }

    #[test]
    fn test_session_uses_config_size() {
        let store = create_store(20);
        let config = Config {
            session: SessionConfig { size: 4 },
            ..Config::default()
        };

        let output = SessionCommand::new(&store, config).run(&SessionOptions::default());

        assert_eq!(output.size, 4);
        assert_eq!(output.count, 4);
        assert_eq!(output.due, 4);
    }

    #[test]
    fn test_session_size_option_wins() {
        let store = create_store(20);
        let options = SessionOptions {
            size: Some(7),
            ..Default::default()
        };

        let output = SessionCommand::new(&store, Config::default()).run(&options);

        assert_eq!(output.count, 7);
    }

    #[test]
    fn test_seeded_session_is_reproducible() {
        let store = create_store(20);
        let cmd = SessionCommand::new(&store, Config::default());
        let options = SessionOptions {
            seed: Some(2024),
            ..Default::default()
        };

        let first: Vec<String> = cmd.run(&options).items.into_iter().map(|i| i.word).collect();
        let second: Vec<String> = cmd.run(&options).items.into_iter().map(|i| i.word).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_session_message() {
        let store = create_store(0);
        let cmd = SessionCommand::new(&store, Config::default());
        let options = SessionOptions::default();

        let output = cmd.run(&options);

        assert_eq!(output.count, 0);
        assert_eq!(cmd.format_output(&output, &options), "No vocabulary to review.");
    }
}
