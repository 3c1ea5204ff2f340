//! Lexis - spaced-repetition vocabulary scheduler
//!
//! Lexis keeps a personal vocabulary, schedules each word for review with
//! the SM-2 algorithm, composes bounded review sessions, and reports
//! learning progress. Items are persisted to a single JSON file that is
//! always replaced atomically.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod review;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use core::{
    normalize_word, Clock, FixedClock, MasteryLevel, Quality, SystemClock, VocabularyItem,
};
pub use error::{LexisError, Result};
pub use review::Scheduler;
pub use stats::{LearningStats, MasteryCounts, StatsAggregator};
pub use storage::{
    JsonFilePersistence, LoadOutcome, MemoryPersistence, VocabularyPersistence, VocabularyStore,
};

// CLI commands
pub use cli::{
    AddCommand, DueCommand, ExportCommand, InitCommand, ListCommand, RemoveCommand, ReviewCommand,
    SessionCommand, ShowCommand, StatsCommand,
};
