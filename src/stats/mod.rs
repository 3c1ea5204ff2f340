//! Learning statistics for Lexis.
//!
//! Stats are computed on demand from the store; nothing is cached.

pub mod aggregator;

pub use aggregator::{LearningStats, MasteryCounts, StatsAggregator, UPCOMING_HORIZONS};
