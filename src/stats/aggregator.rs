//! Learning progress summaries over the vocabulary store.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::MasteryLevel;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Review horizons, in days, reported by [`LearningStats::upcoming_reviews`].
pub const UPCOMING_HORIZONS: [u32; 5] = [1, 3, 7, 14, 30];

/// Item counts per mastery bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryCounts {
    pub mastered: usize,
    pub familiar: usize,
    pub learning: usize,
}

impl MasteryCounts {
    fn record(&mut self, level: MasteryLevel) {
        match level {
            MasteryLevel::Mastered => self.mastered += 1,
            MasteryLevel::Familiar => self.familiar += 1,
            MasteryLevel::Learning => self.learning += 1,
        }
    }

    /// Sum over all buckets.
    pub fn total(&self) -> usize {
        self.mastered + self.familiar + self.learning
    }
}

/// Snapshot of learning progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStats {
    /// Number of items in the store.
    pub total_items: usize,
    /// Number of items due on the reporting day.
    pub due_items: usize,
    /// Mutually exclusive mastery buckets.
    pub mastery_levels: MasteryCounts,
    /// Tag to number of items carrying it.
    pub tag_distribution: BTreeMap<String, usize>,
    /// Horizon (days) to number of items due within it.
    ///
    /// Counts are cumulative: an item due in two days is counted for every
    /// horizon of two days or more.
    pub upcoming_reviews: BTreeMap<u32, usize>,
}

impl LearningStats {
    /// Items due within `horizon` days, if it is a reported horizon.
    pub fn upcoming(&self, horizon: u32) -> Option<usize> {
        self.upcoming_reviews.get(&horizon).copied()
    }
}

/// Computes [`LearningStats`] over a store.
pub struct StatsAggregator<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> StatsAggregator<'a, P> {
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Progress as of the store clock's study day.
    pub fn learning_stats(&self) -> LearningStats {
        self.learning_stats_on(self.store.today())
    }

    /// Progress as of `today`.
    pub fn learning_stats_on(&self, today: NaiveDate) -> LearningStats {
        let stats = self.store.with_items(|items| {
            let mut stats = LearningStats {
                upcoming_reviews: UPCOMING_HORIZONS.iter().map(|&h| (h, 0)).collect(),
                ..LearningStats::default()
            };

            for item in items {
                stats.total_items += 1;
                if item.is_due_on(today) {
                    stats.due_items += 1;
                }
                stats.mastery_levels.record(item.mastery());

                for tag in item.tags() {
                    *stats.tag_distribution.entry(tag.clone()).or_insert(0) += 1;
                }

                let days = item.days_until_review_on(today);
                for (&horizon, count) in stats.upcoming_reviews.iter_mut() {
                    if days <= i64::from(horizon) {
                        *count += 1;
                    }
                }
            }
            stats
        });

        tracing::debug!(
            total = stats.total_items,
            due = stats.due_items,
            "learning stats computed"
        );
        stats
    }
}
