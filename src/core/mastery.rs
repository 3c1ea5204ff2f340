//! Mastery buckets derived from an item's review state.

use serde::{Deserialize, Serialize};

use crate::core::item::VocabularyItem;

/// Repetitions required before an item can count as mastered.
pub const MASTERED_MIN_REPETITIONS: u32 = 3;

/// Easiness factor required before an item can count as mastered.
pub const MASTERED_MIN_EASINESS: f64 = 2.0;

/// How well the learner knows an item.
///
/// The buckets are mutually exclusive and cover every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    /// New, recently failed, or repeatedly hard.
    Learning,
    /// One or two consecutive successful reviews.
    Familiar,
    /// At least three consecutive successes with a healthy easiness factor.
    Mastered,
}

impl MasteryLevel {
    /// Classify a review state.
    pub fn classify(repetition_number: u32, easiness_factor: f64) -> Self {
        if repetition_number >= MASTERED_MIN_REPETITIONS && easiness_factor >= MASTERED_MIN_EASINESS
        {
            Self::Mastered
        } else if (1..MASTERED_MIN_REPETITIONS).contains(&repetition_number) {
            Self::Familiar
        } else {
            Self::Learning
        }
    }

    /// Bucket for a single item.
    pub fn of(item: &VocabularyItem) -> Self {
        Self::classify(item.repetition_number(), item.easiness_factor())
    }

    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Familiar => "familiar",
            Self::Mastered => "mastered",
        }
    }
}

impl std::fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_learning() {
        assert_eq!(MasteryLevel::classify(0, 2.5), MasteryLevel::Learning);
    }

    #[test]
    fn test_familiar_range() {
        assert_eq!(MasteryLevel::classify(1, 2.5), MasteryLevel::Familiar);
        assert_eq!(MasteryLevel::classify(2, 1.3), MasteryLevel::Familiar);
    }

    #[test]
    fn test_mastered_requires_easiness() {
        assert_eq!(MasteryLevel::classify(3, 2.0), MasteryLevel::Mastered);
        assert_eq!(MasteryLevel::classify(8, 2.6), MasteryLevel::Mastered);
        // Many repetitions but a hard item stays in learning.
        assert_eq!(MasteryLevel::classify(5, 1.9), MasteryLevel::Learning);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&MasteryLevel::Familiar).unwrap();
        assert_eq!(json, "\"familiar\"");
        assert_eq!(MasteryLevel::Mastered.to_string(), "mastered");
    }
}
