//! Core types for Lexis.
//!
//! This module contains the vocabulary item with its review state machine,
//! the mastery buckets derived from it, and the clock the scheduler reads
//! "today" from.

pub mod clock;
pub mod item;
pub mod mastery;

pub use clock::{study_day, Clock, FixedClock, SystemClock};
pub use item::{
    normalize_word, ItemRecord, Quality, VocabularyItem, INITIAL_EASINESS, MAX_QUALITY,
    MAX_INTERVAL_DAYS, MIN_EASINESS, PASSING_QUALITY,
};
pub use mastery::{MasteryLevel, MASTERED_MIN_EASINESS, MASTERED_MIN_REPETITIONS};
