//! Vocabulary item and its review state machine.
//!
//! Scheduling follows the SM-2 family: each successful recall grows the
//! interval by the item's easiness factor, a failed recall resets progress.
//! The review state (easiness, repetitions, interval, dates) only changes
//! through [`VocabularyItem::record_review`].

use std::collections::BTreeSet;

use chrono::{DateTime, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::mastery::MasteryLevel;
use crate::error::{LexisError, Result};

/// Easiness factor assigned to new items.
pub const INITIAL_EASINESS: f64 = 2.5;

/// Lower bound for the easiness factor.
pub const MIN_EASINESS: f64 = 1.3;

/// Highest review quality.
pub const MAX_QUALITY: u8 = 5;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// Interval after the first successful recall.
const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second consecutive successful recall.
const SECOND_INTERVAL_DAYS: u32 = 6;

/// Longest interval ever scheduled (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Normalize a word into its store key (trimmed, case-folded).
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Recall quality on the 0-5 scale.
///
/// - 0: complete blackout
/// - 1: wrong, but recognized once shown
/// - 2: wrong, but felt familiar
/// - 3: correct with serious difficulty
/// - 4: correct after hesitation
/// - 5: perfect recall
///
/// Construction clamps, so any integer is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Clamp an arbitrary integer into `0..=5`.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, MAX_QUALITY as i64) as u8)
    }

    /// The clamped value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this counts as a successful recall.
    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

impl From<i64> for Quality {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<i32> for Quality {
    fn from(raw: i32) -> Self {
        Self::clamped(raw as i64)
    }
}

impl From<u8> for Quality {
    fn from(raw: u8) -> Self {
        Self::clamped(raw as i64)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// A single vocabulary entry with its review state.
///
/// Items are created through [`VocabularyItem::new`] (or deserialization,
/// which goes through the same validation) and are owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct VocabularyItem {
    word: String,
    definition: String,
    example: String,
    date_added: DateTime<Local>,
    tags: BTreeSet<String>,
    easiness_factor: f64,
    repetition_number: u32,
    next_review_date: NaiveDate,
    last_review_date: Option<NaiveDate>,
    interval: u32,
}

impl VocabularyItem {
    /// Create a new, never-reviewed item.
    ///
    /// The word is normalized; an empty result is a validation error. The
    /// item is due on the day it was added.
    pub fn new(
        word: &str,
        definition: impl Into<String>,
        example: impl Into<String>,
        tags: impl IntoIterator<Item = String>,
        added_at: DateTime<Local>,
    ) -> Result<Self> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(LexisError::validation("word must not be empty"));
        }

        Ok(Self {
            word,
            definition: definition.into(),
            example: example.into(),
            date_added: added_at,
            tags: tags.into_iter().collect(),
            easiness_factor: INITIAL_EASINESS,
            repetition_number: 0,
            next_review_date: added_at.date_naive(),
            last_review_date: None,
            interval: 0,
        })
    }

    /// Apply a review outcome recorded on `today`.
    pub fn record_review(&mut self, quality: impl Into<Quality>, today: NaiveDate) {
        let quality = quality.into();
        let q = quality.value() as f64;
        let miss = MAX_QUALITY as f64 - q;

        self.easiness_factor =
            (self.easiness_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS);
        self.last_review_date = Some(today);

        if quality.is_passing() {
            self.interval = match self.repetition_number {
                0 => FIRST_INTERVAL_DAYS,
                1 => SECOND_INTERVAL_DAYS,
                _ => (f64::from(self.interval) * self.easiness_factor)
                    .round()
                    .min(f64::from(MAX_INTERVAL_DAYS)) as u32,
            };
            self.repetition_number = self.repetition_number.saturating_add(1);
        } else {
            self.repetition_number = 0;
            self.interval = FIRST_INTERVAL_DAYS;
        }

        self.next_review_date = today
            .checked_add_days(Days::new(u64::from(self.interval)))
            .unwrap_or(NaiveDate::MAX);
    }

    /// Move the first review of a never-reviewed item to `day`.
    ///
    /// Lets the store schedule new items on its study day, which can differ
    /// from the calendar date of `added_at`.
    pub(crate) fn first_review_on(mut self, day: NaiveDate) -> Self {
        if self.last_review_date.is_none() && self.repetition_number == 0 {
            self.next_review_date = day;
        }
        self
    }

    /// Whether the item should be reviewed on `today`.
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        today >= self.next_review_date
    }

    /// Days from `today` until the next review, zero when already due.
    pub fn days_until_review_on(&self, today: NaiveDate) -> i64 {
        (self.next_review_date - today).num_days().max(0)
    }

    /// Mastery bucket for the current review state.
    pub fn mastery(&self) -> MasteryLevel {
        MasteryLevel::of(self)
    }

    /// Replace the display content.
    ///
    /// Tags are replaced only when a non-empty set is supplied.
    pub fn update_content(
        &mut self,
        definition: impl Into<String>,
        example: impl Into<String>,
        tags: Option<BTreeSet<String>>,
    ) {
        self.definition = definition.into();
        self.example = example.into();
        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            self.tags = tags;
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn example(&self) -> &str {
        &self.example
    }

    pub fn date_added(&self) -> DateTime<Local> {
        self.date_added
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the item carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn easiness_factor(&self) -> f64 {
        self.easiness_factor
    }

    pub fn repetition_number(&self) -> u32 {
        self.repetition_number
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn next_review_date(&self) -> NaiveDate {
        self.next_review_date
    }

    pub fn last_review_date(&self) -> Option<NaiveDate> {
        self.last_review_date
    }
}

/// Persisted form of an item, as read from disk.
///
/// Optional fields fall back to the values a fresh item would have, so files
/// written by older versions still load.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub word: String,
    pub definition: String,
    pub example: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date_added: DateTime<Local>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_easiness")]
    pub easiness_factor: f64,
    #[serde(default)]
    pub repetition_number: u32,
    pub next_review_date: NaiveDate,
    #[serde(default)]
    pub last_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub interval: u32,
}

fn default_easiness() -> f64 {
    INITIAL_EASINESS
}

impl TryFrom<ItemRecord> for VocabularyItem {
    type Error = LexisError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let mut item = VocabularyItem::new(
            &record.word,
            record.definition,
            record.example,
            record.tags,
            record.date_added,
        )?;

        // A NaN or sub-floor factor would break the EF >= 1.3 invariant.
        item.easiness_factor = if record.easiness_factor.is_finite() {
            record.easiness_factor.max(MIN_EASINESS)
        } else {
            INITIAL_EASINESS
        };
        item.repetition_number = record.repetition_number;
        item.next_review_date = record.next_review_date;
        item.last_review_date = record.last_review_date;
        item.interval = record.interval.min(MAX_INTERVAL_DAYS);

        Ok(item)
    }
}

/// Timestamp parsing that also accepts offset-less ISO-8601 values.
mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    use crate::core::clock::local_from_naive;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Local>> {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Some(zoned.with_timezone(&Local));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(local_from_naive)
    }
}
