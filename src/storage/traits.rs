//! Persistence seam for the vocabulary store.

use std::sync::Arc;

use crate::core::VocabularyItem;
use crate::error::Result;

/// Items read back from persistent storage.
#[derive(Debug, Clone, Default)]
pub struct LoadedItems {
    /// Records that passed validation.
    pub items: Vec<VocabularyItem>,
    /// Human-readable reasons for records that were dropped.
    pub skipped: Vec<String>,
    /// Where the source data was copied before skipped records are lost.
    pub preserved: Option<String>,
}

/// Trait for vocabulary persistence backends.
///
/// The store keeps the full item set in memory and hands it to the backend
/// wholesale; backends never see partial updates.
pub trait VocabularyPersistence: Send + Sync {
    /// Read every persisted item.
    ///
    /// Returns `Ok(None)` if nothing has been persisted yet. Unreadable or
    /// unparsable data is an error.
    fn load(&self) -> Result<Option<LoadedItems>>;

    /// Replace the persisted item set.
    ///
    /// Implementations must be all-or-nothing: on error the previously
    /// persisted data is left as it was.
    fn save(&self, items: &[&VocabularyItem]) -> Result<()>;

    /// Where the data lives, for messages.
    fn location(&self) -> String;
}

/// Blanket implementation for Arc-wrapped backends.
///
/// This allows tests to keep a handle on a backend that a store owns.
impl<T: VocabularyPersistence + ?Sized> VocabularyPersistence for Arc<T> {
    fn load(&self) -> Result<Option<LoadedItems>> {
        (**self).load()
    }

    fn save(&self, items: &[&VocabularyItem]) -> Result<()> {
        (**self).save(items)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Test utilities for persistence implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::clock::local_from_naive;
    use chrono::NaiveDate;

    pub fn sample_item(word: &str) -> VocabularyItem {
        let added = local_from_naive(
            NaiveDate::from_ymd_opt(2026, 2, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        VocabularyItem::new(
            word,
            format!("definition of {word}"),
            format!("example with {word}"),
            vec!["noun".to_string()],
            added,
        )
        .unwrap()
    }

    /// Verify the save/load contract of a backend.
    pub fn test_persistence_roundtrip<P: VocabularyPersistence>(backend: &P) {
        // Nothing persisted yet
        assert!(backend.load().unwrap().is_none());

        let mut reviewed = sample_item("ephemeral");
        reviewed.record_review(4, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        let fresh = sample_item("lucid");

        backend.save(&[&reviewed, &fresh]).unwrap();

        let loaded = backend.load().unwrap().unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.items.len(), 2);
        assert!(loaded.items.contains(&reviewed));
        assert!(loaded.items.contains(&fresh));

        // Saving again replaces rather than appends
        backend.save(&[&fresh]).unwrap();
        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded.items, vec![fresh]);

        // Empty set is a valid state
        backend.save(&[]).unwrap();
        let loaded = backend.load().unwrap().unwrap();
        assert!(loaded.items.is_empty());
    }
}
