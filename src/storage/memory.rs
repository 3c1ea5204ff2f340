//! In-memory vocabulary persistence for testing.
//!
//! Besides holding the last saved item set, this backend can be told to
//! fail loads or saves so store error paths can be exercised.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::core::VocabularyItem;
use crate::error::{LexisError, Result};
use crate::storage::traits::{LoadedItems, VocabularyPersistence};

/// In-memory persistence backend.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    /// Last saved item set; `None` until the first save.
    items: RwLock<Option<Vec<VocabularyItem>>>,
    /// Error message returned by `load` when set.
    load_error: RwLock<Option<String>>,
    /// Whether `save` should fail.
    fail_saves: AtomicBool,
    /// Number of successful saves.
    save_count: AtomicUsize,
}

impl MemoryPersistence {
    /// Create an empty backend with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `items`.
    pub fn with_items(items: Vec<VocabularyItem>) -> Self {
        let backend = Self::new();
        *backend.items.write().unwrap() = Some(items);
        backend
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail with `message`.
    pub fn set_load_error(&self, message: impl Into<String>) {
        *self.load_error.write().unwrap() = Some(message.into());
    }

    /// The last saved item set.
    pub fn saved_items(&self) -> Option<Vec<VocabularyItem>> {
        self.items.read().unwrap().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl VocabularyPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<LoadedItems>> {
        if let Some(message) = self.load_error.read().unwrap().as_ref() {
            return Err(LexisError::serde(message.clone()));
        }

        Ok(self.items.read().unwrap().as_ref().map(|items| LoadedItems {
            items: items.clone(),
            skipped: Vec::new(),
            preserved: None,
        }))
    }

    fn save(&self, items: &[&VocabularyItem]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LexisError::storage(
                self.location(),
                io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            ));
        }

        *self.items.write().unwrap() = Some(items.iter().map(|&item| item.clone()).collect());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
