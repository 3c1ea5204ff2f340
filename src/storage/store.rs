//! The vocabulary store.
//!
//! The store owns every item, keyed by normalized word, and writes the full
//! set through its persistence backend after each mutation. All access goes
//! through a single mutex held for the whole operation, so a save can never
//! interleave with another write.

use std::collections::{hash_map, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::core::{normalize_word, Clock, Quality, VocabularyItem};
use crate::error::{LexisError, Result};
use crate::storage::traits::VocabularyPersistence;

/// Lazy, restartable view over the stored items (clone it to restart).
pub type Items<'a> = hash_map::Values<'a, String, VocabularyItem>;

/// What happened when the store read its persisted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items were read. `skipped` lists records that failed validation and
    /// `preserved` says where the file holding them was copied.
    Loaded {
        count: usize,
        skipped: Vec<String>,
        preserved: Option<String>,
    },
    /// Nothing has been persisted yet.
    Missing,
    /// The data could not be read; the store started empty.
    Recovered { warning: String },
}

impl LoadOutcome {
    /// A non-fatal warning for the caller to surface, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Loaded {
                skipped, preserved, ..
            } if !skipped.is_empty() => {
                let mut warning = format!(
                    "skipped {} invalid vocabulary record(s): {}",
                    skipped.len(),
                    skipped.join("; ")
                );
                if let Some(note) = preserved {
                    warning.push_str("; ");
                    warning.push_str(note);
                }
                Some(warning)
            }
            Self::Recovered { warning } => Some(warning.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    items: HashMap<String, VocabularyItem>,
    /// Mutations not yet persisted (a save failed).
    dirty: bool,
}

/// Owner of the vocabulary.
pub struct VocabularyStore<P: VocabularyPersistence> {
    persistence: P,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
}

impl<P: VocabularyPersistence> VocabularyStore<P> {
    /// Create an empty store without reading persisted data.
    pub fn new(persistence: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            persistence,
            clock,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Create a store and load its persisted data.
    pub fn open(persistence: P, clock: Arc<dyn Clock>) -> (Self, LoadOutcome) {
        let store = Self::new(persistence, clock);
        let outcome = store.load();
        (store, outcome)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the in-memory items with the persisted ones.
    ///
    /// Never fails: unreadable data leaves the store empty and is reported
    /// through [`LoadOutcome::Recovered`].
    pub fn load(&self) -> LoadOutcome {
        let mut state = self.lock();
        state.items.clear();
        state.dirty = false;

        match self.persistence.load() {
            Ok(None) => {
                tracing::info!(location = %self.persistence.location(), "no vocabulary yet");
                LoadOutcome::Missing
            }
            Ok(Some(loaded)) => {
                for item in loaded.items {
                    if let Some(previous) = state.items.insert(item.word().to_string(), item) {
                        tracing::warn!(word = %previous.word(), "duplicate vocabulary record, keeping the last one");
                    }
                }
                let count = state.items.len();
                tracing::info!(count, location = %self.persistence.location(), "vocabulary loaded");
                LoadOutcome::Loaded {
                    count,
                    skipped: loaded.skipped,
                    preserved: loaded.preserved,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load vocabulary, starting empty");
                LoadOutcome::Recovered {
                    warning: format!(
                        "could not load vocabulary from {}: {}",
                        self.persistence.location(),
                        e
                    ),
                }
            }
        }
    }

    /// Persist the full item set.
    ///
    /// On failure the in-memory items are untouched and remain dirty, so the
    /// caller can retry.
    pub fn save(&self) -> Result<()> {
        let mut state = self.lock();
        self.persist(&mut state)
    }

    fn persist(&self, state: &mut StoreState) -> Result<()> {
        let mut items: Vec<&VocabularyItem> = state.items.values().collect();
        items.sort_by(|a, b| a.word().cmp(b.word()));

        match self.persistence.save(&items) {
            Ok(()) => {
                tracing::debug!(count = items.len(), "vocabulary saved");
                state.dirty = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save vocabulary");
                state.dirty = true;
                Err(e)
            }
        }
    }

    /// Insert a new item or update the content of an existing one.
    ///
    /// Returns the stored item and whether it was newly created. Tags are
    /// replaced only when `tags` is non-empty. A new item is first due on the
    /// clock's study day. The change is kept in memory even if the following
    /// save fails; the save error is returned.
    pub fn add_or_update(
        &self,
        word: &str,
        definition: &str,
        example: &str,
        tags: &[&str],
    ) -> Result<(VocabularyItem, bool)> {
        let key = normalize_word(word);
        if key.is_empty() {
            return Err(LexisError::validation("word must not be empty"));
        }
        let tags: BTreeSet<String> = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let mut state = self.lock();
        let (item, created) = match state.items.entry(key) {
            hash_map::Entry::Occupied(mut entry) => {
                entry
                    .get_mut()
                    .update_content(definition, example, Some(tags));
                tracing::debug!(word = %entry.key(), "vocabulary item updated");
                (entry.get().clone(), false)
            }
            hash_map::Entry::Vacant(entry) => {
                let item =
                    VocabularyItem::new(entry.key(), definition, example, tags, self.clock.now())?
                        .first_review_on(self.clock.today());
                tracing::debug!(word = %entry.key(), "vocabulary item added");
                (entry.insert(item).clone(), true)
            }
        };

        self.persist(&mut state)?;
        Ok((item, created))
    }

    /// Look up an item by word (any casing or surrounding whitespace).
    pub fn get(&self, word: &str) -> Option<VocabularyItem> {
        self.lock().items.get(&normalize_word(word)).cloned()
    }

    /// Whether the store holds `word`.
    pub fn contains(&self, word: &str) -> bool {
        self.lock().items.contains_key(&normalize_word(word))
    }

    /// Delete an item. Returns whether anything was removed.
    pub fn remove(&self, word: &str) -> Result<bool> {
        let mut state = self.lock();
        if state.items.remove(&normalize_word(word)).is_none() {
            return Ok(false);
        }
        tracing::debug!(word = %normalize_word(word), "vocabulary item removed");
        self.persist(&mut state)?;
        Ok(true)
    }

    /// Apply a review outcome to an item and persist it.
    ///
    /// Returns `Ok(None)` if the word is unknown.
    pub fn record_review(
        &self,
        word: &str,
        quality: impl Into<Quality>,
    ) -> Result<Option<VocabularyItem>> {
        let quality = quality.into();
        let today = self.clock.today();

        let mut state = self.lock();
        let Some(item) = state.items.get_mut(&normalize_word(word)) else {
            return Ok(None);
        };
        item.record_review(quality, today);
        let updated = item.clone();
        tracing::debug!(
            word = %updated.word(),
            quality = quality.value(),
            interval = updated.interval(),
            next_review = %updated.next_review_date(),
            "review recorded"
        );

        self.persist(&mut state)?;
        Ok(Some(updated))
    }

    /// Snapshot of every item, in no particular order.
    pub fn all(&self) -> Vec<VocabularyItem> {
        self.lock().items.values().cloned().collect()
    }

    /// Run `f` over a lazy view of the items while holding the store lock.
    pub fn with_items<R>(&self, f: impl FnOnce(Items<'_>) -> R) -> R {
        let state = self.lock();
        f(state.items.values())
    }

    /// Items carrying `tag`, ordered by word.
    pub fn items_by_tag(&self, tag: &str) -> Vec<VocabularyItem> {
        let mut items: Vec<VocabularyItem> = self.with_items(|items| {
            items.filter(|item| item.has_tag(tag)).cloned().collect()
        });
        items.sort_by(|a, b| a.word().cmp(b.word()));
        items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether there are mutations that failed to persist.
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    /// The store's clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The current study day according to the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::storage::memory::MemoryPersistence;
    use crate::storage::traits::tests::sample_item;
    use crate::storage::JsonFilePersistence;
    use std::fs;
    use tempfile::TempDir;

    fn d0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn memory_store() -> (VocabularyStore<Arc<MemoryPersistence>>, Arc<MemoryPersistence>, Arc<FixedClock>) {
        let backend = Arc::new(MemoryPersistence::new());
        let clock = Arc::new(FixedClock::on(d0()));
        let store = VocabularyStore::new(backend.clone(), clock.clone());
        (store, backend, clock)
    }

    #[test]
    fn test_add_creates_item_due_today() {
        let (store, backend, _clock) = memory_store();

        let (item, created) = store.add_or_update("Run", "move fast", "I run daily", &["verb"]).unwrap();

        assert!(created);
        assert_eq!(item.word(), "run");
        assert_eq!(item.next_review_date(), d0());
        assert_eq!(item.date_added().date_naive(), d0());
        assert!(item.has_tag("verb"));
        assert_eq!(store.len(), 1);
        assert_eq!(backend.save_count(), 1);
    }

    /// A clock just after midnight whose study day has not rolled over yet.
    #[derive(Debug)]
    struct LateNightClock;

    impl Clock for LateNightClock {
        fn now(&self) -> chrono::DateTime<chrono::Local> {
            crate::core::clock::local_from_naive(
                (d0() + chrono::Days::new(1)).and_hms_opt(1, 30, 0).unwrap(),
            )
        }

        fn today(&self) -> NaiveDate {
            d0()
        }
    }

    #[test]
    fn test_new_item_due_on_study_day() {
        let store = VocabularyStore::new(MemoryPersistence::new(), Arc::new(LateNightClock));

        let (item, _) = store.add_or_update("run", "d", "e", &[]).unwrap();

        assert_eq!(item.next_review_date(), d0());
        assert!(item.is_due_on(store.today()));
        assert_eq!(item.date_added().date_naive(), d0() + chrono::Days::new(1));
    }

    #[test]
    fn test_add_normalizes_key() {
        let (store, _backend, _clock) = memory_store();

        store.add_or_update(" Run ", "first", "e1", &["verb"]).unwrap();
        store.add_or_update("run", "second", "e2", &[]).unwrap();
        store.add_or_update("RUN", "third", "e3", &[]).unwrap();

        assert_eq!(store.len(), 1);
        let item = store.get("  rUn").unwrap();
        assert_eq!(item.definition(), "third");
        assert_eq!(item.example(), "e3");
        assert!(item.has_tag("verb"));
    }

    #[test]
    fn test_update_replaces_tags_when_given() {
        let (store, _backend, _clock) = memory_store();

        store.add_or_update("run", "d", "e", &["verb", "sport"]).unwrap();
        let (item, created) = store.add_or_update("run", "d", "e", &["phrasal"]).unwrap();

        assert!(!created);
        assert_eq!(item.tags().len(), 1);
        assert!(item.has_tag("phrasal"));
    }

    #[test]
    fn test_update_keeps_review_state_and_date_added() {
        let (store, _backend, clock) = memory_store();

        store.add_or_update("run", "d", "e", &[]).unwrap();
        store.record_review("run", 4).unwrap();
        clock.advance_days(3);
        let (item, _) = store.add_or_update("run", "new d", "new e", &[]).unwrap();

        assert_eq!(item.repetition_number(), 1);
        assert_eq!(item.date_added().date_naive(), d0());
    }

    #[test]
    fn test_empty_word_is_validation_error() {
        let (store, backend, _clock) = memory_store();

        let result = store.add_or_update("   ", "d", "e", &[]);

        assert!(matches!(result, Err(LexisError::Validation { .. })));
        assert!(store.is_empty());
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_get_missing() {
        let (store, _backend, _clock) = memory_store();
        assert!(store.get("nothing").is_none());
        assert!(!store.contains("nothing"));
    }

    #[test]
    fn test_remove() {
        let (store, backend, _clock) = memory_store();
        store.add_or_update("run", "d", "e", &[]).unwrap();

        assert!(store.remove(" RUN ").unwrap());
        assert!(store.is_empty());
        assert_eq!(backend.save_count(), 2);

        // Absent word: no deletion, no save
        assert!(!store.remove("run").unwrap());
        assert_eq!(backend.save_count(), 2);
    }

    #[test]
    fn test_record_review_persists() {
        let (store, backend, _clock) = memory_store();
        store.add_or_update("run", "d", "e", &[]).unwrap();

        let item = store.record_review("Run", 5).unwrap().unwrap();

        assert_eq!(item.repetition_number(), 1);
        assert_eq!(item.last_review_date(), Some(d0()));
        let saved = backend.saved_items().unwrap();
        assert_eq!(saved[0], item);
    }

    #[test]
    fn test_record_review_unknown_word() {
        let (store, backend, _clock) = memory_store();
        assert!(store.record_review("ghost", 4).unwrap().is_none());
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_record_review_uses_clock() {
        let (store, _backend, clock) = memory_store();
        store.add_or_update("run", "d", "e", &[]).unwrap();

        store.record_review("run", 4).unwrap();
        clock.advance_days(1);
        let item = store.record_review("run", 4).unwrap().unwrap();

        assert_eq!(item.interval(), 6);
        assert_eq!(item.next_review_date(), d0() + chrono::Days::new(7));
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let (store, backend, _clock) = memory_store();
        store.add_or_update("run", "d", "e", &[]).unwrap();
        backend.set_fail_saves(true);

        let result = store.add_or_update("walk", "d", "e", &[]);
        assert!(matches!(result, Err(LexisError::Storage { .. })));
        assert!(store.get("walk").is_some());
        assert!(store.is_dirty());
        // Persisted data is the last successful save
        assert_eq!(backend.saved_items().unwrap().len(), 1);

        backend.set_fail_saves(false);
        store.save().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(backend.saved_items().unwrap().len(), 2);
    }

    #[test]
    fn test_open_missing() {
        let backend = MemoryPersistence::new();
        let (store, outcome) = VocabularyStore::open(backend, Arc::new(FixedClock::on(d0())));
        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(outcome.warning().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_loaded() {
        let backend = MemoryPersistence::with_items(vec![sample_item("lucid"), sample_item("terse")]);
        let (store, outcome) = VocabularyStore::open(backend, Arc::new(FixedClock::on(d0())));
        assert!(matches!(outcome, LoadOutcome::Loaded { count: 2, .. }));
        assert!(store.contains("Lucid"));
    }

    #[test]
    fn test_open_load_failure_recovers_empty() {
        let backend = MemoryPersistence::with_items(vec![sample_item("lucid")]);
        backend.set_load_error("unexpected end of input");

        let (store, outcome) = VocabularyStore::open(backend, Arc::new(FixedClock::on(d0())));

        assert!(store.is_empty());
        let warning = outcome.warning().unwrap();
        assert!(warning.contains("unexpected end of input"));
    }

    #[test]
    fn test_skipped_warning_names_backup() {
        let outcome = LoadOutcome::Loaded {
            count: 1,
            skipped: vec!["record 1: validation error: word must not be empty".to_string()],
            preserved: Some("original preserved at /tmp/v.json.corrupt-1".to_string()),
        };

        let warning = outcome.warning().unwrap();

        assert!(warning.starts_with("skipped 1 invalid vocabulary record(s)"));
        assert!(warning.ends_with("original preserved at /tmp/v.json.corrupt-1"));
    }

    #[test]
    fn test_all_and_with_items() {
        let (store, _backend, _clock) = memory_store();
        store.add_or_update("run", "d", "e", &["verb"]).unwrap();
        store.add_or_update("cat", "d", "e", &["noun"]).unwrap();

        assert_eq!(store.all().len(), 2);

        let (first, second) = store.with_items(|items| {
            let restart = items.clone();
            (items.count(), restart.filter(|i| i.has_tag("noun")).count())
        });
        assert_eq!(first, 2);
        assert_eq!(second, 1);
    }

    #[test]
    fn test_items_by_tag() {
        let (store, _backend, _clock) = memory_store();
        store.add_or_update("run", "d", "e", &["verb"]).unwrap();
        store.add_or_update("eat", "d", "e", &["verb", "food"]).unwrap();
        store.add_or_update("cat", "d", "e", &["noun"]).unwrap();

        let verbs = store.items_by_tag("verb");
        let words: Vec<&str> = verbs.iter().map(|i| i.word()).collect();
        assert_eq!(words, vec!["eat", "run"]);
        assert!(store.items_by_tag("adjective").is_empty());
    }

    #[test]
    fn test_file_roundtrip_reproduces_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocabulary.json");
        let clock = Arc::new(FixedClock::on(d0()));

        let store = VocabularyStore::new(JsonFilePersistence::with_path(&path), clock.clone());
        store.add_or_update("run", "move fast", "I run", &["verb"]).unwrap();
        store.add_or_update("lucid", "clear", "a lucid answer", &[]).unwrap();
        store.record_review("run", 3).unwrap();

        let (reloaded, outcome) =
            VocabularyStore::open(JsonFilePersistence::with_path(&path), clock);
        assert!(matches!(outcome, LoadOutcome::Loaded { count: 2, .. }));

        let mut before = store.all();
        let mut after = reloaded.all();
        before.sort_by(|a, b| a.word().cmp(b.word()));
        after.sort_by(|a, b| a.word().cmp(b.word()));
        assert_eq!(before, after);
        assert!(reloaded.get("lucid").unwrap().last_review_date().is_none());
    }

    #[test]
    fn test_corrupt_file_starts_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocabulary.json");
        fs::write(&path, "not json at all").unwrap();

        let (store, outcome) = VocabularyStore::open(
            JsonFilePersistence::with_path(&path),
            Arc::new(FixedClock::on(d0())),
        );

        assert!(store.is_empty());
        assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
        assert!(outcome.warning().is_some());
    }

    #[test]
    fn test_undecodable_file_survives_next_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocabulary.json");
        let original = b"[{\"word\": \"caf\xe9\"}]";
        fs::write(&path, original).unwrap();

        let (store, outcome) = VocabularyStore::open(
            JsonFilePersistence::with_path(&path),
            Arc::new(FixedClock::on(d0())),
        );
        assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
        store.add_or_update("run", "d", "e", &[]).unwrap();

        let kept: Vec<Vec<u8>> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .map(|e| fs::read(e.path()).unwrap())
            .collect();
        assert_eq!(kept, vec![original.to_vec()]);
    }

    #[test]
    fn test_concurrent_writers() {
        use std::thread;

        let (store, backend, _clock) = memory_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let word = format!("word{}", i);
                    store.add_or_update(&word, "d", "e", &[]).unwrap();
                    store.record_review(&word, 4).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        assert_eq!(backend.saved_items().unwrap().len(), 8);
        assert_eq!(backend.save_count(), 16);
    }
}
