//! End-to-end store lifecycle through the public API.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use lexis::{
    FixedClock, JsonFilePersistence, LoadOutcome, Scheduler, StatsAggregator, VocabularyStore,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn add_session_review_reload_stats() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("vocabulary.json");
    let clock = Arc::new(FixedClock::on(day(2026, 4, 2)));

    let (store, outcome) =
        VocabularyStore::open(JsonFilePersistence::with_path(&path), clock.clone());
    assert_eq!(outcome, LoadOutcome::Missing);

    store
        .add_or_update("  Run ", "move fast", "I run daily", &["verb"])
        .unwrap();
    store
        .add_or_update("apt", "suitable", "an apt remark", &["adjective"])
        .unwrap();
    store
        .add_or_update("zeal", "enthusiasm", "with zeal", &["noun", "verb"])
        .unwrap();
    assert!(path.exists());

    // Due items fill the session first, oldest then alphabetical.
    let mut rng = StdRng::seed_from_u64(7);
    let session = Scheduler::new(&store).review_session(2, &mut rng);
    let words: BTreeSet<&str> = session.iter().map(|item| item.word()).collect();
    assert_eq!(words, BTreeSet::from(["apt", "run"]));

    for item in &session {
        let reviewed = store.record_review(item.word(), 4).unwrap().unwrap();
        assert_eq!(reviewed.repetition_number(), 1);
        assert_eq!(reviewed.interval(), 1);
        assert_eq!(reviewed.next_review_date(), day(2026, 4, 3));
    }
    assert!(store.record_review("missing", 4).unwrap().is_none());
    drop(store);

    let (reopened, outcome) =
        VocabularyStore::open(JsonFilePersistence::with_path(&path), clock.clone());
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            count: 3,
            skipped: Vec::new(),
            preserved: None,
        }
    );

    let run = reopened.get("RUN").unwrap();
    assert_eq!(run.last_review_date(), Some(day(2026, 4, 2)));
    assert!((run.easiness_factor() - 2.5).abs() < 1e-9);

    let due: Vec<String> = Scheduler::new(&reopened)
        .due_items(None)
        .iter()
        .map(|item| item.word().to_string())
        .collect();
    assert_eq!(due, vec!["zeal".to_string()]);

    let stats = StatsAggregator::new(&reopened).learning_stats();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.due_items, 1);
    assert_eq!(stats.mastery_levels.total(), 3);
    assert_eq!(stats.tag_distribution.get("verb"), Some(&2));
    assert_eq!(stats.tag_distribution.get("noun"), Some(&1));
    assert_eq!(stats.upcoming(1), Some(3));
    assert_eq!(stats.upcoming(30), Some(3));

    clock.advance_days(1);
    assert_eq!(Scheduler::new(&reopened).due_count(), 3);
}

#[test]
fn failed_review_resets_progress_across_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vocabulary.json");
    let clock = Arc::new(FixedClock::on(day(2026, 4, 2)));

    let (store, _) = VocabularyStore::open(JsonFilePersistence::with_path(&path), clock.clone());
    store.add_or_update("zeal", "enthusiasm", "", &[]).unwrap();
    store.record_review("zeal", 5).unwrap();
    clock.advance_days(1);
    store.record_review("zeal", 5).unwrap();
    clock.advance_days(6);
    let failed = store.record_review("zeal", 1).unwrap().unwrap();
    drop(store);

    assert_eq!(failed.repetition_number(), 0);
    assert_eq!(failed.interval(), 1);
    assert!(failed.easiness_factor() >= 1.3);

    let (reopened, _) = VocabularyStore::open(JsonFilePersistence::with_path(&path), clock);
    assert_eq!(reopened.get("zeal"), Some(failed));
}

#[test]
fn remove_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vocabulary.json");
    let clock = Arc::new(FixedClock::on(day(2026, 4, 2)));

    let (store, _) = VocabularyStore::open(JsonFilePersistence::with_path(&path), clock.clone());
    store.add_or_update("apt", "suitable", "", &[]).unwrap();
    store.add_or_update("run", "move fast", "", &[]).unwrap();
    assert!(store.remove("Apt").unwrap());
    assert!(!store.remove("apt").unwrap());
    drop(store);

    let (reopened, _) = VocabularyStore::open(JsonFilePersistence::with_path(&path), clock);
    assert_eq!(reopened.len(), 1);
    assert!(reopened.contains("run"));
    assert!(!reopened.contains("apt"));
}
