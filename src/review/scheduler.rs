//! Due selection and review session composition.
//!
//! Due items always take priority. Sessions are padded with a random sample
//! of the remaining items, then shuffled so the presentation order does not
//! reveal which items were overdue.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::VocabularyItem;
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// Selects items from a store for review.
pub struct Scheduler<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> Scheduler<'a, P> {
    /// Create a scheduler over `store`.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Items due today, most overdue first.
    ///
    /// `limit` truncates the result; `None` or `Some(0)` means no limit.
    pub fn due_items(&self, limit: Option<usize>) -> Vec<VocabularyItem> {
        self.due_items_on(self.store.today(), limit)
    }

    /// Items due on `today`, most overdue first, ties broken by word.
    pub fn due_items_on(&self, today: NaiveDate, limit: Option<usize>) -> Vec<VocabularyItem> {
        let mut due: Vec<VocabularyItem> = self
            .store
            .with_items(|items| items.filter(|item| item.is_due_on(today)).cloned().collect());
        due.sort_by(due_order);

        if let Some(limit) = limit.filter(|&l| l > 0) {
            due.truncate(limit);
        }
        due
    }

    /// Number of items due today.
    pub fn due_count(&self) -> usize {
        let today = self.store.today();
        self.store
            .with_items(|items| items.filter(|item| item.is_due_on(today)).count())
    }

    /// Compose a session of up to `size` items for today.
    pub fn review_session<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<VocabularyItem> {
        self.review_session_on(self.store.today(), size, rng)
    }

    /// Compose a session of exactly `min(size, store size)` items for `today`.
    ///
    /// The result is fully determined by the store contents and the state of
    /// `rng`.
    pub fn review_session_on<R: Rng + ?Sized>(
        &self,
        today: NaiveDate,
        size: usize,
        rng: &mut R,
    ) -> Vec<VocabularyItem> {
        if size == 0 {
            return Vec::new();
        }

        let (mut session, mut rest): (Vec<VocabularyItem>, Vec<VocabularyItem>) = self
            .store
            .with_items(|items| items.cloned().partition(|item| item.is_due_on(today)));

        session.sort_by(due_order);
        session.truncate(size);
        let due = session.len();

        if due < size && !rest.is_empty() {
            // Store iteration order is arbitrary; sort so a seeded rng
            // always samples the same items.
            rest.sort_by(|a, b| a.word().cmp(b.word()));
            session.extend(rest.choose_multiple(rng, size - due).cloned());
        }

        session.shuffle(rng);
        tracing::debug!(
            due,
            padded = session.len() - due,
            %today,
            "review session composed"
        );
        session
    }
}

fn due_order(a: &VocabularyItem, b: &VocabularyItem) -> Ordering {
    a.next_review_date()
        .cmp(&b.next_review_date())
        .then_with(|| a.word().cmp(b.word()))
}
