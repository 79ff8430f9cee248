use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::credentials::CredentialPair;

/// Shared FIFO of pending pairs.
///
/// The full pair set is known before workers start, so `get` never waits:
/// it hands out the next pair or reports that the queue is exhausted.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<CredentialPair>>,
    unfinished: AtomicUsize,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<CredentialPair>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put(&self, pair: CredentialPair) {
        let mut items = self.items();
        items.push_back(pair);
        self.unfinished.fetch_add(1, Ordering::AcqRel);
    }

    /// Next pair, or `None` once the queue is empty.
    pub fn get(&self) -> Option<CredentialPair> {
        self.items().pop_front()
    }

    /// Marks one pair handed out by `get` as fully processed.
    ///
    /// Returns `false` if called more times than pairs were enqueued.
    pub fn task_done(&self) -> bool {
        self.unfinished
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Pairs not yet handed out.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Pairs enqueued but not yet marked done (pending plus in flight).
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::Acquire)
    }
}

impl FromIterator<CredentialPair> for WorkQueue {
    fn from_iter<I: IntoIterator<Item = CredentialPair>>(iter: I) -> Self {
        let items: VecDeque<CredentialPair> = iter.into_iter().collect();
        let unfinished = AtomicUsize::new(items.len());
        WorkQueue {
            items: Mutex::new(items),
            unfinished,
        }
    }
}
