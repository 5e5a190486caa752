//! Bounded history of evaluations.
//!
//! The ledger keeps the most recent [`EvaluationRecord`]s, newest first. It is
//! shared by every request the server handles, so each operation takes a single
//! lock for its whole duration: no caller ever observes a half-inserted record
//! or a length above the capacity.

use areacheck_common::protocol::EvaluationRecord;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of records kept.
pub const MAX_HISTORY: usize = 200;

/// Thread-safe, bounded, newest-first log of evaluation records.
///
/// Share it between handlers with `Arc<HistoryLedger>`.
#[derive(Debug)]
pub struct HistoryLedger {
    entries: Mutex<VecDeque<EvaluationRecord>>,
    capacity: usize,
}

impl HistoryLedger {
    /// Creates an empty ledger holding up to [`MAX_HISTORY`] records.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// Creates an empty ledger with a custom bound (at least one record).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a record at the front, evicting the oldest ones past capacity.
    pub fn record(&self, item: EvaluationRecord) {
        let mut entries = self.entries();
        Self::push_bounded(&mut entries, item, self.capacity);
    }

    /// Inserts a record and returns the resulting contents in one step.
    ///
    /// The returned history always starts with `item`.
    pub fn record_and_snapshot(&self, item: EvaluationRecord) -> Vec<EvaluationRecord> {
        let mut entries = self.entries();
        Self::push_bounded(&mut entries, item, self.capacity);
        entries.iter().cloned().collect()
    }

    /// Returns an independent copy of the contents, newest first.
    pub fn snapshot(&self) -> Vec<EvaluationRecord> {
        self.entries().iter().cloned().collect()
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn push_bounded(entries: &mut VecDeque<EvaluationRecord>, item: EvaluationRecord, capacity: usize) {
        entries.push_front(item);
        while entries.len() > capacity {
            entries.pop_back();
        }
    }

    // Every mutation completes before the guard drops, so a poisoned lock
    // still guards a consistent deque.
    fn entries(&self) -> MutexGuard<'_, VecDeque<EvaluationRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
