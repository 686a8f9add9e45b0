//! Collections of completed orders.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::Item;

/// Accumulates completed orders from many workers.
///
/// `record` must never lose an append under concurrent callers. The count
/// methods are diagnostics the coordinator reads once every worker is joined.
pub trait ResultSink: Send + Sync {
    fn record(&self, item: Item);

    /// Records a batch of orders. Used to merge per-worker buffers at join time.
    fn record_all(&self, items: &[Item]) {
        for &item in items {
            self.record(item);
        }
    }

    fn count(&self) -> usize;

    fn unique_count(&self) -> usize;

    fn duplicate_count(&self) -> usize {
        self.count().saturating_sub(self.unique_count())
    }

    /// Copy of every recorded order, in recording order.
    fn snapshot(&self) -> Vec<Item>;
}

/// Mutex-guarded append-only list of completed orders.
#[derive(Debug, Default)]
pub struct LockedSink {
    completed: Mutex<Vec<Item>>,
}

impl LockedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            completed: Mutex::new(Vec::with_capacity(capacity)),
        }
    }
}

impl ResultSink for LockedSink {
    fn record(&self, item: Item) {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }

    // One lock acquisition for the whole batch.
    fn record_all(&self, items: &[Item]) {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(items);
    }

    fn count(&self) -> usize {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn unique_count(&self) -> usize {
        let completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
        completed.iter().collect::<HashSet<_>>().len()
    }

    fn snapshot(&self) -> Vec<Item> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn counts_duplicates() {
        let sink = LockedSink::new();
        for item in [1, 2, 2, 3, 3, 3] {
            sink.record(item);
        }
        assert_eq!(sink.count(), 6);
        assert_eq!(sink.unique_count(), 3);
        assert_eq!(sink.duplicate_count(), 3);
    }

    #[test]
    fn empty_sink_is_all_zero() {
        let sink = LockedSink::new();
        assert_eq!(sink.count(), 0);
        assert_eq!(sink.unique_count(), 0);
        assert_eq!(sink.duplicate_count(), 0);
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn record_all_appends_in_order() {
        let sink = LockedSink::with_capacity(4);
        sink.record(9);
        sink.record_all(&[1, 2, 3]);
        assert_eq!(sink.snapshot(), vec![9, 1, 2, 3]);
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let sink = Arc::new(LockedSink::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for i in 0..1_000 {
                        sink.record(t * 1_000 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.count(), 8_000);
        assert_eq!(sink.unique_count(), 8_000);
        assert_eq!(sink.duplicate_count(), 0);
    }
}
