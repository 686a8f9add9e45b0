//! Shared queues of pending orders.
//!
//! Every implementation exposes a single atomic claim: the emptiness check
//! and the removal happen in one step, so two workers can never walk away
//! with the same order.

use crossbeam_queue::ArrayQueue;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::PoolError;
use crate::Item;

/// A queue of pending orders shared by every worker in a pool.
///
/// # Method
/// - `push(item)`: enqueue an order.
/// - `try_claim()`: remove and return the front order, or `None` when empty.
///    Never blocks. Concurrent callers never receive the same order.
/// - `size()`: number of pending orders. Only meant for diagnostics after a
///    run, never for control decisions.
///
/// Implementations must be `Send + Sync` so one instance can be shared across
/// worker threads behind an `Arc`.
pub trait WorkQueue: Send + Sync {
    fn push(&self, item: Item) -> Result<(), PoolError>;

    fn try_claim(&self) -> Option<Item>;

    fn size(&self) -> usize;
}

/// ============================================================================
/// Mutex-guarded FIFO queue.
///
/// The critical section covers exactly one `pop_front`, so the claim is atomic
/// and the lock is never held while an order is being processed.
#[derive(Debug, Default)]
pub struct LockedQueue {
    pending: Mutex<VecDeque<Item>>,
}

impl LockedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl WorkQueue for LockedQueue {
    fn push(&self, item: Item) -> Result<(), PoolError> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
        Ok(())
    }

    fn try_claim(&self) -> Option<Item> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn size(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// ============================================================================
/// Lock-free bounded queue backed by `crossbeam_queue::ArrayQueue`.
///
/// Claims are a single CAS-based `pop`. The capacity is fixed at construction,
/// which matches a run where every order exists before the workers start.
#[derive(Debug)]
pub struct LockFreeQueue {
    pending: ArrayQueue<Item>,
}

impl LockFreeQueue {
    /// Creates a queue that holds up to `capacity` orders.
    ///
    /// `ArrayQueue` rejects a zero capacity, so an empty run still gets one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: ArrayQueue::new(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.pending.capacity()
    }
}

impl WorkQueue for LockFreeQueue {
    fn push(&self, item: Item) -> Result<(), PoolError> {
        self.pending.push(item).map_err(|_| PoolError::QueueFull {
            capacity: self.pending.capacity(),
        })
    }

    fn try_claim(&self) -> Option<Item> {
        self.pending.pop()
    }

    fn size(&self) -> usize {
        self.pending.len()
    }
}

/// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn filled<Q: WorkQueue>(queue: Q, n: Item) -> Q {
        for item in 0..n {
            queue.push(item).unwrap();
        }
        queue
    }

    /// Drains `queue` from `threads` threads and returns every claimed order.
    fn drain_concurrently(queue: Arc<dyn WorkQueue>, threads: usize) -> Vec<Item> {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut claimed = Vec::new();
                    while let Some(item) = queue.try_claim() {
                        claimed.push(item);
                    }
                    claimed
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    }

    mod locked_queue_tests {
        use super::*;

        #[test]
        fn claims_in_fifo_order() {
            let queue = filled(LockedQueue::new(), 5);
            let claimed: Vec<_> = std::iter::from_fn(|| queue.try_claim()).collect();
            assert_eq!(claimed, vec![0, 1, 2, 3, 4]);
        }

        #[test]
        fn empty_claim_returns_none() {
            let queue = LockedQueue::new();
            assert_eq!(queue.try_claim(), None);
            assert_eq!(queue.try_claim(), None);
            assert_eq!(queue.size(), 0);
        }

        #[test]
        fn size_tracks_pending() {
            let queue = filled(LockedQueue::with_capacity(10), 10);
            assert_eq!(queue.size(), 10);
            queue.try_claim();
            queue.try_claim();
            assert_eq!(queue.size(), 8);
        }

        #[test]
        fn concurrent_claims_are_exactly_once() {
            let queue: Arc<dyn WorkQueue> = Arc::new(filled(LockedQueue::new(), 10_000));
            let claimed = drain_concurrently(queue.clone(), 8);

            assert_eq!(claimed.len(), 10_000);
            assert_eq!(HashSet::<_>::from_iter(&claimed).len(), 10_000);
            assert_eq!(queue.size(), 0);
        }
    }

    mod lock_free_queue_tests {
        use super::*;

        #[test]
        fn claims_in_fifo_order() {
            let queue = filled(LockFreeQueue::new(3), 3);
            assert_eq!(queue.try_claim(), Some(0));
            assert_eq!(queue.try_claim(), Some(1));
            assert_eq!(queue.try_claim(), Some(2));
            assert_eq!(queue.try_claim(), None);
        }

        #[test]
        fn zero_capacity_is_usable() {
            let queue = LockFreeQueue::new(0);
            assert_eq!(queue.capacity(), 1);
            assert_eq!(queue.try_claim(), None);
        }

        #[test]
        fn push_past_capacity_fails() {
            let queue = filled(LockFreeQueue::new(2), 2);
            assert_eq!(queue.push(2), Err(PoolError::QueueFull { capacity: 2 }));
            assert_eq!(queue.size(), 2);
        }

        #[test]
        fn concurrent_claims_are_exactly_once() {
            let queue: Arc<dyn WorkQueue> = Arc::new(filled(LockFreeQueue::new(10_000), 10_000));
            let claimed = drain_concurrently(queue.clone(), 8);

            assert_eq!(claimed.len(), 10_000);
            assert_eq!(HashSet::<_>::from_iter(&claimed).len(), 10_000);
            assert_eq!(queue.size(), 0);
        }
    }
}
