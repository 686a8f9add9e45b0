//! Worker types for draining the order queue.
//!
//! This module provides the pieces of a multi-threaded run:
//! - `pool`: Fixed-size thread pool that spawns and joins workers
//! - `worker`: The claim → process → deposit loop
//!
//! Every worker follows the lifecycle described by `WorkerState`.

pub(crate) mod pool;
pub(crate) mod worker;

use crate::Item;

/// Lifecycle of a worker.
///
/// ```text
/// Ready → Running → Claiming ⇄ Processing
///                       │
///                       └→ Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, not yet started
    Ready,
    /// Started, about to enter the claim loop
    Running,
    /// Attempting to claim the next order
    Claiming,
    /// Holding a claimed order and simulating work on it
    Processing(Item),
    /// Observed an empty queue and exited the loop
    Done,
}

impl WorkerState {
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Ready, Running)
                | (Running, Claiming)
                | (Claiming, Processing(_))
                | (Claiming, Done)
                | (Processing(_), Claiming)
        )
    }
}

/// What a worker hands back to the coordinator when it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker_id: usize,
    /// Orders this worker claimed and completed
    pub processed: usize,
    /// Private completion buffer, only filled under `RecordStrategy::LocalMerge`
    pub local: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::WorkerState::*;

    #[test]
    fn valid_lifecycle_is_accepted() {
        let path = [Ready, Running, Claiming, Processing(3), Claiming, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!Ready.can_transition_to(Claiming));
        assert!(!Running.can_transition_to(Done));
        assert!(!Processing(1).can_transition_to(Done));
        assert!(!Done.can_transition_to(Claiming));
    }
}
