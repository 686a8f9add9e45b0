//! Typed errors raised by the order pool.
//!
//! Correctness violations (lost or duplicated orders) are never errors: they
//! only show up in the counts of a [`Report`](crate::report::Report). The
//! variants here cover configuration and runtime failures.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A pool needs at least one worker to drain its queue.
    #[error("cannot run an order pool with 0 workers")]
    NoWorkers,

    /// A bounded queue rejected a push.
    #[error("work queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// A worker thread panicked before it reached `Done`.
    #[error("worker {worker_id} panicked before finishing")]
    WorkerPanicked { worker_id: usize },
}
