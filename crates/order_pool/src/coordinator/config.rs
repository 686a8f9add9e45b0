//! src/coordinator/config.rs
//!
//! Configuration for an order pool run.
//!
//! The `PoolConfig` struct stores the parameters that control how many
//! orders are created, how many workers drain them, and which shared
//! structures they go through.
//!
//! Example:
//! ```ignore
//! let config = PoolConfig::builder()
//!     .num_workers(8)
//!     .num_items(1_000)
//!     .max_delay(Duration::from_millis(5))
//!     .seed(42)
//!     .claim(ClaimStrategy::LockFree)
//!     .build();
//! ```
//!
//! # Performance considerations:
//! - `max_delay`: Processing runs outside every critical section, so longer
//!                delays raise parallelism rather than contention.
//! - `record`:    `LocalMerge` removes the sink lock from the hot path entirely,
//!                at the cost of detecting duplicates only after the merge.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PoolError;
use crate::queue::{LockFreeQueue, LockedQueue, WorkQueue};

/// How workers claim orders from the shared queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ClaimStrategy {
    /// `Mutex<VecDeque>`; one lock acquisition per claim.
    #[default]
    Locked,
    /// `crossbeam_queue::ArrayQueue`; one CAS-based pop per claim.
    LockFree,
}

impl ClaimStrategy {
    /// Creates an empty queue sized for `capacity` orders.
    pub(crate) fn build_queue(self, capacity: usize) -> Arc<dyn WorkQueue> {
        match self {
            ClaimStrategy::Locked => Arc::new(LockedQueue::with_capacity(capacity)),
            ClaimStrategy::LockFree => Arc::new(LockFreeQueue::new(capacity)),
        }
    }
}

/// How workers deposit completed orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordStrategy {
    /// Every completion goes straight into the shared, mutex-guarded sink.
    #[default]
    Locked,
    /// Each worker buffers its completions privately; buffers are merged
    /// into the sink once after join.
    LocalMerge,
}

/// Configuration for an order pool run
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads (must be >= 1)
    pub num_workers: usize,
    /// Number of orders created, identified `0..num_items`
    pub num_items: usize,
    /// Upper bound (exclusive) of the simulated processing delay.
    /// `Duration::ZERO` disables sleeping. Default: 1s
    pub max_delay: Duration,
    /// Base seed for per-worker delay streams. `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Queue implementation used for claims
    pub claim: ClaimStrategy,
    /// Sink implementation used for completions
    pub record: RecordStrategy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: 5,
            num_items: 100,
            max_delay: Duration::from_secs(1),
            seed: None,
            claim: ClaimStrategy::default(),
            record: RecordStrategy::default(),
        }
    }
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Rejects configurations no run can satisfy.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.num_workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        Ok(())
    }
}

/// Builder for PoolConfig with method chaining
#[derive(Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Set the number of workers
    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    /// Set the number of orders
    pub fn num_items(mut self, items: usize) -> Self {
        self.config.num_items = items;
        self
    }

    /// Set the upper bound of the processing delay.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.config.max_delay = max_delay;
        self
    }

    /// Set the base seed for reproducible processing delays.
    ///
    /// Worker `i` draws its delays from a generator seeded with `seed + i`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn claim(mut self, claim: ClaimStrategy) -> Self {
        self.config.claim = claim;
        self
    }

    pub fn record(mut self, record: RecordStrategy) -> Self {
        self.config.record = record;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> PoolConfig {
        self.config
    }
}
