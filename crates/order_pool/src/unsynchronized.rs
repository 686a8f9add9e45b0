//! Deliberately racy order pool. Negative control only.
//!
//! **Never use this for real work.** It exists so tests can prove that the
//! race it contains is actually detected by a [`Report`].
//!
//! Every individual access below is memory-safe, but the compound operations
//! are split across separate lock acquisitions, which reproduces two classic
//! logic races:
//!
//! - **Check-then-act on the queue**: a worker checks `is_empty`, then peeks
//!   the front order, processes it, and only afterwards removes it by value.
//!   Workers that peek before the removal all process the same order.
//! - **Lost update on the sink**: `record` copies the list, appends locally,
//!   and writes the copy back. Concurrent writers overwrite each other.
//!
//! The synchronized pool in [`crate::coordinator`] replaces both with a single
//! atomic claim and a single guarded append.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tracing::{debug, info, warn};

use crate::coordinator::common::thread::{init_worker_rng, worker_delay};
use crate::coordinator::workers::pool::WorkerPool;
use crate::coordinator::workers::WorkerStats;
use crate::coordinator::{PoolConfig, RunSummary};
use crate::report::Report;
use crate::Item;

/// Queue whose emptiness check, read and removal are three separate steps.
#[derive(Debug, Default)]
pub struct RacyQueue {
    pending: Mutex<Vec<Item>>,
}

impl RacyQueue {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            pending: Mutex::new(items.into_iter().collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Reads the front order without removing it.
    pub fn peek_front(&self) -> Option<Item> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .copied()
    }

    /// Removes every pending occurrence of `item`.
    pub fn remove(&self, item: Item) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|&pending| pending != item);
    }

    pub fn size(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Sink whose append is a read-copy-write across two lock acquisitions.
#[derive(Debug, Default)]
pub struct RacySink {
    completed: Mutex<Vec<Item>>,
}

impl RacySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, item: Item) {
        let mut copy = self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        // Widen the window between read and write-back.
        thread::yield_now();
        copy.push(item);
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner) = copy;
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn racy_worker(
    worker_id: usize,
    queue: &RacyQueue,
    sink: &RacySink,
    config: &PoolConfig,
) -> WorkerStats {
    if let Some(seed) = config.seed {
        init_worker_rng(worker_id, seed);
    }
    debug!(worker = worker_id, "racy worker ready for orders");

    let mut processed = 0;
    while !queue.is_empty() {
        let Some(item) = queue.peek_front() else {
            break;
        };

        debug!(worker = worker_id, order = item, "preparing order");
        let delay = worker_delay(config.max_delay);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        debug!(worker = worker_id, order = item, "finished order");

        sink.record(item);
        queue.remove(item);
        processed += 1;
    }

    WorkerStats {
        worker_id,
        processed,
        local: Vec::new(),
    }
}

/// Runs the racy pool. `config.claim` and `config.record` are ignored.
///
/// The returned report is expected to be inconsistent under load.
pub fn run_unsynchronized(config: &PoolConfig) -> Result<RunSummary> {
    config.validate()?;
    warn!(
        workers = config.num_workers,
        orders = config.num_items,
        "running UNSYNCHRONIZED order pool; results are not trustworthy"
    );

    let queue = Arc::new(RacyQueue::new(0..config.num_items as Item));
    let sink = Arc::new(RacySink::new());

    let worker_queue = queue.clone();
    let worker_sink = sink.clone();
    let worker_config = config.clone();
    let pool = WorkerPool::spawn(config.num_workers, move |worker_id| {
        racy_worker(worker_id, &worker_queue, &worker_sink, &worker_config)
    })?;

    let mut workers = pool
        .join()
        .context("Unsynchronized pool did not shut down cleanly")?;
    workers.sort_by_key(|stats| stats.worker_id);

    let completed = sink.snapshot();
    let report = Report::from_completions(queue.size(), &completed);
    info!(
        remaining = report.remaining_in_queue,
        total = report.total_completed,
        unique = report.unique_completed,
        duplicates = report.duplicate_count,
        distinct_workers_busy = workers.iter().filter(|w| w.processed > 0).count(),
        "unsynchronized pool finished"
    );

    Ok(RunSummary {
        report,
        workers,
        completed,
    })
}

/// Number of distinct orders in `completed` that more than one worker recorded.
pub fn duplicated_orders(completed: &[Item]) -> usize {
    let mut seen = HashSet::new();
    let mut repeated = HashSet::new();
    for &item in completed {
        if !seen.insert(item) {
            repeated.insert(item);
        }
    }
    repeated.len()
}
