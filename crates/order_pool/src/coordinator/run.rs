//! src/coordinator/run.rs
//!
//! The synchronized coordinator: fills the queue, spawns the workers, joins
//! them and reports.
//!
//! # Run Overview
//!
//! 1. Validate the configuration (`num_workers >= 1`).
//! 2. Push orders `0..num_items` into a queue built by `config.claim`.
//! 3. Spawn `num_workers` threads sharing that queue and one `LockedSink`.
//! 4. Join every worker unconditionally. Under `RecordStrategy::LocalMerge`
//!    the per-worker buffers are merged into the sink here.
//! 5. Read the queue and sink into a `Report`.
//!
//! For full reproducibility of processing delays set `config.seed`; the set
//! of completed orders is the same for every run regardless.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, trace, warn};

use super::common::thread::init_worker_rng;
use super::config::{PoolConfig, RecordStrategy};
use super::workers::pool::WorkerPool;
use super::workers::worker::{Deposit, Worker};
use super::workers::WorkerStats;
use crate::report::Report;
use crate::sink::{LockedSink, ResultSink};
use crate::Item;

/// Everything observed at the end of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: Report,
    /// Per-worker statistics, ordered by worker ID
    pub workers: Vec<WorkerStats>,
    /// Every completion recorded, in sink order
    pub completed: Vec<Item>,
}

/// Runs a synchronized order pool to completion.
///
/// # Thread safety:
/// - The queue and sink are shared through `Arc`; their critical sections
///   cover a single claim or a single append.
/// - Processing delays run outside every lock.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: PoolConfig,
}

impl Coordinator {
    /// Creates a coordinator for `config`.
    ///
    /// # Errors
    /// - `PoolError::NoWorkers` if `num_workers` is 0
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Runs the pool and returns only the final counts.
    pub fn run(&self) -> Result<Report> {
        self.execute().map(|summary| summary.report)
    }

    /// Runs the pool and returns the report together with per-worker stats
    /// and the raw completion list.
    pub fn execute(&self) -> Result<RunSummary> {
        let config = &self.config;

        let queue = config.claim.build_queue(config.num_items);
        for item in 0..config.num_items as Item {
            queue
                .push(item)
                .with_context(|| format!("Failed to enqueue order {}", item))?;
            trace!(order = item, "order received");
        }
        let sink = Arc::new(LockedSink::with_capacity(config.num_items));

        info!(
            workers = config.num_workers,
            orders = config.num_items,
            claim = ?config.claim,
            record = ?config.record,
            "starting order pool"
        );

        let record = config.record;
        let max_delay = config.max_delay;
        let seed = config.seed;
        let worker_queue = queue.clone();
        let worker_sink: Arc<dyn ResultSink> = sink.clone();

        let pool = WorkerPool::spawn(config.num_workers, move |worker_id| {
            if let Some(seed) = seed {
                init_worker_rng(worker_id, seed);
            }
            let deposit = match record {
                RecordStrategy::Locked => Deposit::Shared(worker_sink.clone()),
                RecordStrategy::LocalMerge => Deposit::Local(Vec::new()),
            };
            Worker::new(worker_id, worker_queue.clone(), deposit, max_delay).run()
        })?;

        let mut workers = pool.join().context("Order pool did not shut down cleanly")?;
        workers.sort_by_key(|stats| stats.worker_id);

        for stats in &workers {
            sink.record_all(&stats.local);
        }

        let report = Report::collect(queue.as_ref(), sink.as_ref());
        info!(
            remaining = report.remaining_in_queue,
            total = report.total_completed,
            unique = report.unique_completed,
            duplicates = report.duplicate_count,
            "order pool finished"
        );
        for violation in report.violations(config.num_items) {
            warn!(%violation, "synchronized run is inconsistent");
        }

        Ok(RunSummary {
            report,
            workers,
            completed: sink.snapshot(),
        })
    }
}

/// Runs `num_items` orders through `num_workers` workers with default
/// settings for everything else.
pub fn run(num_items: usize, num_workers: usize) -> Result<Report> {
    let config = PoolConfig::builder()
        .num_items(num_items)
        .num_workers(num_workers)
        .build();
    Coordinator::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::config::ClaimStrategy;
    use crate::error::PoolError;
    use std::time::Duration;

    fn quick(workers: usize, items: usize) -> PoolConfig {
        PoolConfig::builder()
            .num_workers(workers)
            .num_items(items)
            .max_delay(Duration::ZERO)
            .build()
    }

    #[test]
    fn rejects_zero_workers() {
        let err = Coordinator::new(quick(0, 10)).unwrap_err();
        assert_eq!(err.downcast_ref::<PoolError>(), Some(&PoolError::NoWorkers));
    }

    #[test]
    fn free_function_rejects_zero_workers() {
        assert!(run(10, 0).is_err());
    }

    #[test]
    fn zero_orders_report_all_zero() -> Result<()> {
        // The one-second default delay would only matter if an order existed.
        assert_eq!(run(0, 4)?, Report::default());
        Ok(())
    }

    #[test]
    fn workers_are_sorted_and_account_for_every_order() -> Result<()> {
        let summary = Coordinator::new(quick(4, 200))?.execute()?;

        let ids: Vec<_> = summary.workers.iter().map(|w| w.worker_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        let processed: usize = summary.workers.iter().map(|w| w.processed).sum();
        assert_eq!(processed, 200);
        assert!(summary.report.is_consistent(200));
        Ok(())
    }

    #[test]
    fn local_merge_fills_sink_after_join() -> Result<()> {
        let config = PoolConfig {
            record: RecordStrategy::LocalMerge,
            claim: ClaimStrategy::LockFree,
            ..quick(3, 50)
        };
        let summary = Coordinator::new(config)?.execute()?;

        let mut completed = summary.completed.clone();
        completed.sort_unstable();
        assert_eq!(completed, (0..50).collect::<Vec<Item>>());
        assert!(summary.report.is_consistent(50));
        Ok(())
    }
}
