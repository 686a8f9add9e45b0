//! Worker pool implementation for draining a shared order queue.
//!
//! Spawns a fixed number of named OS threads, hands each one its worker ID,
//! and collects the value every worker returns when it reaches `Done`.
//!
//! # Key features
//! - Bounded output channel sized to the worker count, so a finishing
//!   worker never blocks on send
//! - Thread-local worker IDs for log events and RNG seeding
//! - Workers are always joined, including when spawning fails half-way
//! - Generic over the per-worker output type, shared by the synchronized
//!   and unsynchronized pools

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver};
use std::sync::Arc;
use std::thread;

use crate::coordinator::common::thread::WORKER_ID;
use crate::error::PoolError;

/// Fixed-size pool of worker threads.
///
/// # Type Parameters
/// - `Output`: Value each worker returns when it finishes
pub(crate) struct WorkerPool<Output> {
    workers: Vec<thread::JoinHandle<()>>,
    output_rx: Receiver<Output>,
}

impl<Output> WorkerPool<Output>
where
    Output: Send + 'static,
{
    /// Spawns `num_workers` threads, each running `worker_fn(worker_id)` once.
    pub(crate) fn spawn<F>(num_workers: usize, worker_fn: F) -> Result<Self>
    where
        F: Fn(usize) -> Output + Send + Sync + 'static,
    {
        if num_workers == 0 {
            return Err(PoolError::NoWorkers.into());
        }

        let (output_tx, output_rx) = bounded(num_workers);
        let worker_fn = Arc::new(worker_fn);

        // Built before spawning so that an early return still joins the
        // workers already started.
        let mut pool = Self {
            workers: Vec::with_capacity(num_workers),
            output_rx,
        };

        for worker_id in 0..num_workers {
            let output_tx = output_tx.clone();
            let worker_fn_clone = worker_fn.clone();

            let handle = thread::Builder::new()
                .name(format!("order-pool-worker-{}", worker_id))
                .spawn(move || {
                    WORKER_ID.with(|id| *id.borrow_mut() = worker_id);
                    let output = worker_fn_clone(worker_id);
                    // Capacity equals the worker count, so this never blocks.
                    let _ = output_tx.send(output);
                })
                .with_context(|| format!("Failed to spawn worker thread {}", worker_id))?;

            pool.workers.push(handle);
        }

        Ok(pool)
    }

    /// Blocks until every worker has finished and returns their outputs.
    ///
    /// Outputs arrive in completion order, not worker order.
    pub(crate) fn join(mut self) -> Result<Vec<Output>> {
        let mut panicked = None;
        for (worker_id, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                panicked.get_or_insert(worker_id);
            }
        }

        if let Some(worker_id) = panicked {
            return Err(PoolError::WorkerPanicked { worker_id }.into());
        }

        Ok(self.output_rx.try_iter().collect())
    }
}

impl<Output> Drop for WorkerPool<Output> {
    fn drop(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
