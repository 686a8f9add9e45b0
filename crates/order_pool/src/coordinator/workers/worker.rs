//! src/coordinator/workers/worker.rs
//!
//! The claim → process → deposit loop run by every synchronized worker.
//!
//! The only shared-state operations are `WorkQueue::try_claim` and
//! `ResultSink::record`. The simulated processing delay runs between them,
//! outside any critical section.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

use super::{WorkerState, WorkerStats};
use crate::coordinator::common::thread::worker_delay;
use crate::queue::WorkQueue;
use crate::sink::ResultSink;
use crate::Item;

/// Where a worker deposits completed orders.
pub(crate) enum Deposit {
    /// Straight into the shared sink, one lock acquisition per order.
    Shared(Arc<dyn ResultSink>),
    /// Into a private buffer handed back to the coordinator at `Done`.
    Local(Vec<Item>),
}

pub(crate) struct Worker {
    id: usize,
    queue: Arc<dyn WorkQueue>,
    deposit: Deposit,
    max_delay: Duration,
    state: WorkerState,
    processed: usize,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        queue: Arc<dyn WorkQueue>,
        deposit: Deposit,
        max_delay: Duration,
    ) -> Self {
        Self {
            id,
            queue,
            deposit,
            max_delay,
            state: WorkerState::Ready,
            processed: 0,
        }
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "worker {}: invalid transition {:?} -> {:?}",
            self.id,
            self.state,
            next
        );
        trace!(worker = self.id, from = ?self.state, to = ?next, "worker state change");
        self.state = next;
    }

    /// Drains the queue until a claim comes back empty.
    pub(crate) fn run(mut self) -> WorkerStats {
        self.transition(WorkerState::Running);
        debug!(worker = self.id, "worker ready for orders");

        loop {
            self.transition(WorkerState::Claiming);
            let Some(item) = self.queue.try_claim() else {
                break;
            };

            self.transition(WorkerState::Processing(item));
            debug!(worker = self.id, order = item, "preparing order");
            let delay = worker_delay(self.max_delay);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            debug!(worker = self.id, order = item, "finished order");

            self.complete(item);
        }

        self.transition(WorkerState::Done);
        debug!(worker = self.id, processed = self.processed, "worker done");

        let local = match self.deposit {
            Deposit::Local(buffer) => buffer,
            Deposit::Shared(_) => Vec::new(),
        };
        WorkerStats {
            worker_id: self.id,
            processed: self.processed,
            local,
        }
    }

    fn complete(&mut self, item: Item) {
        match &mut self.deposit {
            Deposit::Shared(sink) => sink.record(item),
            Deposit::Local(buffer) => buffer.push(item),
        }
        self.processed += 1;
    }
}
