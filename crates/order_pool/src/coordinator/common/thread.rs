//! Thread-local storage for worker identification.
//!
//! Provides a thread-local worker ID and delay generator so each worker can
//! identify itself in log events and draw a reproducible stream of simulated
//! processing delays.

use rand::rngs::StdRng;
use rand::Rng as _;
use rand::SeedableRng;
use std::cell::RefCell;
use std::time::Duration;

thread_local! {
    /// Thread-local worker ID.
    ///
    /// Each worker thread is assigned a unique ID (0 to num_workers-1) when spawned.
    pub static WORKER_ID: RefCell<usize> = RefCell::new(0);

    /// Thread-local RNG for deterministic processing delays in workers
    pub static WORKER_RNG: RefCell<Option<StdRng>> = RefCell::new(None);
}

/// Returns the ID of the worker running on this thread.
#[cfg(test)]
pub(crate) fn current_worker_id() -> usize {
    WORKER_ID.with(|id| *id.borrow())
}

/// Initialize worker's RNG based on worker_id and base seed.
/// Seed formula: base_seed + worker_id
pub fn init_worker_rng(worker_id: usize, base_seed: u64) {
    WORKER_RNG.with(|rng| {
        let seed = base_seed.wrapping_add(worker_id as u64);
        *rng.borrow_mut() = Some(StdRng::seed_from_u64(seed));
    })
}

/// Draw a delay uniformly from `[0, max)` using the worker RNG, or the
/// thread RNG if the worker was not seeded.
pub fn worker_delay(max: Duration) -> Duration {
    let max_nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if max_nanos == 0 {
        return Duration::ZERO;
    }

    let nanos = WORKER_RNG.with(|rng| {
        let mut rng_ref = rng.borrow_mut();
        match rng_ref.as_mut() {
            Some(rng) => rng.random_range(0..max_nanos),
            None => rand::rng().random_range(0..max_nanos),
        }
    });
    Duration::from_nanos(nanos)
}
