//! src/coordinator/mod.rs
//!
//! This module implements the synchronized order pool.
//!
//! The `Coordinator` fills a shared `WorkQueue`, starts a fixed number of
//! worker threads that drain it into a shared `ResultSink`, joins them, and
//! reports the final counts.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌─────────────┐
//!                  │ Coordinator │ ←───── PoolConfig (workers, orders, delay, seed)
//!                  └──────┬──────┘
//!                         │ pushes 0..num_items
//!                         ↓
//!                   ┌───────────┐
//!                   │ WorkQueue │ (Locked or LockFree)
//!                   └─────┬─────┘
//!                         │ try_claim (atomic)
//!                         ↓
//!                 [Worker Threads] claim → process (random delay) → deposit
//!                         │
//!                         │ record (atomic) or local buffer
//!                         ↓
//!                   ┌────────────┐
//!                   │ ResultSink │
//!                   └─────┬──────┘
//!                         │ after join
//!                         ↓
//!                    ┌────────┐
//!                    │ Report │ (remaining, total, unique, duplicates)
//!                    └────────┘
//! ```
//!
//! # Module Structure
//!
//! ```text
//! src/coordinator/
//! ├── mod.rs          # Public API exports + module-level architecture docs
//! ├── config.rs       # PoolConfig, builder, strategies, validation
//! ├── run.rs          # Coordinator, RunSummary and the `run` entry point
//! ├── workers/
//! │   ├── mod.rs      # WorkerState lifecycle and WorkerStats
//! │   ├── pool.rs     # Generic `WorkerPool<Output>` spawn/join
//! │   └── worker.rs   # The claim/process/deposit loop
//! └── common/
//!     ├── mod.rs
//!     └── thread.rs   # Thread-local worker ID and delay RNG
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! let config = PoolConfig::builder()
//!     .num_workers(5)
//!     .num_items(100)
//!     .max_delay(Duration::from_millis(10))
//!     .seed(42)
//!     .build();
//!
//! let report = Coordinator::new(config)?.run()?;
//! assert!(report.is_consistent(100));
//! ```
//!
//! # Choosing strategies
//! - `ClaimStrategy::Locked` is the straightforward mutex-guarded claim.
//! - `ClaimStrategy::LockFree` avoids the lock at the cost of a fixed capacity.
//! - `RecordStrategy::LocalMerge` removes sink contention; duplicates can only
//!   be detected after the merge.

// Module declarations
pub(crate) mod common;
mod config;
mod run;
pub(crate) mod workers;

// Public re-exports
pub use config::{ClaimStrategy, PoolConfig, PoolConfigBuilder, RecordStrategy};
pub use run::{run, Coordinator, RunSummary};
pub use workers::{WorkerState, WorkerStats};

pub use common::thread::{init_worker_rng, worker_delay, WORKER_ID, WORKER_RNG};
