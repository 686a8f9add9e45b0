pub mod coordinator;
pub mod error;
pub mod queue;
pub mod report;
pub mod sink;
pub mod unsynchronized;

/// Opaque order identifier, unique within a run and produced as `0..N`.
pub type Item = u64;

pub use coordinator::{run, ClaimStrategy, Coordinator, PoolConfig, RecordStrategy, RunSummary};
pub use error::PoolError;
pub use queue::{LockFreeQueue, LockedQueue, WorkQueue};
pub use report::{Report, Violation};
pub use sink::{LockedSink, ResultSink};
