//! src/coordinator/common/mod.rs
//!
//! Utilities shared by the synchronized and unsynchronized pools.

pub mod thread;
