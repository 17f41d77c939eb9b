//! Validation scheduler runner -- admission-gated dispatch and the join barrier.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructor, shutdown signal, and accessor methods
//! - `execution`: `validate_all` dispatch loop, in-flight tracking, and join

mod core;
mod execution;

pub use self::core::Scheduler;
