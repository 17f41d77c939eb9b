//! Bounded-concurrency validation scheduler.
//!
//! The scheduler runs [`crate::classifier::validate`] once per reference on
//! the tokio runtime. A counting semaphore caps the number of tasks in flight,
//! dispatch waits for a free slot before spawning, and `validate_all` joins
//! every task before returning.

pub mod metrics;
pub mod runner;
pub mod types;

pub use metrics::SchedulerMetrics;
pub use runner::Scheduler;
pub use types::{PassOutcome, SchedulerConfig, ValidationPass};
