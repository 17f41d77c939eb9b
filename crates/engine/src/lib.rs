pub mod classifier;
pub mod error;
pub mod scheduler;

use std::sync::Arc;

use refguard_core::{EntityRegistry, Reference, SplitMap};

pub use classifier::{classify, validate, Classification};
pub use error::EngineError;
pub use scheduler::{PassOutcome, Scheduler, SchedulerConfig, SchedulerMetrics, ValidationPass};

/// Run one validation pass on a fresh scheduler.
///
/// `max_concurrency` defaults to 64 when `None`; zero is rejected before
/// anything is dispatched.
pub async fn validate_all(
    references: Vec<Reference>,
    entities: Arc<EntityRegistry>,
    split_map: Arc<SplitMap>,
    max_concurrency: Option<usize>,
) -> Result<ValidationPass, EngineError> {
    let config = match max_concurrency {
        Some(n) => SchedulerConfig::with_max_concurrency(n),
        None => SchedulerConfig::default(),
    };
    Scheduler::new(config)?
        .validate_all(references, entities, split_map)
        .await
}
