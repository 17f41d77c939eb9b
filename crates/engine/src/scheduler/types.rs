use std::collections::HashMap;
use std::time::Duration;

use refguard_core::config::DEFAULT_MAX_CONCURRENCY;
use refguard_core::{EngineConfig, IntegrityStatus, Reference, ReferenceId};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::EngineError;

/// Scheduler configuration, typically built from [`EngineConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of classification tasks in flight at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize { DEFAULT_MAX_CONCURRENCY }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self { max_concurrency }
    }

    /// Reject limits the admission gate cannot honor.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_concurrency == 0 {
            return Err(EngineError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(EngineError::Config(format!(
                "max_concurrency {} exceeds the gate limit of {}",
                self.max_concurrency,
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

impl From<&EngineConfig> for SchedulerConfig {
    fn from(config: &EngineConfig) -> Self {
        Self::with_max_concurrency(config.max_concurrency)
    }
}

/// How a validation pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PassOutcome {
    /// Every submitted reference was classified.
    Complete,
    /// Dispatch stopped early on shutdown. The listed references were never
    /// dispatched and their output fields are untouched.
    Incomplete { unprocessed: Vec<ReferenceId> },
}

/// Result of one `validate_all` call.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationPass {
    /// The submitted references, in submission order.
    pub references: Vec<Reference>,
    pub outcome: PassOutcome,
    /// Number of references per status produced in this pass.
    pub status_counts: HashMap<IntegrityStatus, usize>,
    pub duration: Duration,
}

impl ValidationPass {
    pub fn is_complete(&self) -> bool {
        self.outcome == PassOutcome::Complete
    }

    pub fn unprocessed(&self) -> &[ReferenceId] {
        match &self.outcome {
            PassOutcome::Complete => &[],
            PassOutcome::Incomplete { unprocessed } => unprocessed,
        }
    }

    /// Number of references classified in this pass.
    pub fn validated(&self) -> usize {
        self.status_counts.values().sum()
    }

    pub fn count(&self, status: IntegrityStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}
