use refguard_core::{Reference, ReferenceId};

/// Errors surfaced by the validation engine.
///
/// Classification itself cannot fail. A cancelled pass is not an error
/// either; it comes back as [`crate::PassOutcome::Incomplete`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid scheduler configuration: {0}")]
    Config(String),
    /// `references` holds every reference that came back from its task, in
    /// submission order, so one failure does not cost the caller the rest.
    #[error("Classification task failed for references {reference_ids:?}: {reason}")]
    TaskFailed {
        reference_ids: Vec<ReferenceId>,
        reason: String,
        references: Vec<Reference>,
    },
    #[error("Pass accounting mismatch: submitted {submitted}, validated {validated}, unprocessed {unprocessed}")]
    Accounting {
        submitted: usize,
        validated: usize,
        unprocessed: usize,
    },
}
