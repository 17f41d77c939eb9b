//! Per-reference integrity classification.
//!
//! [`classify`] is a pure function of the reference's target, the entity
//! registry and the split map. [`validate`] applies the result to the
//! reference and stamps `last_validated`.

use chrono::Utc;
use refguard_core::{EntityId, EntityRegistry, EntityState, IntegrityStatus, Reference, SplitMap};
use serde::Serialize;
use tracing::debug;

/// Outcome of classifying one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: IntegrityStatus,
    /// Successor candidates. Non-empty only for [`IntegrityStatus::Unresolved`].
    pub candidates: Vec<EntityId>,
}

impl Classification {
    fn bare(status: IntegrityStatus) -> Self {
        Self {
            status,
            candidates: Vec::new(),
        }
    }
}

/// Classify a reference by the current state of its target.
///
/// Every input maps to exactly one status: a missing target is
/// `Invalidated`, an unrecognized state label is `IdentityChanged`.
pub fn classify(reference: &Reference, entities: &EntityRegistry, split_map: &SplitMap) -> Classification {
    let Some(target) = entities.get(&reference.target_id) else {
        return Classification::bare(IntegrityStatus::Invalidated);
    };

    match &target.state {
        EntityState::Split => Classification {
            status: IntegrityStatus::Unresolved,
            candidates: split_map.get(&target.id).cloned().unwrap_or_default(),
        },
        EntityState::Merged => Classification::bare(IntegrityStatus::IdentityMerged),
        EntityState::ObserverRelative => Classification::bare(IntegrityStatus::ObserverRelative),
        EntityState::Collapsed => Classification::bare(IntegrityStatus::Invalidated),
        EntityState::Defined => Classification::bare(IntegrityStatus::Valid),
        EntityState::Other(_) => Classification::bare(IntegrityStatus::IdentityChanged),
    }
}

/// Classify `reference` and write the result into its output fields.
pub fn validate(reference: &mut Reference, entities: &EntityRegistry, split_map: &SplitMap) -> IntegrityStatus {
    let Classification { status, candidates } = classify(reference, entities, split_map);
    debug!(
        reference = reference.id,
        target = reference.target_id,
        status = %status,
        candidates = candidates.len(),
        "classified reference"
    );
    reference.record(status, candidates, Utc::now());
    status
}
