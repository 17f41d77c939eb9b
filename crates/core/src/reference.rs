use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Caller-assigned reference identifier.
pub type ReferenceId = u64;

/// Integrity outcome of a reference. A tag set; variant order carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrityStatus {
    Valid,
    IdentityChanged,
    /// Reserved. No classification currently produces it.
    IdentitySplit,
    IdentityMerged,
    Invalidated,
    Unresolved,
    ObserverRelative,
}

impl IntegrityStatus {
    pub const ALL: [IntegrityStatus; 7] = [
        IntegrityStatus::Valid,
        IntegrityStatus::IdentityChanged,
        IntegrityStatus::IdentitySplit,
        IntegrityStatus::IdentityMerged,
        IntegrityStatus::Invalidated,
        IntegrityStatus::Unresolved,
        IntegrityStatus::ObserverRelative,
    ];
}

impl std::fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityStatus::Valid => write!(f, "Valid"),
            IntegrityStatus::IdentityChanged => write!(f, "IdentityChanged"),
            IntegrityStatus::IdentitySplit => write!(f, "IdentitySplit"),
            IntegrityStatus::IdentityMerged => write!(f, "IdentityMerged"),
            IntegrityStatus::Invalidated => write!(f, "Invalidated"),
            IntegrityStatus::Unresolved => write!(f, "Unresolved"),
            IntegrityStatus::ObserverRelative => write!(f, "ObserverRelative"),
        }
    }
}

/// A directed link from a source entity to a target entity.
///
/// `status`, `candidate_ids` and `last_validated` are output fields: blank
/// until the first validation, overwritten by every later one. Only the task
/// that owns the value during a pass writes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: ReferenceId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    #[serde(default)]
    pub status: Option<IntegrityStatus>,
    /// Successor candidates, only populated for [`IntegrityStatus::Unresolved`].
    #[serde(default)]
    pub candidate_ids: Vec<EntityId>,
    #[serde(default)]
    pub last_validated: Option<DateTime<Utc>>,
}

impl Reference {
    pub fn new(id: ReferenceId, source_id: EntityId, target_id: EntityId) -> Self {
        Self {
            id,
            source_id,
            target_id,
            status: None,
            candidate_ids: Vec::new(),
            last_validated: None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.status.is_some()
    }

    /// Record a validation result. The status is written before the stamp.
    pub fn record(&mut self, status: IntegrityStatus, candidates: Vec<EntityId>, now: DateTime<Utc>) {
        self.status = Some(status);
        self.candidate_ids = candidates;
        self.stamp(now);
    }

    /// Advance `last_validated`. If the clock has not moved past the previous
    /// stamp, the new one lands a nanosecond after it. A stamp already at the
    /// latest representable time stays there.
    fn stamp(&mut self, now: DateTime<Utc>) {
        let next = match self.last_validated {
            Some(prev) if now <= prev => prev
                .checked_add_signed(Duration::nanoseconds(1))
                .unwrap_or(prev),
            _ => now,
        };
        self.last_validated = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reference_is_blank() {
        let r = Reference::new(1, 2, 3);
        assert!(!r.is_validated());
        assert!(r.candidate_ids.is_empty());
        assert!(r.last_validated.is_none());
    }

    #[test]
    fn record_overwrites_previous_result() {
        let mut r = Reference::new(1, 2, 3);
        r.record(IntegrityStatus::Unresolved, vec![4, 5], Utc::now());
        r.record(IntegrityStatus::Valid, Vec::new(), Utc::now());

        assert_eq!(r.status, Some(IntegrityStatus::Valid));
        assert!(r.candidate_ids.is_empty());
    }

    #[test]
    fn stamp_advances_even_when_clock_stalls() {
        let mut r = Reference::new(1, 2, 3);
        let frozen = Utc::now();

        r.record(IntegrityStatus::Valid, Vec::new(), frozen);
        let first = r.last_validated.unwrap();
        r.record(IntegrityStatus::Valid, Vec::new(), frozen);
        let second = r.last_validated.unwrap();

        assert_eq!(first, frozen);
        assert!(second > first);
    }

    #[test]
    fn stamp_never_moves_backwards() {
        let mut r = Reference::new(1, 2, 3);
        let later = Utc::now();
        let earlier = later - Duration::seconds(5);

        r.record(IntegrityStatus::Valid, Vec::new(), later);
        r.record(IntegrityStatus::Valid, Vec::new(), earlier);
        assert!(r.last_validated.unwrap() > later);
    }

    #[test]
    fn stamp_saturates_at_max_datetime() {
        let mut r = Reference::new(1, 2, 3);
        r.last_validated = Some(DateTime::<Utc>::MAX_UTC);

        r.record(IntegrityStatus::Invalidated, Vec::new(), Utc::now());
        assert_eq!(r.status, Some(IntegrityStatus::Invalidated));
        assert_eq!(r.last_validated, Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn status_display_matches_variant_names() {
        let names: Vec<String> = IntegrityStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Valid",
                "IdentityChanged",
                "IdentitySplit",
                "IdentityMerged",
                "Invalidated",
                "Unresolved",
                "ObserverRelative",
            ]
        );
    }

    #[test]
    fn reference_deserializes_without_output_fields() {
        let r: Reference = serde_json::from_str(r#"{"id":1,"source_id":2,"target_id":3}"#).unwrap();
        assert_eq!(r, Reference::new(1, 2, 3));
    }
}
