use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type EntityId = u64;

/// Entity registry keyed by identifier. Owned by the caller, read-only
/// while a validation pass is running.
pub type EntityRegistry = HashMap<EntityId, Entity>;

/// Split target → ordered successor entities it resolved into.
pub type SplitMap = HashMap<EntityId, Vec<EntityId>>;

/// Identity state of an entity.
///
/// The label set is open-ended: anything that is not one of the known labels
/// is kept verbatim in [`EntityState::Other`]. Labels are case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityState {
    Defined,
    Split,
    Merged,
    ObserverRelative,
    Collapsed,
    Other(String),
}

impl EntityState {
    pub fn as_str(&self) -> &str {
        match self {
            EntityState::Defined => "Defined",
            EntityState::Split => "Split",
            EntityState::Merged => "Merged",
            EntityState::ObserverRelative => "ObserverRelative",
            EntityState::Collapsed => "Collapsed",
            EntityState::Other(label) => label,
        }
    }
}

impl From<&str> for EntityState {
    fn from(label: &str) -> Self {
        match label {
            "Defined" => EntityState::Defined,
            "Split" => EntityState::Split,
            "Merged" => EntityState::Merged,
            "ObserverRelative" => EntityState::ObserverRelative,
            "Collapsed" => EntityState::Collapsed,
            other => EntityState::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityState {
    fn from(label: String) -> Self {
        match EntityState::from(label.as_str()) {
            EntityState::Other(_) => EntityState::Other(label),
            known => known,
        }
    }
}

impl From<EntityState> for String {
    fn from(state: EntityState) -> Self {
        match state {
            EntityState::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked object whose identity may change over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub state: EntityState,
    /// Depth/generation marker. Informational only.
    #[serde(default)]
    pub layer: i32,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, state: impl Into<EntityState>, layer: i32) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.into(),
            layer,
        }
    }
}

/// Build a registry keyed by each entity's own id. Later duplicates win.
pub fn registry_from<I>(entities: I) -> EntityRegistry
where
    I: IntoIterator<Item = Entity>,
{
    entities.into_iter().map(|e| (e.id, e)).collect()
}
