use std::path::Path;
use std::sync::Arc;

use refguard_core::{registry_from, Entity, EntityRegistry, Reference, RefguardError, SplitMap};
use serde::Deserialize;

/// Input file for `refguard validate`.
///
/// ```json
/// {
///   "entities": [{"id": 1, "name": "the man", "state": "Split", "layer": 0}],
///   "split_map": {"1": [3, 4]},
///   "references": [{"id": 1, "source_id": 2, "target_id": 1}]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub split_map: SplitMap,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, RefguardError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Split into the shared, read-only inputs of a validation pass.
    pub fn into_parts(self) -> (Vec<Reference>, Arc<EntityRegistry>, Arc<SplitMap>) {
        (
            self.references,
            Arc::new(registry_from(self.entities)),
            Arc::new(self.split_map),
        )
    }
}

/// Built-in scenario: "the man" (1) is split into two
/// aspects (3, 4) after the voice (2) started referring to him.
pub fn demo() -> Dataset {
    Dataset {
        entities: vec![
            Entity::new(1, "the man", "Defined", 0),
            Entity::new(2, "the voice", "Defined", 1),
            Entity::new(3, "the man (aspect A)", "Split", 2),
            Entity::new(4, "the man (aspect B)", "Split", 2),
        ],
        split_map: SplitMap::from([(1, vec![3, 4])]),
        references: vec![Reference::new(1, 2, 1)],
    }
}
