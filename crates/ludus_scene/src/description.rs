//! Declarative scene description types.
//!
//! A scene document is a recursively nested mapping from child name to
//! `{ components: { tag: config }, children: { … } }`, typically loaded
//! from a JSON file. The maps preserve document order; the build and
//! walk contracts treat that order as insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Raw configuration for one component, exactly as found in the
/// description document. Interpreted only by the component it
/// configures.
pub type ComponentConfig = serde_json::Value;

/// Description of a scene subtree: child name → entity description.
pub type SceneDesc = IndexMap<String, EntityDesc>;

/// Description of one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityDesc {
    /// Component type tag → raw component configuration.
    #[serde(default)]
    pub components: IndexMap<String, ComponentConfig>,
    /// Nested child descriptions.
    #[serde(default)]
    pub children: SceneDesc,
}

/// Parse a scene description from a JSON document.
///
/// The document must be fully materialised; nothing is streamed.
///
/// # Errors
///
/// Returns [`SceneError::Description`] if the document is not valid JSON
/// of the expected shape.
pub fn parse(json: &str) -> Result<SceneDesc, SceneError> {
    Ok(serde_json::from_str(json)?)
}
