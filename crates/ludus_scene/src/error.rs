//! Scene-layer error types.

/// Errors that can occur while building or querying a scene.
///
/// Lookup misses (`Entity::component`, `Entity::child`,
/// `Scene::find_object`) are not errors; they return `None` and callers
/// are expected to check. Errors here are structural: construction
/// failures are fatal to the scene being built.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A component tag had no registered constructor.
    #[error("unknown component tag `{0}`")]
    UnknownTag(String),

    /// A component's asynchronous configuration failed. Fails the whole
    /// scene construction; no partial scene is exposed.
    #[error("component `{tag}` failed during setup: {reason}")]
    Setup {
        /// The type tag of the failing component.
        tag: String,
        /// The underlying failure.
        reason: anyhow::Error,
    },

    /// An entity link outlived the scene tree it pointed into.
    #[error("entity link is no longer attached to a scene")]
    Detached,

    /// Typed component access found nothing under the tag.
    #[error("entity has no component `{0}`")]
    MissingComponent(String),

    /// Typed component access found a component of another concrete type.
    #[error("component `{0}` has an unexpected concrete type")]
    ComponentType(String),

    /// A scene description document failed to parse.
    #[error("invalid scene description: {0}")]
    Description(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_message_names_the_tag() {
        let err = SceneError::UnknownTag("Bogus".to_string());
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_setup_message_names_tag_and_reason() {
        let err = SceneError::Setup {
            tag: "Texture".to_string(),
            reason: anyhow::anyhow!("missing resource"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Texture"));
        assert!(msg.contains("missing resource"));
    }
}
