//! Component factory: tag-to-constructor registry.
//!
//! The mapping from type tags to concrete component implementations is
//! registered externally and injected wherever components get created.
//! Production code registers the gameplay set; tests register mocks.
//! This indirection is what keeps the scene core decoupled from any
//! concrete component crate.

use indexmap::IndexMap;

use crate::component::Component;
use crate::entity::EntityRef;
use crate::error::SceneError;

/// Constructor stored in the factory.
///
/// Receives the tag the lookup resolved (so one constructor registered
/// under several tags can still record which one it was created as) and
/// a link to the owning entity.
pub type Constructor = Box<dyn Fn(&str, EntityRef) -> Box<dyn Component> + Send + Sync>;

/// Registry mapping component type tags to constructors.
#[derive(Default)]
pub struct ComponentFactory {
    creators: IndexMap<String, Constructor>,
}

impl ComponentFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `tag`, replacing any previous
    /// registration for that tag.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        constructor: impl Fn(&str, EntityRef) -> Box<dyn Component> + Send + Sync + 'static,
    ) {
        self.creators.insert(tag.into(), Box::new(constructor));
    }

    /// Instantiate a component of type `tag`, owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownTag`] if no constructor is registered
    /// under `tag`. An unknown tag is never silently ignored; a no-op
    /// component would corrupt the scene's configuration contract.
    pub fn create(&self, tag: &str, owner: EntityRef) -> Result<Box<dyn Component>, SceneError> {
        let constructor = self
            .creators
            .get(tag)
            .ok_or_else(|| SceneError::UnknownTag(tag.to_string()))?;
        Ok(constructor(tag, owner))
    }

    /// Returns `true` if a constructor is registered under `tag`.
    #[must_use]
    pub fn is_registered(&self, tag: &str) -> bool {
        self.creators.contains_key(tag)
    }
}
