//! Entity type: a scene-tree node owning components and named children.
//!
//! Entities are shared by [`EntityHandle`] (an `Arc`). Both keyed sets
//! preserve insertion order and replace on key collision. The keyed sets
//! sit behind synchronous locks whose guards are never held across an
//! await; component instances sit behind an async lock so a pending
//! `setup` can hold its own guard while the rest of the tree configures.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::component::Component;
use crate::error::SceneError;
use crate::factory::ComponentFactory;

/// Shared handle to an entity in a scene tree.
pub type EntityHandle = Arc<Entity>;

/// Shared handle to a component instance.
pub type ComponentHandle = Arc<tokio::sync::RwLock<Box<dyn Component>>>;

/// A non-owning link to an entity.
///
/// Components hold links — to their owner, and to entities resolved by
/// name during setup — rather than handles, so the reference graph they
/// form never keeps a replaced scene tree alive.
#[derive(Debug, Clone)]
pub struct EntityRef(Weak<Entity>);

impl EntityRef {
    /// Resolve the link into a handle.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Detached`] if the tree this link pointed
    /// into has been dropped.
    pub fn resolve(&self) -> Result<EntityHandle, SceneError> {
        self.0.upgrade().ok_or(SceneError::Detached)
    }

    /// Returns `true` if both links point at the same entity.
    #[must_use]
    pub fn same(&self, other: &EntityRef) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl From<&EntityHandle> for EntityRef {
    fn from(handle: &EntityHandle) -> Self {
        Self(Arc::downgrade(handle))
    }
}

/// A node in the scene tree.
///
/// Owns a tag-keyed set of components and a name-keyed set of children.
/// Entities are created empty by the scene builder, populated during the
/// build phase, and never individually destroyed; a whole tree is
/// replaced wholesale when a new scene is created.
#[derive(Default)]
pub struct Entity {
    components: RwLock<IndexMap<String, ComponentHandle>>,
    children: RwLock<IndexMap<String, EntityHandle>>,
}

impl Entity {
    /// Create a new, empty entity.
    #[must_use]
    pub fn new() -> EntityHandle {
        Arc::new(Self::default())
    }

    /// Construct a component of type `tag` via `factory`, owned by this
    /// entity, and store it under `tag`, replacing any previous component
    /// stored there. Returns the new component's handle.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownTag`] if the factory has no
    /// constructor registered for `tag`.
    pub fn add_component(
        self: &Arc<Self>,
        tag: &str,
        factory: &ComponentFactory,
    ) -> Result<ComponentHandle, SceneError> {
        let component = factory.create(tag, EntityRef::from(self))?;
        let handle: ComponentHandle = Arc::new(tokio::sync::RwLock::new(component));
        self.components
            .write()
            .insert(tag.to_string(), handle.clone());
        Ok(handle)
    }

    /// Returns the component stored under `tag`, if any.
    #[must_use]
    pub fn component(&self, tag: &str) -> Option<ComponentHandle> {
        self.components.read().get(tag).cloned()
    }

    /// Store `child` under `name`, replacing any previous child there.
    pub fn add_child(&self, name: &str, child: EntityHandle) {
        self.children.write().insert(name.to_string(), child);
    }

    /// Returns the child stored under `name`, if any.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<EntityHandle> {
        self.children.read().get(name).cloned()
    }

    /// Invoke `visitor` once for every stored `(component, tag)` pair, in
    /// insertion order.
    ///
    /// The walk runs over a snapshot; mutations made while it runs only
    /// affect later walks.
    pub fn walk_components(&self, mut visitor: impl FnMut(&ComponentHandle, &str)) {
        for (tag, component) in self.components() {
            visitor(&component, &tag);
        }
    }

    /// Invoke `visitor` once for every stored `(child, name)` pair, in
    /// insertion order.
    pub fn walk_children(&self, mut visitor: impl FnMut(&EntityHandle, &str)) {
        for (name, child) in self.children() {
            visitor(&child, &name);
        }
    }

    /// Snapshot of the component set in insertion order.
    #[must_use]
    pub fn components(&self) -> Vec<(String, ComponentHandle)> {
        self.components
            .read()
            .iter()
            .map(|(tag, component)| (tag.clone(), component.clone()))
            .collect()
    }

    /// Snapshot of the child set in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<(String, EntityHandle)> {
        self.children
            .read()
            .iter()
            .map(|(name, child)| (name.clone(), child.clone()))
            .collect()
    }

    /// Lock the component under `tag`, downcast it to `C`, and run `f`
    /// on a shared borrow of it.
    ///
    /// # Errors
    ///
    /// [`SceneError::MissingComponent`] if nothing is stored under `tag`,
    /// [`SceneError::ComponentType`] if the stored component is not a `C`.
    pub async fn with_component<C, R>(
        &self,
        tag: &str,
        f: impl FnOnce(&C) -> R,
    ) -> Result<R, SceneError>
    where
        C: Component,
    {
        let handle = self
            .component(tag)
            .ok_or_else(|| SceneError::MissingComponent(tag.to_string()))?;
        let guard = handle.read().await;
        let component = guard
            .as_any()
            .downcast_ref::<C>()
            .ok_or_else(|| SceneError::ComponentType(tag.to_string()))?;
        Ok(f(component))
    }

    /// Lock the component under `tag`, downcast it to `C`, and run `f`
    /// on an exclusive borrow of it.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::with_component`].
    pub async fn with_component_mut<C, R>(
        &self,
        tag: &str,
        f: impl FnOnce(&mut C) -> R,
    ) -> Result<R, SceneError>
    where
        C: Component,
    {
        let handle = self
            .component(tag)
            .ok_or_else(|| SceneError::MissingComponent(tag.to_string()))?;
        let mut guard = handle.write().await;
        let component = guard
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or_else(|| SceneError::ComponentType(tag.to_string()))?;
        Ok(f(component))
    }
}
