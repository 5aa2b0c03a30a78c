//! Core component contract: construction, configuration, capabilities.
//!
//! A component is a behavior unit exclusively owned by one entity. Its
//! lifecycle has two phases: synchronous construction by the
//! [`ComponentFactory`](crate::ComponentFactory) while the tree is being
//! built, then a single asynchronous [`Component::setup`] call once the
//! whole tree exists. After that it is mutated in place every frame by
//! the systems that drive its capabilities.

use std::any::Any;

use async_trait::async_trait;
use serde_json::Value;

use crate::scene::Scene;

/// Context handed to every [`Component::setup`] call.
///
/// Carries the scene being configured so setups can resolve
/// cross-references by name. The tree structure is complete by the time
/// any setup runs; other components' own setups may still be pending, so
/// reads of *their* post-setup state must be deferred to the update
/// phase.
pub struct SetupContext<'a> {
    /// The scene whose tree is fully built and currently configuring.
    pub scene: &'a Scene,
}

/// The contract every component type must satisfy.
///
/// `setup` and the capability hooks all default to no-ops; a plain data
/// holder only needs to implement the introspection methods.
#[async_trait]
pub trait Component: Any + Send + Sync {
    /// The type tag this instance was created under.
    fn tag(&self) -> &str;

    /// Upcast used for typed access to component state.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast used for typed access to component state.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Configure the component from its raw description.
    ///
    /// Called exactly once, after the whole tree's structure exists. May
    /// await external resources. Must not lock sibling components; state
    /// populated by *other* components' setups is not guaranteed ready
    /// here.
    ///
    /// # Errors
    ///
    /// A failure here fails the whole scene construction.
    async fn setup(&mut self, ctx: &SetupContext<'_>, config: &Value) -> anyhow::Result<()> {
        let _ = (ctx, config);
        Ok(())
    }

    /// Opt-in query for the logic capability.
    ///
    /// Components driven by the logic system return `Some(self)`.
    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        None
    }

    /// Opt-in query for the display capability.
    ///
    /// Components driven by the display system return `Some(self)`.
    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        None
    }
}

impl std::fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component").field("tag", &self.tag()).finish()
    }
}

/// Capability implemented by components the logic system drives.
#[async_trait]
pub trait LogicComponent: Send {
    /// Advance the component by `dt` seconds.
    async fn update(&mut self, dt: f64) -> anyhow::Result<()>;
}

/// Capability implemented by components the display system drives.
#[async_trait]
pub trait DisplayComponent: Send {
    /// Queue this frame's draw operations.
    async fn display(&mut self, dt: f64) -> anyhow::Result<()>;
}
