//! # ludus_scene
//!
//! The scene core of the ludus engine: a hierarchical tree of entities,
//! each carrying a keyed set of components, built from a declarative
//! description and traversed by per-frame systems.
//!
//! This crate provides:
//!
//! - [`Entity`] — a tree node owning keyed components and named children.
//! - [`Component`] — the lifecycle and capability contract for behaviors.
//! - [`ComponentFactory`] — tag-to-constructor registry, injected explicitly.
//! - [`Scene`] — two-phase construction (synchronous structural build,
//!   then a joined fan-out of asynchronous `setup` calls), name lookup,
//!   and strictly-sequenced visitor traversal.
//!
//! Scene construction is asynchronous because component setup may await
//! external resources; everything else is cooperative single-task work.

pub mod component;
pub mod description;
pub mod entity;
pub mod error;
pub mod factory;
pub mod scene;

#[cfg(test)]
pub(crate) mod testkit;

pub use component::{Component, DisplayComponent, LogicComponent, SetupContext};
pub use description::{ComponentConfig, EntityDesc, SceneDesc};
pub use entity::{ComponentHandle, Entity, EntityHandle, EntityRef};
pub use error::SceneError;
pub use factory::ComponentFactory;
pub use scene::Scene;
