//! Shared helpers for component tests.

use std::path::PathBuf;
use std::sync::Arc;

use ludus_gfx::{GfxConfig, Graphics};
use ludus_input::InputState;
use ludus_scene::{Component, ComponentFactory, EntityHandle, Scene, SceneDesc, description};

/// Backends for tests that never load real assets.
pub(crate) fn test_backends() -> (Arc<Graphics>, Arc<InputState>) {
    let gfx = Arc::new(Graphics::new(GfxConfig {
        width: 64,
        height: 64,
        asset_root: PathBuf::from("unused"),
    }));
    (gfx, Arc::new(InputState::new()))
}

/// A configured scene with no entities, for setup-context plumbing.
pub(crate) async fn empty_scene() -> Arc<Scene> {
    Scene::create(&SceneDesc::new(), &ComponentFactory::new())
        .await
        .unwrap()
}

/// Build a scene from a JSON description with the gameplay set
/// registered against throwaway backends.
pub(crate) async fn scene_with(json: &str) -> Arc<Scene> {
    let (gfx, input) = test_backends();
    scene_with_backends(json, gfx, input).await
}

/// Build a scene from a JSON description with the gameplay set
/// registered against the given backends.
pub(crate) async fn scene_with_backends(
    json: &str,
    gfx: Arc<Graphics>,
    input: Arc<InputState>,
) -> Arc<Scene> {
    let mut factory = ComponentFactory::new();
    crate::register_gameplay(&mut factory, gfx, input);
    let description = description::parse(json).unwrap();
    Scene::create(&description, &factory).await.unwrap()
}

/// Read a typed view of the component under `tag`.
pub(crate) async fn component_of<C, R>(
    entity: &EntityHandle,
    tag: &str,
    f: impl FnOnce(&C) -> R,
) -> R
where
    C: Component,
{
    entity.with_component::<C, _>(tag, f).await.unwrap()
}

/// Run one `update` tick of the logic capability of the component under
/// `tag`.
pub(crate) async fn tick(entity: &EntityHandle, tag: &str, dt: f64) {
    let handle = entity.component(tag).expect("component present");
    let mut guard = handle.write().await;
    guard
        .as_logic()
        .expect("component has the logic capability")
        .update(dt)
        .await
        .unwrap();
}
