//! Scene: tree construction, configuration, lookup, and traversal.
//!
//! A scene is built in two phases. **Building** is synchronous: the
//! description tree is walked depth-first, instantiating every entity
//! and component and recording each component's raw configuration in a
//! side-table keyed by component identity. **Configuring** is
//! asynchronous: once the whole tree exists, every component's `setup`
//! is issued, and construction completes only when all of them have —
//! so a setup may resolve any other entity by name even though that
//! entity's own components are not configured yet.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, try_join_all};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::component::SetupContext;
use crate::description::SceneDesc;
use crate::entity::{ComponentHandle, Entity, EntityHandle};
use crate::error::SceneError;
use crate::factory::ComponentFactory;

/// Identity key into the configuration side-table.
///
/// Configurations are keyed by component instance, not by tag or name:
/// components owned by different entities share tags freely.
fn component_key(handle: &ComponentHandle) -> usize {
    Arc::as_ptr(handle) as *const () as usize
}

/// The hierarchy of entities alive at one time, plus the side-table of
/// raw component configurations consumed during the configure phase.
///
/// There is no process-wide "current scene": callers own the handle
/// returned by [`Scene::create`] and pass it to whatever needs lookup —
/// systems each frame, component setups through [`SetupContext`].
/// Replacing a scene mid-walk is therefore impossible by construction;
/// swap handles only between frames.
pub struct Scene {
    root: EntityHandle,
    configs: Mutex<HashMap<usize, Value>>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene").finish_non_exhaustive()
    }
}

impl Scene {
    /// Build and configure a scene from `description`.
    ///
    /// Completes only once every component's `setup` has completed
    /// (join-all, fail-fast: the first setup error fails construction
    /// and the remaining pending setups are dropped).
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownTag`] if the description names a component
    /// the factory cannot build; [`SceneError::Setup`] if any
    /// component's configuration fails. No partial scene is exposed.
    pub async fn create(
        description: &SceneDesc,
        factory: &ComponentFactory,
    ) -> Result<Arc<Self>, SceneError> {
        let scene = Arc::new(Self::build(description, factory)?);
        scene.configure().await?;
        debug!("scene ready");
        Ok(scene)
    }

    /// Building phase: recursively instantiate the entity tree.
    fn build(description: &SceneDesc, factory: &ComponentFactory) -> Result<Self, SceneError> {
        let scene = Self {
            root: Entity::new(),
            configs: Mutex::new(HashMap::new()),
        };
        scene.create_children(&scene.root, description, factory)?;
        Ok(scene)
    }

    /// Create `parent`'s children from `description`, depth-first: each
    /// child's components exist (unconfigured) before its own children
    /// are created, and a child's whole subtree is built before the next
    /// sibling.
    fn create_children(
        &self,
        parent: &EntityHandle,
        description: &SceneDesc,
        factory: &ComponentFactory,
    ) -> Result<(), SceneError> {
        for (name, desc) in description {
            let child = Entity::new();
            parent.add_child(name, child.clone());
            for (tag, config) in &desc.components {
                let handle = child.add_component(tag, factory)?;
                self.configs
                    .lock()
                    .insert(component_key(&handle), config.clone());
            }
            self.create_children(&child, &desc.children, factory)?;
        }
        Ok(())
    }

    /// Configuring phase: issue every component's `setup` and join them.
    ///
    /// All setups are issued before any is awaited, so the entire tree
    /// is resolvable by name from inside any setup.
    async fn configure(&self) -> Result<(), SceneError> {
        let mut components = Vec::new();
        Self::collect_components(&self.root, &mut components);
        debug!(count = components.len(), "configuring components");

        let ctx = SetupContext { scene: self };
        let setups = components.into_iter().map(|handle| {
            let config = self
                .configs
                .lock()
                .remove(&component_key(&handle))
                .unwrap_or(Value::Null);
            let ctx = &ctx;
            async move {
                let mut component = handle.write().await;
                let tag = component.tag().to_string();
                component
                    .setup(ctx, &config)
                    .await
                    .map_err(|reason| SceneError::Setup { tag, reason })
            }
        });
        try_join_all(setups).await?;
        Ok(())
    }

    /// Collect every component in the tree, in build order.
    fn collect_components(entity: &EntityHandle, out: &mut Vec<ComponentHandle>) {
        for (_name, child) in entity.children() {
            for (_tag, component) in child.components() {
                out.push(component);
            }
            Self::collect_components(&child, out);
        }
    }

    /// The root of the tree. The root itself is unnamed and carries no
    /// components; it exists so the description's top-level names have a
    /// parent.
    #[must_use]
    pub fn root(&self) -> &EntityHandle {
        &self.root
    }

    /// Find the entity registered under `name` anywhere in the tree.
    ///
    /// Search is pre-order: at each node every direct child is checked
    /// before descending into any subtree. Name uniqueness is not
    /// enforced; with duplicates the shallowest, earliest-inserted match
    /// wins.
    #[must_use]
    pub fn find_object(&self, name: &str) -> Option<EntityHandle> {
        Self::find_in_children(&self.root, name)
    }

    fn find_in_children(entity: &EntityHandle, name: &str) -> Option<EntityHandle> {
        if let Some(found) = entity.child(name) {
            return Some(found);
        }
        entity
            .children()
            .into_iter()
            .find_map(|(_, child)| Self::find_in_children(&child, name))
    }

    /// Visit every entity in the tree except the unnamed root.
    ///
    /// Visits are strictly sequenced: the next sibling is not visited
    /// until the current entity's visit *and* the recursive visit of its
    /// whole subtree have completed. This total order trades parallelism
    /// for determinism — systems observe one consistent ordering of side
    /// effects across the tree every frame. A visitor error aborts the
    /// walk.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `visitor`.
    pub async fn walk<F>(&self, mut visitor: F) -> anyhow::Result<()>
    where
        F: FnMut(EntityHandle, String) -> BoxFuture<'static, anyhow::Result<()>> + Send,
    {
        Self::walk_children(&self.root, &mut visitor).await
    }

    fn walk_children<'a, F>(
        entity: &'a EntityHandle,
        visitor: &'a mut F,
    ) -> BoxFuture<'a, anyhow::Result<()>>
    where
        F: FnMut(EntityHandle, String) -> BoxFuture<'static, anyhow::Result<()>> + Send,
    {
        Box::pin(async move {
            for (name, child) in entity.children() {
                visitor(child.clone(), name).await?;
                Self::walk_children(&child, &mut *visitor).await?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::component::{Component, SetupContext};
    use crate::description::parse;
    use crate::testkit::{Event, mock_factory, new_log};

    fn sample_description() -> SceneDesc {
        parse(
            r#"{
                "empty": { "components": {}, "children": {} },
                "complex": {
                    "components": {
                        "comp1": { "hello": "world" },
                        "comp2": { "foo": "bar" }
                    },
                    "children": {
                        "first": { "components": {}, "children": {} },
                        "second": { "components": {}, "children": {} }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_builds_the_described_tree() {
        let log = new_log();
        let factory = mock_factory(&["comp1", "comp2"], &log);
        let scene = Scene::create(&sample_description(), &factory).await.unwrap();

        let complex = scene.root().child("complex").unwrap();
        assert!(complex.component("comp1").is_some());
        assert!(complex.component("comp2").is_some());
        assert!(complex.child("first").is_some());
        assert!(complex.child("second").is_some());
        assert!(scene.root().child("empty").is_some());
    }

    #[tokio::test]
    async fn test_create_runs_setup_with_each_components_config() {
        let log = new_log();
        let factory = mock_factory(&["comp1", "comp2"], &log);
        Scene::create(&sample_description(), &factory).await.unwrap();

        let events = log.lock();
        let setups: Vec<(&String, &Value)> = events
            .iter()
            .filter_map(|event| match event {
                Event::Setup { tag, config } => Some((tag, config)),
                Event::Created { .. } => None,
            })
            .collect();
        assert_eq!(setups.len(), 2);
        assert!(
            setups
                .iter()
                .any(|(tag, config)| *tag == "comp1" && **config == json!({ "hello": "world" }))
        );
        assert!(
            setups
                .iter()
                .any(|(tag, config)| *tag == "comp2" && **config == json!({ "foo": "bar" }))
        );
    }

    #[tokio::test]
    async fn test_create_fails_on_unknown_tag() {
        let log = new_log();
        let factory = mock_factory(&["comp1"], &log);
        let err = Scene::create(&sample_description(), &factory)
            .await
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownTag(tag) if tag == "comp2"));
    }

    #[tokio::test]
    async fn test_find_object_reaches_any_depth() {
        let log = new_log();
        let factory = mock_factory(&["comp1", "comp2"], &log);
        let scene = Scene::create(&sample_description(), &factory).await.unwrap();

        for name in ["empty", "complex", "first", "second"] {
            assert!(scene.find_object(name).is_some(), "missing `{name}`");
        }
        assert!(scene.find_object("absent").is_none());

        let first = scene.find_object("first").unwrap();
        let via_parent = scene.root().child("complex").unwrap().child("first").unwrap();
        assert!(Arc::ptr_eq(&first, &via_parent));
    }

    #[tokio::test]
    async fn test_find_object_prefers_shallow_then_first_subtree() {
        let factory = ComponentFactory::new();
        // `dup` exists deep inside `a` and as a direct child of the root;
        // the direct child must win even though `a` comes first.
        let description = parse(
            r#"{
                "a": { "children": { "dup": { "components": { } } } },
                "dup": {}
            }"#,
        )
        .unwrap();
        // No components anywhere, so an empty factory suffices.
        let scene = Scene::create(&description, &factory).await.unwrap();

        let found = scene.find_object("dup").unwrap();
        let shallow = scene.root().child("dup").unwrap();
        assert!(Arc::ptr_eq(&found, &shallow));

        // With duplicates at equal depth, the first sibling subtree wins.
        let description = parse(
            r#"{
                "a": { "children": { "dup": {} } },
                "b": { "children": { "dup": {} } }
            }"#,
        )
        .unwrap();
        let scene = Scene::create(&description, &factory).await.unwrap();
        let found = scene.find_object("dup").unwrap();
        let in_a = scene.root().child("a").unwrap().child("dup").unwrap();
        assert!(Arc::ptr_eq(&found, &in_a));
    }

    #[tokio::test]
    async fn test_walk_is_preorder_subtree_before_sibling() {
        let factory = ComponentFactory::new();
        let description = parse(
            r#"{
                "a": { "components": {}, "children": {
                    "x": { "components": {}, "children": {} }
                } },
                "b": { "components": {}, "children": {} }
            }"#,
        )
        .unwrap();
        let scene = Scene::create(&description, &factory).await.unwrap();

        let visited = Arc::new(parking_lot::Mutex::new(Vec::new()));
        scene
            .walk(|_entity, name| {
                let visited = visited.clone();
                Box::pin(async move {
                    visited.lock().push(name);
                    Ok(())
                })
            })
            .await
            .unwrap();

        assert_eq!(*visited.lock(), ["a", "x", "b"]);
    }

    #[tokio::test]
    async fn test_walk_error_aborts_traversal() {
        let factory = ComponentFactory::new();
        let description = parse(r#"{ "a": {}, "b": {}, "c": {} }"#).unwrap();
        let scene = Scene::create(&description, &factory).await.unwrap();

        let visited = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let result = scene
            .walk(|_entity, name| {
                let visited = visited.clone();
                Box::pin(async move {
                    if name == "b" {
                        anyhow::bail!("visitor failed on `{name}`");
                    }
                    visited.lock().push(name);
                    Ok(())
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*visited.lock(), ["a"]);
    }

    /// Setup-phase probe: resolves another entity by name and records
    /// whether the lookup succeeded.
    struct CrossRefComponent {
        tag: String,
        resolved: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Component for CrossRefComponent {
        fn tag(&self) -> &str {
            &self.tag
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        async fn setup(&mut self, ctx: &SetupContext<'_>, config: &Value) -> anyhow::Result<()> {
            let other = config["other"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("missing `other`"))?;
            if ctx.scene.find_object(other).is_some() {
                self.resolved.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_setups_resolve_cross_references_in_both_directions() {
        let resolved = Arc::new(AtomicUsize::new(0));
        let mut factory = ComponentFactory::new();
        {
            let resolved = resolved.clone();
            factory.register("Probe", move |tag, _owner| {
                Box::new(CrossRefComponent {
                    tag: tag.to_string(),
                    resolved: resolved.clone(),
                })
            });
        }

        let description = parse(
            r#"{
                "a": { "components": { "Probe": { "other": "b" } }, "children": {} },
                "b": { "components": { "Probe": { "other": "a" } }, "children": {} }
            }"#,
        )
        .unwrap();
        Scene::create(&description, &factory).await.unwrap();

        assert_eq!(resolved.load(Ordering::SeqCst), 2);
    }

    /// Setup-phase straggler: sleeps before completing, tracking how many
    /// setups are in flight.
    struct SlowComponent {
        tag: String,
        delay: Duration,
        in_flight: Arc<AtomicIsize>,
    }

    #[async_trait]
    impl Component for SlowComponent {
        fn tag(&self) -> &str {
            &self.tag
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        async fn setup(&mut self, _ctx: &SetupContext<'_>, _config: &Value) -> anyhow::Result<()> {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_construction_waits_for_every_pending_setup() {
        let in_flight = Arc::new(AtomicIsize::new(0));
        let delay = Duration::from_millis(50);
        let mut factory = ComponentFactory::new();
        {
            let in_flight = in_flight.clone();
            factory.register("Slow", move |tag, _owner| {
                Box::new(SlowComponent {
                    tag: tag.to_string(),
                    delay,
                    in_flight: in_flight.clone(),
                })
            });
        }

        let description = parse(
            r#"{
                "a": { "components": { "Slow": {} }, "children": {} },
                "b": { "components": { "Slow": {} }, "children": {} }
            }"#,
        )
        .unwrap();

        let start = Instant::now();
        Scene::create(&description, &factory).await.unwrap();

        assert!(start.elapsed() >= delay);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    /// Setup-phase rendezvous: completes only once every peer has
    /// started, which hangs unless all setups are issued before any is
    /// awaited.
    struct RendezvousComponent {
        tag: String,
        barrier: Arc<tokio::sync::Barrier>,
    }

    #[async_trait]
    impl Component for RendezvousComponent {
        fn tag(&self) -> &str {
            &self.tag
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        async fn setup(&mut self, _ctx: &SetupContext<'_>, _config: &Value) -> anyhow::Result<()> {
            self.barrier.wait().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_setups_are_issued_before_any_completes() {
        let barrier = Arc::new(tokio::sync::Barrier::new(2));
        let mut factory = ComponentFactory::new();
        {
            let barrier = barrier.clone();
            factory.register("Rendezvous", move |tag, _owner| {
                Box::new(RendezvousComponent {
                    tag: tag.to_string(),
                    barrier: barrier.clone(),
                })
            });
        }

        let description = parse(
            r#"{
                "a": { "components": { "Rendezvous": {} }, "children": {} },
                "b": { "components": { "Rendezvous": {} }, "children": {} }
            }"#,
        )
        .unwrap();

        tokio::time::timeout(Duration::from_secs(5), Scene::create(&description, &factory))
            .await
            .expect("setups must be pending concurrently, not sequenced")
            .unwrap();
    }

    /// Setup-phase failure: always errors.
    struct FailingComponent {
        tag: String,
    }

    #[async_trait]
    impl Component for FailingComponent {
        fn tag(&self) -> &str {
            &self.tag
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        async fn setup(&mut self, _ctx: &SetupContext<'_>, _config: &Value) -> anyhow::Result<()> {
            anyhow::bail!("resource missing")
        }
    }

    #[tokio::test]
    async fn test_setup_failure_fails_the_whole_construction() {
        let log = new_log();
        let mut factory = mock_factory(&["Fine"], &log);
        factory.register("Broken", |tag, _owner| {
            Box::new(FailingComponent {
                tag: tag.to_string(),
            })
        });

        let description = parse(
            r#"{
                "a": { "components": { "Fine": {} }, "children": {} },
                "b": { "components": { "Broken": {} }, "children": {} }
            }"#,
        )
        .unwrap();

        let err = Scene::create(&description, &factory).await.unwrap_err();
        match err {
            SceneError::Setup { tag, reason } => {
                assert_eq!(tag, "Broken");
                assert!(reason.to_string().contains("resource missing"));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
