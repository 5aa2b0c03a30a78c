//! Collider component: axis-aligned overlap tests against a fixed set
//! of obstacle entities.

use std::any::Any;

use anyhow::Context;
use async_trait::async_trait;
use ludus_math::Rect;
use ludus_scene::{Component, EntityRef, LogicComponent, SetupContext};
use serde::Deserialize;
use serde_json::Value;

use crate::position::{self, PositionComponent};

/// Tag this component registers under.
pub const TAG: &str = "Collider";

#[derive(Debug, Deserialize)]
struct ColliderConfig {
    width: f32,
    height: f32,
    #[serde(default)]
    obstacles: Vec<String>,
}

/// Collision state against a configured obstacle list.
///
/// Obstacle names are resolved into entity links during setup — the
/// cross-reference case: the named entities exist structurally at that
/// point even though their own components may not be configured yet.
/// Each update recomputes which obstacle (if any) overlaps this
/// entity's rectangle, and which shares its horizontal zone. Only one
/// obstacle is tracked at a time; with several matches the last one in
/// configuration order wins.
pub struct ColliderComponent {
    tag: String,
    owner: EntityRef,
    width: f32,
    height: f32,
    obstacles: Vec<EntityRef>,
    /// Obstacle whose rectangle overlaps ours, refreshed every update.
    pub collision: Option<EntityRef>,
    /// Obstacle sharing our horizontal zone, refreshed every update.
    pub in_zone: Option<EntityRef>,
}

impl ColliderComponent {
    /// Create an unconfigured collider with no extent and no obstacles.
    #[must_use]
    pub fn new(tag: &str, owner: EntityRef) -> Self {
        Self {
            tag: tag.to_string(),
            owner,
            width: 0.0,
            height: 0.0,
            obstacles: Vec::new(),
            collision: None,
            in_zone: None,
        }
    }

    /// The collision rectangle, centred on the owner's position.
    async fn area(&self) -> anyhow::Result<Rect> {
        let owner = self.owner.resolve()?;
        let center = owner
            .with_component::<PositionComponent, _>(position::TAG, |pos| pos.position)
            .await?;
        Ok(Rect::from_center(center, self.width, self.height))
    }
}

#[async_trait]
impl Component for ColliderComponent {
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
        let config: ColliderConfig =
            serde_json::from_value(config.clone()).context("invalid Collider config")?;
        self.width = config.width;
        self.height = config.height;
        self.obstacles.clear();
        for name in &config.obstacles {
            let entity = ctx
                .scene
                .find_object(name)
                .with_context(|| format!("obstacle `{name}` not found in scene"))?;
            self.obstacles.push(EntityRef::from(&entity));
        }
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

#[async_trait]
impl LogicComponent for ColliderComponent {
    async fn update(&mut self, _dt: f64) -> anyhow::Result<()> {
        self.collision = None;
        self.in_zone = None;
        let area = self.area().await?;

        for obstacle in &self.obstacles {
            let entity = obstacle.resolve()?;
            let (width, height) = entity
                .with_component::<ColliderComponent, _>(TAG, |collider| {
                    (collider.width, collider.height)
                })
                .await?;
            let center = entity
                .with_component::<PositionComponent, _>(position::TAG, |pos| pos.position)
                .await?;
            let other_area = Rect::from_center(center, width, height);

            if area.intersects(&other_area) {
                self.collision = Some(obstacle.clone());
            }
            let other_zone = other_area.with_vertical_span(f32::NEG_INFINITY, f32::INFINITY);
            if area.intersects(&other_zone) {
                self.in_zone = Some(obstacle.clone());
            }
        }
        Ok(())
    }
}
