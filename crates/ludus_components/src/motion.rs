//! Motion component: advances the owner's position every frame and
//! bounces it off configured bounds.

use std::any::Any;

use anyhow::Context;
use async_trait::async_trait;
use ludus_math::Vec2;
use ludus_scene::{Component, EntityRef, LogicComponent, SetupContext};
use serde::Deserialize;
use serde_json::Value;

use crate::position::{self, PositionComponent};

/// Tag this component registers under.
pub const TAG: &str = "Motion";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MotionConfig {
    dx: f32,
    dy: f32,
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

/// Constant-velocity motion with bounce. Vertical bounces mirror the
/// velocity; horizontal bounces also speed it up slightly, which keeps
/// rallies from going on forever.
pub struct MotionComponent {
    tag: String,
    owner: EntityRef,
    velocity: Vec2,
    original: Vec2,
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl MotionComponent {
    /// Create an unconfigured, motionless component.
    #[must_use]
    pub fn new(tag: &str, owner: EntityRef) -> Self {
        Self {
            tag: tag.to_string(),
            owner,
            velocity: Vec2::ZERO,
            original: Vec2::ZERO,
            min_x: f32::NEG_INFINITY,
            max_x: f32::INFINITY,
            min_y: f32::NEG_INFINITY,
            max_y: f32::INFINITY,
        }
    }

    /// Current velocity, in units per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Snap back to the configured starting velocity.
    pub fn reset(&mut self) {
        self.velocity = self.original;
    }
}

#[async_trait]
impl Component for MotionComponent {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    async fn setup(&mut self, _ctx: &SetupContext<'_>, config: &Value) -> anyhow::Result<()> {
        let config: MotionConfig =
            serde_json::from_value(config.clone()).context("invalid Motion config")?;
        self.velocity = Vec2::new(config.dx, config.dy);
        self.original = self.velocity;
        self.min_x = config.min_x;
        self.max_x = config.max_x;
        self.min_y = config.min_y;
        self.max_y = config.max_y;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

#[async_trait]
impl LogicComponent for MotionComponent {
    async fn update(&mut self, dt: f64) -> anyhow::Result<()> {
        let owner = self.owner.resolve()?;
        let step = self.velocity * dt as f32;
        let next = owner
            .with_component_mut::<PositionComponent, _>(position::TAG, |pos| {
                pos.position += step;
                pos.position
            })
            .await?;

        if next.y < self.min_y || next.y > self.max_y {
            self.velocity.y = -self.velocity.y;
        }
        if next.x < self.min_x || next.x > self.max_x {
            self.velocity.x *= -1.05;
        }
        Ok(())
    }
}
