//! Position component: gives an entity a place in the world.

use std::any::Any;

use anyhow::Context;
use async_trait::async_trait;
use ludus_math::Vec2;
use ludus_scene::{Component, SetupContext};
use serde::Deserialize;
use serde_json::Value;

/// Tag this component registers under.
pub const TAG: &str = "Position";

#[derive(Debug, Deserialize)]
struct PositionConfig {
    x: f32,
    y: f32,
}

/// Spatial anchor for an entity. Nearly every other gameplay component
/// reads or writes it.
pub struct PositionComponent {
    tag: String,
    /// Current position, mutated in place by motion and input components.
    pub position: Vec2,
    original: Vec2,
}

impl PositionComponent {
    /// Create an unconfigured position at the origin.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            position: Vec2::ZERO,
            original: Vec2::ZERO,
        }
    }

    /// Snap back to the configured starting position.
    pub fn reset(&mut self) {
        self.position = self.original;
    }
}

#[async_trait]
impl Component for PositionComponent {
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
        let config: PositionConfig =
            serde_json::from_value(config.clone()).context("invalid Position config")?;
        self.position = Vec2::new(config.x, config.y);
        self.original = self.position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testutil::empty_scene;

    #[tokio::test]
    async fn test_setup_reads_coordinates() {
        let scene = empty_scene().await;
        let ctx = SetupContext { scene: &scene };
        let mut position = PositionComponent::new(TAG);

        position
            .setup(&ctx, &json!({ "x": 3.0, "y": -4.5 }))
            .await
            .unwrap();
        assert_eq!(position.position, Vec2::new(3.0, -4.5));
    }

    #[tokio::test]
    async fn test_reset_restores_the_configured_position() {
        let scene = empty_scene().await;
        let ctx = SetupContext { scene: &scene };
        let mut position = PositionComponent::new(TAG);
        position.setup(&ctx, &json!({ "x": 1.0, "y": 2.0 })).await.unwrap();

        position.position = Vec2::new(100.0, 100.0);
        position.reset();
        assert_eq!(position.position, Vec2::new(1.0, 2.0));
    }

    #[tokio::test]
    async fn test_setup_rejects_malformed_config() {
        let scene = empty_scene().await;
        let ctx = SetupContext { scene: &scene };
        let mut position = PositionComponent::new(TAG);

        assert!(position.setup(&ctx, &json!({ "x": 1.0 })).await.is_err());
    }
}
