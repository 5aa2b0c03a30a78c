//! Score component: a point counter that keeps the owner's texture in
//! sync with a digit atlas.

use std::any::Any;

use anyhow::Context;
use async_trait::async_trait;
use ludus_scene::{Component, EntityRef, LogicComponent, SetupContext};
use serde::Deserialize;
use serde_json::Value;

use crate::atlas::{self, TextureAtlasComponent};
use crate::texture::{self, TextureComponent};

/// Tag this component registers under.
pub const TAG: &str = "Score";

#[derive(Debug, Deserialize)]
struct ScoreConfig {
    points: u32,
}

/// A player's point count. Every update it swaps the owner's texture to
/// the atlas image keyed by the current count, so the referee only ever
/// touches `points` and the display follows on its own.
pub struct ScoreComponent {
    tag: String,
    owner: EntityRef,
    /// Current point count. Incremented by the referee.
    pub points: u32,
}

impl ScoreComponent {
    /// Create a zero score.
    #[must_use]
    pub fn new(tag: &str, owner: EntityRef) -> Self {
        Self {
            tag: tag.to_string(),
            owner,
            points: 0,
        }
    }
}

#[async_trait]
impl Component for ScoreComponent {
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
        let config: ScoreConfig =
            serde_json::from_value(config.clone()).context("invalid Score config")?;
        self.points = config.points;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

#[async_trait]
impl LogicComponent for ScoreComponent {
    async fn update(&mut self, _dt: f64) -> anyhow::Result<()> {
        let owner = self.owner.resolve()?;
        let key = self.points.to_string();
        let image = owner
            .with_component::<TextureAtlasComponent, _>(atlas::TAG, |atlas| atlas.get(&key))
            .await?;
        owner
            .with_component_mut::<TextureComponent, _>(texture::TAG, |texture| {
                texture.image = image;
            })
            .await?;
        Ok(())
    }
}
