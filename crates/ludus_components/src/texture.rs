//! Texture component: draws one image centred on the owner's position.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use ludus_gfx::{Graphics, RgbaImage};
use ludus_scene::{Component, DisplayComponent, EntityRef, SetupContext};
use serde::Deserialize;
use serde_json::Value;

use crate::position::{self, PositionComponent};

/// Tag this component registers under.
pub const TAG: &str = "Texture";

#[derive(Debug, Default, Deserialize)]
struct TextureConfig {
    /// Image to load. May be omitted: score displays start imageless and
    /// get their image swapped in from an atlas.
    name: Option<String>,
}

/// One drawable image. The image is loaded during setup when the
/// description names one; either way it stays swappable afterwards.
pub struct TextureComponent {
    tag: String,
    owner: EntityRef,
    gfx: Arc<Graphics>,
    /// The image drawn each frame, if any.
    pub image: Option<Arc<RgbaImage>>,
}

impl TextureComponent {
    /// Create an imageless texture bound to `gfx`.
    #[must_use]
    pub fn new(tag: &str, owner: EntityRef, gfx: Arc<Graphics>) -> Self {
        Self {
            tag: tag.to_string(),
            owner,
            gfx,
            image: None,
        }
    }
}

#[async_trait]
impl Component for TextureComponent {
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
        let config: TextureConfig =
            serde_json::from_value(config.clone()).context("invalid Texture config")?;
        if let Some(name) = &config.name {
            let image = self
                .gfx
                .load_image(name)
                .await
                .with_context(|| format!("loading texture `{name}`"))?;
            self.image = Some(image);
        }
        Ok(())
    }

    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }
}

#[async_trait]
impl DisplayComponent for TextureComponent {
    async fn display(&mut self, _dt: f64) -> anyhow::Result<()> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        let owner = self.owner.resolve()?;
        let center = owner
            .with_component::<PositionComponent, _>(position::TAG, |pos| pos.position)
            .await?;
        self.gfx.draw_centered(image.clone(), center.x, center.y);
        Ok(())
    }
}
