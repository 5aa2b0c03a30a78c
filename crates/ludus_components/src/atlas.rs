//! Texture atlas component: a named collection of images loaded
//! together.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures::future::try_join_all;
use ludus_gfx::{Graphics, RgbaImage};
use ludus_scene::{Component, SetupContext};
use serde::Deserialize;
use serde_json::Value;

/// Tag this component registers under.
pub const TAG: &str = "TextureAtlas";

/// Maps atlas keys to loaded images.
///
/// The description is a flat `key → image name` map; setup loads every
/// image concurrently and completes once all of them have. Score
/// components index the atlas by their point count to pick a digit
/// image.
pub struct TextureAtlasComponent {
    tag: String,
    gfx: Arc<Graphics>,
    /// Loaded images by atlas key.
    pub atlas: HashMap<String, Arc<RgbaImage>>,
}

impl TextureAtlasComponent {
    /// Create an empty atlas bound to `gfx`.
    #[must_use]
    pub fn new(tag: &str, gfx: Arc<Graphics>) -> Self {
        Self {
            tag: tag.to_string(),
            gfx,
            atlas: HashMap::new(),
        }
    }

    /// The image stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<RgbaImage>> {
        self.atlas.get(key).cloned()
    }
}

#[async_trait]
impl Component for TextureAtlasComponent {
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
        let entries: HashMap<String, String> =
            HashMap::<String, String>::deserialize(config).context("invalid TextureAtlas config")?;

        let loads = entries.into_iter().map(|(key, name)| {
            let gfx = self.gfx.clone();
            async move {
                let image = gfx
                    .load_image(&name)
                    .await
                    .with_context(|| format!("loading atlas image `{name}`"))?;
                Ok::<_, anyhow::Error>((key, image))
            }
        });
        self.atlas = try_join_all(loads).await?.into_iter().collect();
        Ok(())
    }
}
