//! Display and logic systems: per-frame drivers over the scene tree.
//!
//! Each system performs one full walk per frame. Visits are strictly
//! sequenced by the walk contract, and within one entity the system
//! drives components in insertion order, so the whole frame has one
//! deterministic ordering of side effects. Components that do not
//! implement the system's capability are skipped.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use ludus_gfx::Graphics;
use ludus_scene::Scene;
use tracing::trace;

/// A per-frame driver over the current scene.
#[async_trait]
pub trait System: Send {
    /// Human-readable system name, for logs.
    fn name(&self) -> &'static str;

    /// Run one full pass over the scene.
    async fn iterate(&mut self, scene: &Scene, dt: f64) -> Result<()>;
}

/// Drives the logic capability (`update`) of every component that has
/// it.
pub struct LogicSystem;

#[async_trait]
impl System for LogicSystem {
    fn name(&self) -> &'static str {
        "logic"
    }

    async fn iterate(&mut self, scene: &Scene, dt: f64) -> Result<()> {
        scene
            .walk(|entity, _name| {
                Box::pin(async move {
                    for (_tag, component) in entity.components() {
                        let mut guard = component.write().await;
                        if let Some(logic) = guard.as_logic() {
                            logic.update(dt).await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
    }
}

/// Drives the display capability (`display`) of every component that
/// has it, then flushes the queued draw operations into a frame.
pub struct DisplaySystem {
    gfx: Arc<Graphics>,
}

impl DisplaySystem {
    /// Create a display system rendering through `gfx`.
    #[must_use]
    pub fn new(gfx: Arc<Graphics>) -> Self {
        Self { gfx }
    }
}

#[async_trait]
impl System for DisplaySystem {
    fn name(&self) -> &'static str {
        "display"
    }

    async fn iterate(&mut self, scene: &Scene, dt: f64) -> Result<()> {
        scene
            .walk(|entity, _name| {
                Box::pin(async move {
                    for (_tag, component) in entity.components() {
                        let mut guard = component.write().await;
                        if let Some(display) = guard.as_display() {
                            display.display(dt).await?;
                        }
                    }
                    Ok(())
                })
            })
            .await?;

        let flushed = self.gfx.render_frame();
        trace!(flushed, "frame flushed");
        Ok(())
    }
}
