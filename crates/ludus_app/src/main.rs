//! # ludus_app — Pong demo
//!
//! Wires the engine together: graphics and input backends, the gameplay
//! component set, the scene loaded from a JSON description, and the
//! Display/Logic systems driven by the frame loop.
//!
//! Environment:
//!
//! - `LUDUS_SCENE` — scene description path (default `assets/scene.json`).
//! - `LUDUS_ASSETS` — image directory (default `assets/img`).
//! - `LUDUS_MAX_FRAMES` — stop after N frames (default: run forever).

mod frame;
mod systems;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ludus_components::register_gameplay;
use ludus_gfx::{GfxConfig, Graphics};
use ludus_input::InputState;
use ludus_scene::{ComponentFactory, Scene, description};

use frame::FrameConfig;
use systems::{DisplaySystem, LogicSystem, System};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ludus_app=info".parse()?))
        .init();

    info!("ludus starting");

    let scene_path =
        std::env::var("LUDUS_SCENE").unwrap_or_else(|_| "assets/scene.json".to_string());
    let asset_root = std::env::var("LUDUS_ASSETS").unwrap_or_else(|_| "assets/img".to_string());
    let max_frames = match std::env::var("LUDUS_MAX_FRAMES") {
        Ok(raw) => raw.parse().context("invalid LUDUS_MAX_FRAMES")?,
        Err(_) => 0,
    };

    let gfx = Arc::new(Graphics::new(GfxConfig {
        width: 640,
        height: 480,
        asset_root: PathBuf::from(asset_root),
    }));
    let input = Arc::new(InputState::new());

    let mut factory = ComponentFactory::new();
    register_gameplay(&mut factory, gfx.clone(), input.clone());

    let raw = tokio::fs::read_to_string(&scene_path)
        .await
        .with_context(|| format!("reading scene description `{scene_path}`"))?;
    let desc = description::parse(&raw)?;
    let scene = Scene::create(&desc, &factory).await?;
    info!(path = scene_path, "scene ready");

    let mut systems: Vec<Box<dyn System>> = vec![
        Box::new(DisplaySystem::new(gfx.clone())),
        Box::new(LogicSystem),
    ];

    let config = FrameConfig {
        max_frames,
        ..FrameConfig::default()
    };
    frame::run(&scene, &mut systems, config).await
}
