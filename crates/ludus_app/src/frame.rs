//! The outer frame loop.
//!
//! Runs every system fully sequentially once per frame, then sleeps off
//! the rest of the frame budget. The measured delta is clamped so a
//! stall (debugger, suspended process) produces one bounded step instead
//! of a pathological jump.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ludus_scene::Scene;
use tracing::{info, warn};

use crate::systems::System;

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Upper bound on the per-frame delta, in seconds.
    pub max_delta: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_delta: 0.1,
            max_frames: 0,
        }
    }
}

/// Run the frame loop over `scene` until `config.max_frames` is reached
/// (or forever when unlimited).
///
/// Systems run one after another, never interleaved; the scene handle is
/// only ever swapped by the caller between calls to this function.
///
/// # Errors
///
/// A system error aborts the current frame and the loop; there is no
/// partial-frame recovery.
pub async fn run(scene: &Scene, systems: &mut [Box<dyn System>], config: FrameConfig) -> Result<()> {
    let budget = Duration::from_secs_f64(1.0 / config.frame_rate);
    let mut last = Instant::now();
    let mut frames = 0u64;

    info!(
        frame_rate = config.frame_rate,
        max_frames = config.max_frames,
        "starting frame loop"
    );

    loop {
        let start = Instant::now();
        let dt = (start - last).as_secs_f64().clamp(0.0, config.max_delta);
        last = start;

        for system in systems.iter_mut() {
            let result = system.iterate(scene, dt).await;
            result.with_context(|| format!("system `{}` failed", system.name()))?;
        }

        frames += 1;
        if config.max_frames > 0 && frames >= config.max_frames {
            info!(frames, "frame loop complete");
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed < budget {
            tokio::time::sleep(budget - elapsed).await;
        } else {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "frame exceeded time budget"
            );
        }
    }
}
