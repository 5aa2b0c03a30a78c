//! Referee component: watches the ball's collision state and keeps the
//! score.

use std::any::Any;

use anyhow::Context;
use async_trait::async_trait;
use ludus_scene::{Component, EntityHandle, EntityRef, LogicComponent, SetupContext};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::collider::{self, ColliderComponent};
use crate::motion::{self, MotionComponent};
use crate::position::{self, PositionComponent};
use crate::score::{self, ScoreComponent};

/// Tag this component registers under.
pub const TAG: &str = "Referee";

/// Points needed to end the match.
const WINNING_SCORE: u32 = 10;

#[derive(Debug, Deserialize)]
struct RefereeConfig {
    players: Vec<String>,
    ball: String,
}

/// Match rules. Each update inspects the ball's collider: when the ball
/// reached a paddle's horizontal zone without actually hitting it, the
/// *other* player scores and the ball goes back to its starting state.
/// Reaching [`WINNING_SCORE`] ends the match and resets every score.
pub struct RefereeComponent {
    tag: String,
    players: Vec<EntityRef>,
    ball: Option<EntityRef>,
}

impl RefereeComponent {
    /// Create an unconfigured referee.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            players: Vec::new(),
            ball: None,
        }
    }

    /// Award one point to the score child of `player`. Returns the new
    /// count.
    async fn award_point(player: &EntityHandle) -> anyhow::Result<u32> {
        let score = player
            .child("score")
            .context("player entity has no `score` child")?;
        let points = score
            .with_component_mut::<ScoreComponent, _>(score::TAG, |score| {
                score.points += 1;
                score.points
            })
            .await?;
        Ok(points)
    }

    /// Zero every player's score.
    async fn reset_scores(&self) -> anyhow::Result<()> {
        for player in &self.players {
            let player = player.resolve()?;
            let score = player
                .child("score")
                .context("player entity has no `score` child")?;
            score
                .with_component_mut::<ScoreComponent, _>(score::TAG, |score| score.points = 0)
                .await?;
        }
        Ok(())
    }

    /// Put the ball back at its starting position and velocity.
    async fn reset_ball(ball: &EntityHandle) -> anyhow::Result<()> {
        ball.with_component_mut::<PositionComponent, _>(position::TAG, PositionComponent::reset)
            .await?;
        ball.with_component_mut::<MotionComponent, _>(motion::TAG, MotionComponent::reset)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Component for RefereeComponent {
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
        let config: RefereeConfig =
            serde_json::from_value(config.clone()).context("invalid Referee config")?;
        self.players.clear();
        for name in &config.players {
            let player = ctx
                .scene
                .find_object(name)
                .with_context(|| format!("player `{name}` not found in scene"))?;
            self.players.push(EntityRef::from(&player));
        }
        let ball = ctx
            .scene
            .find_object(&config.ball)
            .with_context(|| format!("ball `{}` not found in scene", config.ball))?;
        self.ball = Some(EntityRef::from(&ball));
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

#[async_trait]
impl LogicComponent for RefereeComponent {
    async fn update(&mut self, _dt: f64) -> anyhow::Result<()> {
        let ball = self.ball.as_ref().context("referee was never configured")?;
        let ball = ball.resolve()?;
        let (collision, in_zone) = ball
            .with_component::<ColliderComponent, _>(collider::TAG, |collider| {
                (collider.collision.clone(), collider.in_zone.clone())
            })
            .await?;

        // A collision means the paddle connected; no zone means the ball
        // is still in open court. Either way, no point was scored.
        if collision.is_some() {
            return Ok(());
        }
        let Some(in_zone) = in_zone else {
            return Ok(());
        };

        let mut match_over = false;
        for player in &self.players {
            // The player in the ball's zone is the one who missed;
            // everyone else scores.
            if player.same(&in_zone) {
                continue;
            }
            let points = Self::award_point(&player.resolve()?).await?;
            info!(points, "point scored");
            if points >= WINNING_SCORE {
                match_over = true;
            }
        }

        if match_over {
            info!("match over");
            self.reset_scores().await?;
        }
        Self::reset_ball(&ball).await?;
        Ok(())
    }
}
