//! Joystick component: moves the owner vertically from a polled input
//! axis.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use ludus_input::InputState;
use ludus_scene::{Component, EntityRef, LogicComponent, SetupContext};
use serde::Deserialize;
use serde_json::Value;

use crate::position::{self, PositionComponent};

/// Tag this component registers under.
pub const TAG: &str = "Joystick";

#[derive(Debug, Deserialize)]
struct JoystickConfig {
    id: u32,
    speed: f32,
}

/// Polls the vertical axis of one player's controls every update and
/// applies it to the owner's position.
pub struct JoystickComponent {
    tag: String,
    owner: EntityRef,
    input: Arc<InputState>,
    id: u32,
    speed: f32,
}

impl JoystickComponent {
    /// Create an unconfigured joystick bound to `input`.
    #[must_use]
    pub fn new(tag: &str, owner: EntityRef, input: Arc<InputState>) -> Self {
        Self {
            tag: tag.to_string(),
            owner,
            input,
            id: 0,
            speed: 0.0,
        }
    }
}

#[async_trait]
impl Component for JoystickComponent {
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
        let config: JoystickConfig =
            serde_json::from_value(config.clone()).context("invalid Joystick config")?;
        self.id = config.id;
        self.speed = config.speed;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

#[async_trait]
impl LogicComponent for JoystickComponent {
    async fn update(&mut self, _dt: f64) -> anyhow::Result<()> {
        let dy = self.input.axis_y(self.id);
        let owner = self.owner.resolve()?;
        let speed = self.speed;
        owner
            .with_component_mut::<PositionComponent, _>(position::TAG, |pos| {
                pos.position.y += dy * speed;
            })
            .await?;
        Ok(())
    }
}
