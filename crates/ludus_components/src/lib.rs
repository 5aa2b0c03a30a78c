//! # ludus_components
//!
//! The gameplay component set for the ludus engine. Every type here is a
//! consumer of the scene core's contract: constructed by the factory
//! during the build phase, configured once from its raw description
//! during the configure phase, then driven every frame through the
//! logic/display capabilities.
//!
//! Backends are injected at registration time: the constructors
//! registered by [`register_gameplay`] capture the graphics and input
//! handles they need, so component code never reaches for globals.

use std::sync::Arc;

use ludus_gfx::Graphics;
use ludus_input::InputState;
use ludus_scene::ComponentFactory;

pub mod atlas;
pub mod collider;
pub mod joystick;
pub mod motion;
pub mod position;
pub mod referee;
pub mod score;
pub mod texture;

#[cfg(test)]
pub(crate) mod testutil;

pub use atlas::TextureAtlasComponent;
pub use collider::ColliderComponent;
pub use joystick::JoystickComponent;
pub use motion::MotionComponent;
pub use position::PositionComponent;
pub use referee::RefereeComponent;
pub use score::ScoreComponent;
pub use texture::TextureComponent;

/// Register the full gameplay component set on `factory`.
///
/// This is the production mapping from description tags to concrete
/// component types; tests swap in their own registrations instead.
pub fn register_gameplay(factory: &mut ComponentFactory, gfx: Arc<Graphics>, input: Arc<InputState>) {
    factory.register(position::TAG, |tag, _owner| {
        Box::new(PositionComponent::new(tag))
    });
    {
        let gfx = gfx.clone();
        factory.register(texture::TAG, move |tag, owner| {
            Box::new(TextureComponent::new(tag, owner, gfx.clone()))
        });
    }
    factory.register(motion::TAG, |tag, owner| {
        Box::new(MotionComponent::new(tag, owner))
    });
    factory.register(collider::TAG, |tag, owner| {
        Box::new(ColliderComponent::new(tag, owner))
    });
    {
        let input = input.clone();
        factory.register(joystick::TAG, move |tag, owner| {
            Box::new(JoystickComponent::new(tag, owner, input.clone()))
        });
    }
    {
        let gfx = gfx.clone();
        factory.register(atlas::TAG, move |tag, _owner| {
            Box::new(TextureAtlasComponent::new(tag, gfx.clone()))
        });
    }
    factory.register(score::TAG, |tag, owner| Box::new(ScoreComponent::new(tag, owner)));
    factory.register(referee::TAG, |tag, _owner| Box::new(RefereeComponent::new(tag)));
}
