//! # ludus_math
//!
//! Math types for the ludus engine. Re-exports [`glam`] for linear algebra
//! and defines the engine-specific collision primitive [`Rect`].

pub mod rect;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use rect::Rect;
