//! Axis-aligned rectangle used for collision tests.
//!
//! [`Rect`] stores its four edges directly. Colliders build one from a
//! centre point and a size every frame, so construction is cheap and the
//! intersection test is a handful of comparisons.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x_min: f32,
    /// Right edge.
    pub x_max: f32,
    /// Top edge.
    pub y_min: f32,
    /// Bottom edge.
    pub y_max: f32,
}

impl Rect {
    /// Build a rectangle from a centre point and a size.
    #[must_use]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x_min: center.x - width / 2.0,
            x_max: center.x + width / 2.0,
            y_min: center.y - height / 2.0,
            y_max: center.y + height / 2.0,
        }
    }

    /// Returns a copy of this rectangle with its vertical edges replaced.
    ///
    /// Passing infinities turns the rectangle into a vertical band, which
    /// colliders use to test whether two objects share a horizontal zone.
    #[must_use]
    pub fn with_vertical_span(mut self, y_min: f32, y_max: f32) -> Self {
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    /// Returns `true` if the two rectangles overlap.
    ///
    /// Edges that merely touch do not count as an overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !((self.x_min >= other.x_max)
            || (self.x_max <= other.x_min)
            || (self.y_min >= other.y_max)
            || (self.y_max <= other.y_min))
    }

    /// The centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}
