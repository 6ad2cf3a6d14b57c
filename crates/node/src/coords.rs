//! Typed canvas coordinates for floor plans.
//!
//! Every value here is in canvas pixels, the unit the grid and
//! compartment math is expressed in. Keeping points, sizes and deltas
//! apart stops a size from being fed where a position is expected.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas space (top-left origin, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Width and height in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement/offset in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

/// One of the two canvas axes.
///
/// For positions `X`/`Y` select the coordinate; for sizes they select
/// width and height respectively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.0.x,
            Axis::Y => self.0.y,
        }
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.0.x,
            Axis::Y => self.0.y,
        }
    }

    /// Both dimensions strictly positive and finite.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0.x > 0.0 && self.0.y > 0.0
    }
}

impl From<Vec2> for CanvasSize {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasSize> for Vec2 {
    fn from(s: CanvasSize) -> Self {
        s.0
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_point_add_delta() {
        let point = CanvasPoint::new(60.0, 120.0);
        let delta = CanvasDelta::new(15.0, -30.0);
        let result = point + delta;
        assert_eq!(result.x(), 75.0);
        assert_eq!(result.y(), 90.0);
    }

    #[test]
    fn canvas_point_sub_gives_delta() {
        let p1 = CanvasPoint::new(10.0, 20.0);
        let p2 = CanvasPoint::new(3.0, 5.0);
        let delta = p1 - p2;
        assert_eq!(delta.dx(), 7.0);
        assert_eq!(delta.dy(), 15.0);
    }

    #[test]
    fn axis_selects_component() {
        let size = CanvasSize::new(180.0, 120.0);
        assert_eq!(size.get(Axis::X), 180.0);
        assert_eq!(size.get(Axis::Y), 120.0);
        assert_eq!(Axis::X.to_string(), "x");
    }

    #[test]
    fn zero_or_nan_size_is_not_positive() {
        assert!(CanvasSize::new(60.0, 60.0).is_positive());
        assert!(!CanvasSize::new(0.0, 60.0).is_positive());
        assert!(!CanvasSize::new(f32::NAN, 60.0).is_positive());
    }
}
