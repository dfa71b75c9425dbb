//! Collision detection and response for axis-aligned boxes
//!
//! Everything here works in surface pixels: origin at the top-left corner,
//! y growing downward.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Check whether a box touches or crosses any edge of a `[0, bounds]` surface
pub fn crosses_boundary(rect: &Rect, bounds: Vec2) -> bool {
    let max = rect.max();
    rect.min.x <= 0.0 || rect.min.y <= 0.0 || max.x >= bounds.x || max.y >= bounds.y
}

/// Pull a point at least `inset` pixels inside a `[0, bounds]` surface
pub fn clamp_inside(point: Vec2, bounds: Vec2, inset: f32) -> Vec2 {
    let lo = Vec2::splat(inset);
    let hi = (bounds - Vec2::splat(inset)).max(lo);
    point.clamp(lo, hi)
}

/// Bounce one axis off `[min, max]`
///
/// Clamps the position back inside and points the velocity component away
/// from the wall that was touched, so a body can never leave the range or
/// get stuck flipping outside it. Returns true if a wall was touched.
#[inline]
pub fn reflect_axis(pos: &mut f32, vel: &mut f32, min: f32, max: f32) -> bool {
    let max = max.max(min);
    if *pos <= min {
        *pos = min;
        *vel = vel.abs();
        true
    } else if *pos >= max {
        *pos = max;
        *vel = -vel.abs();
        true
    } else {
        false
    }
}
