use glam::Vec2;

use crate::error::GeometryError;

/// Axis-aligned rectangle with `min < max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    min: Vec2,
    max: Vec2,
}

impl Region {
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, GeometryError> {
        // Written as negated `<` so NaN corners are rejected too.
        if !(min.x < max.x) || !(min.y < max.y) {
            return Err(GeometryError::InvalidRegion {
                min: (min.x, min.y),
                max: (max.x, max.y),
            });
        }
        Ok(Self { min, max })
    }

    /// Region anchored at the origin: `{0,0}..{width,height}`.
    pub fn from_size(width: f32, height: f32) -> Result<Self, GeometryError> {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict containment: a point on any edge is outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// The same rectangle with its top edge moved down by `inset`.
    /// `None` when nothing is left.
    pub fn inset_top(&self, inset: f32) -> Option<Region> {
        Region::new(Vec2::new(self.min.x, self.min.y + inset), self.max).ok()
    }
}

/// Free-function form of [`Region::contains`].
pub fn contains(region: &Region, point: Vec2) -> bool {
    region.contains(point)
}
