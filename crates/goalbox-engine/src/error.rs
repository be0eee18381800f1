//! Construction-time geometry errors.
//!
//! Runtime edge cases (boundary points, double removal, forces on missing
//! bodies) are defined behaviour and never surface as errors.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// A region whose min corner is not strictly below its max corner.
    InvalidRegion {
        min: (f32, f32),
        max: (f32, f32),
    },
    /// The world is too small to place the goal box with its margins.
    WorldTooSmall {
        width: f32,
        height: f32,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidRegion { min, max } => write!(
                f,
                "invalid region: min ({}, {}) must be strictly less than max ({}, {})",
                min.0, min.1, max.0, max.1
            ),
            GeometryError::WorldTooSmall { width, height } => {
                write!(f, "world {}x{} is too small for the goal box", width, height)
            }
        }
    }
}

impl std::error::Error for GeometryError {}
