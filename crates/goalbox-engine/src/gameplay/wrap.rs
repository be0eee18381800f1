use glam::Vec2;

use crate::api::sim::Simulation;
use crate::gameplay::region::Region;

/// Toroidal wrap of `pos` into `region`, one wrap per axis.
///
/// A coordinate below `min` re-enters from `max` by the same overshoot, and
/// vice versa. Positions more than one region-width out stay out of bounds
/// after a single call; callers wrap every tick, so bodies never get that far.
pub fn wrap(region: &Region, pos: Vec2) -> Vec2 {
    let (min, max) = (region.min(), region.max());
    Vec2::new(wrap_axis(pos.x, min.x, max.x), wrap_axis(pos.y, min.y, max.y))
}

fn wrap_axis(p: f32, min: f32, max: f32) -> f32 {
    if p < min {
        max - (min - p)
    } else if p > max {
        min + (p - max)
    } else {
        p
    }
}

/// Holds the current world bounds; owns no entities.
#[derive(Debug, Clone)]
pub struct BoundaryWrapper {
    region: Region,
}

impl BoundaryWrapper {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Replace the bounds used by subsequent calls.
    pub fn set_bounds(&mut self, region: Region) {
        self.region = region;
    }

    pub fn bounds(&self) -> &Region {
        &self.region
    }

    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        wrap(&self.region, pos)
    }

    /// Wrap every movable body once. Returns how many were teleported.
    pub fn wrap_bodies(&self, sim: &mut impl Simulation) -> usize {
        let mut moved = 0;
        for body in sim.bodies().into_iter().filter(|b| !b.is_static) {
            let wrapped = self.wrap(body.pos);
            if wrapped != body.pos {
                sim.set_position(body.id, wrapped);
                moved += 1;
            }
        }
        moved
    }
}
