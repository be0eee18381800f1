//! The narrow seam between gameplay rules and the physics engine.
//!
//! Gameplay code (`CollectionZone`, `BoundaryWrapper`, input handling) never
//! touches Rapier or the scene directly. It asks for snapshots of bodies and
//! requests membership changes, forces and teleports through this trait.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::physics::{BodyDesc, ColliderMaterial, ShapeClass};

/// Read-only view of one simulated body, taken at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: EntityId,
    pub pos: Vec2,
    pub is_static: bool,
    pub shape: ShapeClass,
}

pub trait Simulation {
    /// Add a body to the simulation and return its entity id.
    fn spawn_body(&mut self, tag: &str, desc: BodyDesc, material: ColliderMaterial) -> EntityId;

    /// Remove a body. Returns `false` (and does nothing) if it was already gone.
    fn remove_body(&mut self, id: EntityId) -> bool;

    fn body(&self, id: EntityId) -> Option<BodyView>;

    /// Snapshot of every active body, in scene order.
    fn bodies(&self) -> Vec<BodyView>;

    /// Bodies whose shape contains `point`. Order is stable within a call.
    fn query_point(&self, point: Vec2) -> Vec<EntityId>;

    /// Impulse applied at a world-space point. No-op for unknown ids.
    fn apply_force_at(&mut self, id: EntityId, point: Vec2, force: Vec2);

    /// Teleport a body. No-op for unknown ids.
    fn set_position(&mut self, id: EntityId, pos: Vec2);

    fn movable_count(&self) -> usize {
        self.bodies().iter().filter(|b| !b.is_static).count()
    }
}
