use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::physics::{ColliderDesc, PhysicsBody};

/// Fat Entity: one struct with optional physics data.
/// The physics world owns the motion; positions are synced back after each step.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by role ("ground", "goal_wall", "shape").
    pub tag: String,
    /// Inactive entities are skipped by snapshots and debug drawing.
    pub active: bool,
    /// Position in world space (centre of the body).
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Static entities never move and are never collected.
    pub is_static: bool,
    /// Collider shape, kept for rendering and classification.
    pub shape: Option<ColliderDesc>,
    /// Physics body handles.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            is_static: false,
            shape: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_shape(mut self, shape: ColliderDesc) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
