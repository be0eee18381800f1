use bytemuck::{Pod, Zeroable};

use crate::components::entity::Entity;
use crate::core::physics::ColliderDesc;

/// Per-body render data read by the TypeScript canvas renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodySnapshot {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    /// `ShapeClass::code()`.
    pub shape: f32,
    /// Radius for circles and polygons, half width for rectangles.
    pub size_a: f32,
    /// Half height for rectangles, zero otherwise.
    pub size_b: f32,
    /// 1.0 for static bodies.
    pub is_static: f32,
    /// Polygon side count, zero otherwise.
    pub sides: f32,
}

impl BodySnapshot {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(entity: &Entity, shape: &ColliderDesc) -> Self {
        let (size_a, size_b, sides) = match *shape {
            ColliderDesc::Ball { radius } => (radius, 0.0, 0.0),
            ColliderDesc::Cuboid { half_width, half_height } => (half_width, half_height, 0.0),
            ColliderDesc::RegularPolygon { sides, radius } => (radius, 0.0, sides as f32),
        };
        Self {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            shape: shape.class().code(),
            size_a,
            size_b,
            is_static: if entity.is_static { 1.0 } else { 0.0 },
            sides,
        }
    }
}

/// Bounded snapshot buffer rebuilt once per frame.
pub struct SnapshotBuffer {
    snapshots: Vec<BodySnapshot>,
    capacity: usize,
}

impl SnapshotBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn snapshots(&self) -> &[BodySnapshot] {
        &self.snapshots
    }

    pub fn body_count(&self) -> u32 {
        self.snapshots.len() as u32
    }

    /// Raw pointer to snapshot data for JS reads out of WASM memory.
    pub fn snapshots_ptr(&self) -> *const f32 {
        self.snapshots.as_ptr() as *const f32
    }
}

/// Rebuild the buffer from a set of entities.
/// Static bodies come first so the renderer draws them underneath.
/// Entities past capacity are dropped with a warning.
pub fn build_snapshot_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut SnapshotBuffer,
) {
    buffer.snapshots.clear();

    let mut movable = Vec::new();
    for entity in entities.filter(|e| e.active) {
        let shape = match &entity.shape {
            Some(s) => s,
            None => continue,
        };
        let snap = BodySnapshot::from_entity(entity, shape);
        if entity.is_static {
            buffer.snapshots.push(snap);
        } else {
            movable.push(snap);
        }
    }
    buffer.snapshots.extend(movable);

    if buffer.snapshots.len() > buffer.capacity {
        log::warn!(
            "snapshot buffer full: dropping {} bodies",
            buffer.snapshots.len() - buffer.capacity
        );
        buffer.snapshots.truncate(buffer.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use glam::Vec2;

    #[test]
    fn snapshot_is_8_floats() {
        assert_eq!(std::mem::size_of::<BodySnapshot>(), BodySnapshot::STRIDE_BYTES);
    }

    #[test]
    fn static_bodies_are_written_first() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(10.0, 20.0))
                .with_shape(ColliderDesc::RegularPolygon { sides: 6, radius: 15.0 }),
            Entity::new(EntityId(2))
                .with_static(true)
                .with_shape(ColliderDesc::Cuboid { half_width: 490.0, half_height: 10.0 }),
            Entity::new(EntityId(3)),
        ];

        let mut buffer = SnapshotBuffer::with_capacity(16);
        build_snapshot_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.body_count(), 2);
        let ground = buffer.snapshots()[0];
        assert_eq!((ground.is_static, ground.size_a, ground.size_b), (1.0, 490.0, 10.0));
        let hex = buffer.snapshots()[1];
        assert_eq!((hex.x, hex.shape, hex.sides), (10.0, 1.0, 6.0));
    }

    #[test]
    fn inactive_entities_are_skipped_and_capacity_enforced() {
        let mut hidden = Entity::new(EntityId(1)).with_shape(ColliderDesc::Ball { radius: 5.0 });
        hidden.active = false;
        let mut entities = vec![hidden];
        for i in 2..6 {
            entities.push(Entity::new(EntityId(i)).with_shape(ColliderDesc::Ball { radius: 5.0 }));
        }

        let mut buffer = SnapshotBuffer::with_capacity(3);
        build_snapshot_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.body_count(), 3);
    }
}
