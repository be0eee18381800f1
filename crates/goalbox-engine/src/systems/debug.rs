//! Debug overlay: collider outlines and region frames as flat line segments.
//!
//! The runner calls `debug_draw_colliders()` each frame while debug mode is on;
//! games add their own frames (goal box, settled zone) from `Game::render`.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::core::physics::{regular_polygon_points, ColliderDesc};
use crate::core::scene::Scene;

/// Palette index understood by the TypeScript overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    Dynamic,
    Static,
    GoalRegion,
    SettledRegion,
}

impl DebugColor {
    fn code(self) -> f32 {
        match self {
            DebugColor::Dynamic => 0.0,
            DebugColor::Static => 1.0,
            DebugColor::GoalRegion => 2.0,
            DebugColor::SettledRegion => 3.0,
        }
    }
}

/// One overlay line segment: 5 floats on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DebugSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: f32,
}

impl DebugSegment {
    pub const FLOATS: usize = 5;
}

/// Bounded segment buffer. Segments beyond capacity are dropped.
pub struct DebugLines {
    segments: Vec<DebugSegment>,
    capacity: usize,
}

impl DebugLines {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn add_segment(&mut self, a: Vec2, b: Vec2, color: DebugColor) {
        if self.segments.len() >= self.capacity {
            return;
        }
        self.segments.push(DebugSegment {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
            color: color.code(),
        });
    }

    /// Closed outline through `points`.
    pub fn add_loop(&mut self, points: &[Vec2], color: DebugColor) {
        if points.len() < 2 {
            return;
        }
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.add_segment(a, b, color);
        }
    }

    /// Axis-aligned rectangle outline.
    pub fn add_rect(&mut self, min: Vec2, max: Vec2, color: DebugColor) {
        self.add_loop(
            &[min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            color,
        );
    }

    pub fn segments(&self) -> &[DebugSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> u32 {
        self.segments.len() as u32
    }

    /// Raw pointer to segment data for JS reads out of WASM memory.
    pub fn segments_ptr(&self) -> *const f32 {
        self.segments.as_ptr() as *const f32
    }
}

/// Draw outlines for every active entity that carries a shape.
/// Clears previous segments first.
pub fn debug_draw_colliders(scene: &Scene, lines: &mut DebugLines) {
    lines.clear();
    for entity in scene.iter().filter(|e| e.active) {
        let shape = match &entity.shape {
            Some(s) => s,
            None => continue,
        };
        let color = if entity.is_static {
            DebugColor::Static
        } else {
            DebugColor::Dynamic
        };
        let points = collider_outline(entity.pos, entity.rotation, shape);
        lines.add_loop(&points, color);
    }
}

/// Outline points (unclosed) for a collider shape at a given position and rotation.
fn collider_outline(center: Vec2, rot: f32, shape: &ColliderDesc) -> Vec<Vec2> {
    let rotation = Vec2::from_angle(rot);
    let place = |local: Vec2| center + rotation.rotate(local);
    match *shape {
        ColliderDesc::Ball { radius } => {
            let segments = 24;
            (0..segments)
                .map(|i| {
                    let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
                    place(Vec2::new(angle.cos(), angle.sin()) * radius)
                })
                .collect()
        }
        ColliderDesc::Cuboid { half_width, half_height } => [
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ]
        .into_iter()
        .map(place)
        .collect(),
        ColliderDesc::RegularPolygon { sides, radius } => regular_polygon_points(sides, radius)
            .into_iter()
            .map(place)
            .collect(),
    }
}
