//! Shape palette: what the sandbox spawns and where.

use glam::Vec2;
use goalbox_engine::{BodyDesc, ColliderDesc, ColliderMaterial, EntityId, Region, Rng, Simulation};

pub const SHAPE_TAG: &str = "shape";
pub const GROUND_TAG: &str = "ground";

/// Shapes placed at the start of every round.
pub const INITIAL_SHAPES: usize = 12;

// Light bodies so a fixed nudge impulse gives a visible kick
const SHAPE_DENSITY: f32 = 0.01;
const SHAPE_RESTITUTION: f32 = 0.25;
const SHAPE_FRICTION: f32 = 0.6;
const LINEAR_DAMPING: f32 = 0.1;
const ANGULAR_DAMPING: f32 = 0.3;

const GROUND_HALF_HEIGHT: f32 = 10.0;
const GROUND_LEFT: f32 = 40.0;
/// Gap between the plank's right end and the goal box.
const GROUND_GAP: f32 = 60.0;
const GROUND_BOTTOM_OFFSET: f32 = 60.0;

pub fn shape_material() -> ColliderMaterial {
    ColliderMaterial {
        restitution: SHAPE_RESTITUTION,
        friction: SHAPE_FRICTION,
        density: SHAPE_DENSITY,
    }
}

/// A circle, a pentagon/hexagon or a rectangle of random size.
pub fn random_shape(rng: &mut Rng) -> ColliderDesc {
    match rng.next_int(3) {
        0 => ColliderDesc::Ball {
            radius: rng.range(14.0, 24.0),
        },
        1 => ColliderDesc::RegularPolygon {
            sides: 5 + rng.next_int(2) as u8,
            radius: rng.range(16.0, 26.0),
        },
        _ => ColliderDesc::Cuboid {
            half_width: rng.range(12.0, 24.0),
            half_height: rng.range(10.0, 18.0),
        },
    }
}

pub fn shape_desc(collider: ColliderDesc, pos: Vec2, rotation: f32) -> BodyDesc {
    BodyDesc::dynamic(collider)
        .with_position(pos)
        .with_rotation(rotation)
        .with_ccd(true)
        .with_linear_damping(LINEAR_DAMPING)
        .with_angular_damping(ANGULAR_DAMPING)
}

pub fn spawn_shape(sim: &mut impl Simulation, rng: &mut Rng, pos: Vec2) -> EntityId {
    let rotation = rng.range(0.0, std::f32::consts::TAU);
    sim.spawn_body(SHAPE_TAG, shape_desc(random_shape(rng), pos, rotation), shape_material())
}

/// Area left of the goal box and in the upper half of the world where
/// the opening shapes are dropped. `None` when the world is too cramped.
pub fn seed_area(world: Vec2, goal: &Region) -> Option<Region> {
    Region::new(
        Vec2::new(60.0, 40.0),
        Vec2::new(goal.min().x - 60.0, world.y * 0.45),
    )
    .ok()
}

pub fn spawn_initial_shapes(sim: &mut impl Simulation, rng: &mut Rng, area: &Region) -> Vec<EntityId> {
    (0..INITIAL_SHAPES)
        .map(|_| {
            let pos = Vec2::new(
                rng.range(area.min().x, area.max().x),
                rng.range(area.min().y, area.max().y),
            );
            spawn_shape(sim, rng, pos)
        })
        .collect()
}

/// Static plank running from the left edge to just short of the goal box.
pub fn spawn_ground(sim: &mut impl Simulation, world: Vec2, goal: &Region) -> Option<EntityId> {
    let right = goal.min().x - GROUND_GAP;
    if right <= GROUND_LEFT {
        log::warn!("No room for the ground plank in a {}x{} world", world.x, world.y);
        return None;
    }
    let half_width = (right - GROUND_LEFT) * 0.5;
    let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
        half_width,
        half_height: GROUND_HALF_HEIGHT,
    })
    .with_position(Vec2::new(GROUND_LEFT + half_width, world.y - GROUND_BOTTOM_OFFSET));
    Some(sim.spawn_body(GROUND_TAG, desc, ColliderMaterial::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalbox_engine::{EngineContext, ShapeClass};

    fn goal() -> Region {
        Region::new(Vec2::new(700.0, 370.0), Vec2::new(880.0, 510.0)).unwrap()
    }

    #[test]
    fn palette_covers_every_class() {
        let mut rng = Rng::new(7);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let class = random_shape(&mut rng).class();
            if !seen.contains(&class) {
                seen.push(class);
            }
        }
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&ShapeClass::Polygon));
    }

    #[test]
    fn polygons_have_five_or_six_sides() {
        let mut rng = Rng::new(3);
        for _ in 0..200 {
            if let ColliderDesc::RegularPolygon { sides, .. } = random_shape(&mut rng) {
                assert!(sides == 5 || sides == 6, "sides={}", sides);
            }
        }
    }

    #[test]
    fn initial_shapes_land_in_seed_area() {
        let mut ctx = EngineContext::new();
        let mut rng = Rng::new(42);
        let area = seed_area(Vec2::new(980.0, 600.0), &goal()).unwrap();
        let ids = spawn_initial_shapes(&mut ctx, &mut rng, &area);

        assert_eq!(ids.len(), INITIAL_SHAPES);
        for id in ids {
            let body = ctx.body(id).unwrap();
            assert!(!body.is_static);
            assert!(body.pos.x >= area.min().x && body.pos.x < area.max().x);
            assert!(!goal().contains(body.pos));
        }
    }

    #[test]
    fn ground_stops_short_of_goal() {
        let mut ctx = EngineContext::new();
        let id = spawn_ground(&mut ctx, Vec2::new(980.0, 600.0), &goal()).unwrap();
        let body = ctx.body(id).unwrap();
        assert!(body.is_static);
        assert_eq!(body.pos, Vec2::new(340.0, 540.0));
    }

    #[test]
    fn cramped_world_has_no_ground() {
        let mut ctx = EngineContext::new();
        let narrow = Region::new(Vec2::new(80.0, 100.0), Vec2::new(200.0, 200.0)).unwrap();
        assert!(spawn_ground(&mut ctx, Vec2::new(400.0, 300.0), &narrow).is_none());
        assert!(seed_area(Vec2::new(400.0, 300.0), &narrow).is_none());
    }
}
