//! The goal box: an open-top container near the bottom-right corner of the
//! world. Bodies are collected either by settling into its lower part
//! (polling, once per step) or by touching one of its walls while their centre
//! is inside the box (collision path).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::sim::Simulation;
use crate::api::types::EntityId;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionPair, ShapeClass};
use crate::error::GeometryError;
use crate::gameplay::region::Region;

pub const BOX_WIDTH: f32 = 180.0;
pub const BOX_HEIGHT: f32 = 140.0;
pub const BOX_RIGHT_MARGIN: f32 = 100.0;
pub const BOX_BOTTOM_MARGIN: f32 = 90.0;
pub const BOX_WALL_THICKNESS: f32 = 10.0;
pub const SETTLED_INSET: f32 = 85.0;

/// Tag given to the zone's own wall entities.
pub const WALL_TAG: &str = "goal_wall";

/// Goal box dimensions. Any field missing from JSON keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub right_margin: f32,
    pub bottom_margin: f32,
    pub wall_thickness: f32,
    pub settled_inset: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            box_width: BOX_WIDTH,
            box_height: BOX_HEIGHT,
            right_margin: BOX_RIGHT_MARGIN,
            bottom_margin: BOX_BOTTOM_MARGIN,
            wall_thickness: BOX_WALL_THICKNESS,
            settled_inset: SETTLED_INSET,
        }
    }
}

impl ZoneConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Goal region for a world of the given size, anchored at fixed offsets from
/// the bottom-right corner.
pub fn goal_geometry(width: f32, height: f32, config: &ZoneConfig) -> Result<Region, GeometryError> {
    let min_x = width - config.right_margin - config.box_width;
    let min_y = height - config.bottom_margin - config.box_height;
    if !(min_x >= 0.0) || !(min_y >= 0.0) {
        return Err(GeometryError::WorldTooSmall { width, height });
    }
    let min = Vec2::new(min_x, min_y);
    Region::new(min, min + Vec2::new(config.box_width, config.box_height))
}

/// One entity taken out of the world by the zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub id: EntityId,
    pub position: Vec2,
    pub shape: ShapeClass,
}

#[derive(Debug)]
pub struct CollectionZone {
    config: ZoneConfig,
    region: Region,
    settled: Option<Region>,
    walls: Vec<EntityId>,
}

impl CollectionZone {
    /// Compute the geometry for a `width` x `height` world and spawn the walls.
    pub fn new(
        sim: &mut impl Simulation,
        width: f32,
        height: f32,
        config: ZoneConfig,
    ) -> Result<Self, GeometryError> {
        let region = goal_geometry(width, height, &config)?;
        let mut zone = Self {
            config,
            region,
            settled: region.inset_top(config.settled_inset),
            walls: Vec::new(),
        };
        zone.spawn_walls(sim);
        log::info!(
            "Goal box at ({}, {})..({}, {})",
            region.min().x,
            region.min().y,
            region.max().x,
            region.max().y
        );
        Ok(zone)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// `None` when the inset leaves no room; only the collision path collects then.
    pub fn settled_region(&self) -> Option<&Region> {
        self.settled.as_ref()
    }

    pub fn walls(&self) -> &[EntityId] {
        &self.walls
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn is_wall(&self, id: EntityId) -> bool {
        self.walls.contains(&id)
    }

    /// Polling path: remove every movable body resting in the settled region.
    pub fn on_tick(&self, sim: &mut impl Simulation, out: &mut Vec<Collected>) {
        let Some(settled) = self.settled else {
            return;
        };
        let candidates: Vec<_> = sim
            .bodies()
            .into_iter()
            .filter(|b| !b.is_static && settled.contains(b.pos))
            .collect();
        for body in candidates {
            if sim.remove_body(body.id) {
                log::debug!("Collected {:?} (settled) at {:?}", body.id, body.pos);
                out.push(Collected {
                    id: body.id,
                    position: body.pos,
                    shape: body.shape,
                });
            }
        }
    }

    /// Collision path: a movable body touching exactly one of our walls with
    /// its centre inside the box is collected.
    pub fn on_collision_start(
        &self,
        sim: &mut impl Simulation,
        pair: &CollisionPair,
        out: &mut Vec<Collected>,
    ) {
        if !pair.started {
            return;
        }
        let other = match (self.is_wall(pair.entity_a), self.is_wall(pair.entity_b)) {
            (true, false) => pair.entity_b,
            (false, true) => pair.entity_a,
            _ => return,
        };
        let Some(body) = sim.body(other) else {
            return;
        };
        if body.is_static || !self.region.contains(body.pos) {
            return;
        }
        if sim.remove_body(other) {
            log::debug!("Collected {:?} (contact) at {:?}", other, body.pos);
            out.push(Collected {
                id: other,
                position: body.pos,
                shape: body.shape,
            });
        }
    }

    /// Recompute geometry for the new world size and rebuild the walls.
    /// On error nothing changes.
    pub fn resize(&mut self, sim: &mut impl Simulation, width: f32, height: f32) -> Result<(), GeometryError> {
        let region = goal_geometry(width, height, &self.config)?;
        for id in self.walls.drain(..) {
            sim.remove_body(id);
        }
        self.region = region;
        self.settled = region.inset_top(self.config.settled_inset);
        self.spawn_walls(sim);
        log::info!("Goal box resized for {}x{} world", width, height);
        Ok(())
    }

    /// Left, right and floor walls hugging the region from outside.
    fn spawn_walls(&mut self, sim: &mut impl Simulation) {
        let t = self.config.wall_thickness;
        let (min, max) = (self.region.min(), self.region.max());
        let side_half_height = (self.region.height() + t) * 0.5;
        let side_center_y = min.y + side_half_height;

        let walls = [
            (Vec2::new(min.x - t * 0.5, side_center_y), t * 0.5, side_half_height),
            (Vec2::new(max.x + t * 0.5, side_center_y), t * 0.5, side_half_height),
            (
                Vec2::new(self.region.center().x, max.y + t * 0.5),
                self.region.width() * 0.5 + t,
                t * 0.5,
            ),
        ];
        for (pos, half_width, half_height) in walls {
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid { half_width, half_height }).with_position(pos);
            let id = sim.spawn_body(WALL_TAG, desc, ColliderMaterial::default());
            self.walls.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::{EngineContext, GameConfig};

    fn ball_at(ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        ctx.spawn_body(
            "shape",
            BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }).with_position(pos),
            ColliderMaterial::default(),
        )
    }

    fn zone(ctx: &mut EngineContext) -> CollectionZone {
        CollectionZone::new(ctx, 980.0, 600.0, ZoneConfig::default()).unwrap()
    }

    #[test]
    fn geometry_for_default_world() {
        let region = goal_geometry(980.0, 600.0, &ZoneConfig::default()).unwrap();
        assert_eq!(region.min(), Vec2::new(700.0, 370.0));
        assert_eq!(region.max(), Vec2::new(880.0, 510.0));
    }

    #[test]
    fn tiny_world_is_rejected() {
        let err = goal_geometry(200.0, 600.0, &ZoneConfig::default()).unwrap_err();
        assert_eq!(err, GeometryError::WorldTooSmall { width: 200.0, height: 600.0 });
        assert!(goal_geometry(f32::NAN, 600.0, &ZoneConfig::default()).is_err());
    }

    #[test]
    fn config_from_partial_json() {
        let cfg = ZoneConfig::from_json(r#"{ "settled_inset": 40.0 }"#).unwrap();
        assert_eq!(cfg.settled_inset, 40.0);
        assert_eq!(cfg.box_width, BOX_WIDTH);
        assert!(ZoneConfig::from_json("not json").is_err());
    }

    #[test]
    fn spawns_three_static_walls_outside_the_region() {
        let mut ctx = EngineContext::new();
        let zone = zone(&mut ctx);
        assert_eq!(zone.walls().len(), 3);
        for id in zone.walls() {
            let body = ctx.body(*id).unwrap();
            assert!(body.is_static);
            assert!(!zone.region().contains(body.pos));
        }
        assert_eq!(ctx.scene.ids_with_tag(WALL_TAG).len(), 3);
    }

    #[test]
    fn polling_collects_settled_bodies_only() {
        let mut ctx = EngineContext::new();
        let zone = zone(&mut ctx);
        let settled = ball_at(&mut ctx, Vec2::new(750.0, 480.0));
        let hovering = ball_at(&mut ctx, Vec2::new(750.0, 430.0));
        let outside = ball_at(&mut ctx, Vec2::new(100.0, 100.0));

        let mut out = Vec::new();
        zone.on_tick(&mut ctx, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, settled);
        assert_eq!(out[0].position, Vec2::new(750.0, 480.0));
        assert_eq!(out[0].shape, ShapeClass::Circle);
        assert!(ctx.body(settled).is_none());
        assert!(ctx.body(hovering).is_some());
        assert!(ctx.body(outside).is_some());

        // Second pass finds nothing new
        zone.on_tick(&mut ctx, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn collision_with_wall_collects_body_inside_region() {
        let mut ctx = EngineContext::new();
        let zone = zone(&mut ctx);
        let wall = zone.walls()[0];
        let id = ball_at(&mut ctx, Vec2::new(750.0, 420.0));

        let mut out = Vec::new();
        let pair = CollisionPair { entity_a: id, entity_b: wall, started: true };
        zone.on_collision_start(&mut ctx, &pair, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, id);
        assert!(ctx.body(id).is_none());

        // Already gone: no second event
        zone.on_collision_start(&mut ctx, &pair, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn collision_path_ignores_irrelevant_pairs() {
        let mut ctx = EngineContext::new();
        let zone = zone(&mut ctx);
        let (left, right) = (zone.walls()[0], zone.walls()[1]);
        let inside = ball_at(&mut ctx, Vec2::new(750.0, 420.0));
        let outside = ball_at(&mut ctx, Vec2::new(690.0, 420.0));
        let other = ball_at(&mut ctx, Vec2::new(100.0, 100.0));

        let mut out = Vec::new();
        let pairs = [
            CollisionPair { entity_a: inside, entity_b: left, started: false },
            CollisionPair { entity_a: left, entity_b: right, started: true },
            CollisionPair { entity_a: inside, entity_b: other, started: true },
            CollisionPair { entity_a: left, entity_b: outside, started: true },
        ];
        for pair in &pairs {
            zone.on_collision_start(&mut ctx, pair, &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(ctx.bodies().len(), 6);
    }

    #[test]
    fn falling_body_is_collected_on_contact() {
        let config = GameConfig {
            gravity: Vec2::new(0.0, 600.0),
            ..GameConfig::default()
        };
        let mut ctx = EngineContext::from_config(&config);
        let zone = zone(&mut ctx);
        let id = ball_at(&mut ctx, Vec2::new(790.0, 400.0));

        let mut out = Vec::new();
        for _ in 0..180 {
            ctx.step_physics();
            let pairs = ctx.collisions().to_vec();
            for pair in &pairs {
                zone.on_collision_start(&mut ctx, pair, &mut out);
            }
            if !out.is_empty() {
                break;
            }
        }
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, id);
        assert!(zone.region().contains(out[0].position));
    }

    #[test]
    fn shallow_box_has_no_settled_region() {
        let mut ctx = EngineContext::new();
        let cfg = ZoneConfig { box_height: 60.0, ..ZoneConfig::default() };
        let zone = CollectionZone::new(&mut ctx, 980.0, 600.0, cfg).unwrap();
        assert!(zone.settled_region().is_none());

        let id = ball_at(&mut ctx, zone.region().center());
        let mut out = Vec::new();
        zone.on_tick(&mut ctx, &mut out);
        assert!(out.is_empty());
        assert!(ctx.body(id).is_some());
    }

    #[test]
    fn resize_rebuilds_only_walls() {
        let mut ctx = EngineContext::new();
        let mut zone = zone(&mut ctx);
        let old_walls = zone.walls().to_vec();
        let shape = ball_at(&mut ctx, Vec2::new(100.0, 100.0));

        zone.resize(&mut ctx, 1280.0, 720.0).unwrap();

        assert_eq!(zone.region().min(), Vec2::new(1000.0, 490.0));
        assert_eq!(zone.walls().len(), 3);
        for id in &old_walls {
            assert!(ctx.body(*id).is_none());
            assert!(!zone.is_wall(*id));
        }
        assert_eq!(ctx.body(shape).unwrap().pos, Vec2::new(100.0, 100.0));
        assert_eq!(ctx.bodies().len(), 4);
    }

    #[test]
    fn failed_resize_keeps_geometry() {
        let mut ctx = EngineContext::new();
        let mut zone = zone(&mut ctx);
        let walls = zone.walls().to_vec();

        assert!(zone.resize(&mut ctx, 100.0, 100.0).is_err());
        assert_eq!(zone.region().min(), Vec2::new(700.0, 370.0));
        assert_eq!(zone.walls(), walls.as_slice());
        assert_eq!(ctx.bodies().len(), 3);
    }
}
