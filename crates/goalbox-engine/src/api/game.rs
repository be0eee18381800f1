use glam::Vec2;

use crate::api::sim::{BodyView, Simulation};
use crate::api::types::{EntityId, GameEvent, Scoreboard};
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::systems::debug::DebugLines;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum simulation steps per browser frame (default: 10).
    pub max_steps_per_frame: u32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of body snapshots per frame (default: 256).
    pub max_bodies: usize,
    /// Maximum number of debug overlay segments per frame (default: 4096).
    pub max_debug_segments: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector. Y points down, so positive Y pulls toward the floor.
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_width: 800.0,
            world_height: 600.0,
            max_bodies: 256,
            max_debug_segments: 4096,
            max_events: 32,
            gravity: Vec2::ZERO,
        }
    }
}

/// The contract every game fulfils.
///
/// Per fixed step the runner calls `update` (input), integrates physics, then
/// calls `after_physics` (collision handling, polling, wrapping). `render` runs
/// once per frame after all steps.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Consume input for this step. Runs before integration.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// React to the step that just ran: collisions, containment, scoring.
    fn after_physics(&mut self, _ctx: &mut EngineContext) {}

    /// The canvas changed size; world units follow canvas pixels.
    fn resize(&mut self, _ctx: &mut EngineContext, _width: f32, _height: f32) {}

    /// Apply a JSON configuration document supplied by the host page.
    fn configure(&mut self, _ctx: &mut EngineContext, _json: &str) {}

    /// Current score summary for the UI. Games without scoring keep the default.
    fn scoreboard(&self) -> Scoreboard {
        Scoreboard::default()
    }

    /// Optional per-frame pass for overlay output.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    pub physics: PhysicsWorld,
    /// Whether the collider overlay is drawn. Persisted by the web bridge.
    pub debug_mode: bool,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
    elapsed: f32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_gravity(Vec2::ZERO)
    }

    /// Create an EngineContext with a custom gravity vector.
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            scene: Scene::new(),
            events: Vec::new(),
            physics: PhysicsWorld::new(gravity),
            debug_mode: false,
            next_id: 1,
            collision_events: Vec::new(),
            elapsed: 0.0,
        }
    }

    /// Gravity and timestep taken from the game's configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut ctx = Self::with_gravity(config.gravity);
        ctx.physics.set_dt(config.fixed_dt);
        ctx
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Simulated seconds since the context was created.
    pub fn time(&self) -> f32 {
        self.elapsed
    }

    /// Spawn an entity with a physics body. Position, shape and static flag
    /// are taken from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_shape(desc.collider)
            .with_static(desc.is_static())
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    /// Returns `false` when the entity was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Get the linear velocity of an entity's physics body.
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the runner between `Game::update` and `Game::after_physics`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
        self.elapsed += self.physics.dt();
    }

    fn view(entity: &Entity) -> Option<BodyView> {
        let shape = entity.shape?;
        Some(BodyView {
            id: entity.id,
            pos: entity.pos,
            is_static: entity.is_static,
            shape: shape.class(),
        })
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for EngineContext {
    fn spawn_body(&mut self, tag: &str, desc: BodyDesc, material: ColliderMaterial) -> EntityId {
        let id = self.next_id();
        self.spawn_with_body(Entity::new(id).with_tag(tag), desc, material)
    }

    fn remove_body(&mut self, id: EntityId) -> bool {
        self.despawn(id)
    }

    fn body(&self, id: EntityId) -> Option<BodyView> {
        self.scene
            .get(id)
            .filter(|e| e.active && e.body.is_some())
            .and_then(Self::view)
    }

    fn bodies(&self) -> Vec<BodyView> {
        self.scene
            .iter()
            .filter(|e| e.active && e.body.is_some())
            .filter_map(Self::view)
            .collect()
    }

    fn query_point(&self, point: Vec2) -> Vec<EntityId> {
        self.physics
            .query_point(point)
            .into_iter()
            .filter(|id| self.scene.get(*id).is_some_and(|e| e.active))
            .collect()
    }

    fn apply_force_at(&mut self, id: EntityId, point: Vec2, force: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.apply_impulse_at_point(&body, force, point);
        }
    }

    fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            if let Some(body) = &entity.body {
                self.physics.set_translation(body, pos);
            }
            entity.pos = pos;
        }
    }
}

/// Per-frame overlay context handed to `Game::render`.
pub struct RenderContext<'a> {
    pub debug_mode: bool,
    pub debug_lines: &'a mut DebugLines,
}
