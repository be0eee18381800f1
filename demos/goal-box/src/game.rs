//! Goal-box sandbox: knock the shapes into the open box in the bottom-right
//! corner. Every shape collected scores a point; each nudge counts as an
//! attempt. The round ends when nothing movable is left.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use goalbox_engine::{
    BoundaryWrapper, Collected, CollectionZone, DebugColor, EngineContext, EntityId, Game,
    GameConfig, GameEvent, GameSession, GeometryError, InputQueue, Region, RenderContext, Rng,
    Scoreboard, SessionEvent, Simulation, ZoneConfig,
};
use serde::Deserialize;

use crate::input::{Action, InputConfig, InputHandler};
use crate::shapes::{seed_area, spawn_ground, spawn_initial_shapes, SHAPE_TAG};

const WORLD_W: f32 = 980.0;
const WORLD_H: f32 = 600.0;
const GRAVITY: f32 = 600.0;
const RNG_SEED: u64 = 0x5eed_b0c5;

/// Game event kinds to the UI
///
/// GAME_OVER is only raised after a collection. Deleting the last movable
/// shape leaves the round in play with nothing to score; the UI offers
/// restart (R or the RESET custom event) for that case.
pub mod game_events {
    pub const SCORE: f32 = 1.0;
    pub const GAME_OVER: f32 = 2.0;
    pub const COLLECTED: f32 = 3.0;
    pub const DEBUG_MODE: f32 = 4.0;
}

/// JSON document accepted by `game_load_config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    zone: ZoneConfig,
    input: InputConfig,
}

/// Everything whose layout depends on the world size.
struct Arena {
    world: Vec2,
    zone: CollectionZone,
    wrapper: BoundaryWrapper,
    ground: Option<EntityId>,
}

impl Arena {
    fn build(sim: &mut impl Simulation, world: Vec2, config: ZoneConfig) -> Result<Self, GeometryError> {
        let bounds = Region::from_size(world.x, world.y)?;
        let zone = CollectionZone::new(sim, world.x, world.y, config)?;
        let ground = spawn_ground(sim, world, zone.region());
        Ok(Self {
            world,
            zone,
            wrapper: BoundaryWrapper::new(bounds),
            ground,
        })
    }

    fn resize(&mut self, sim: &mut impl Simulation, world: Vec2) -> Result<(), GeometryError> {
        let bounds = Region::from_size(world.x, world.y)?;
        self.zone.resize(sim, world.x, world.y)?;
        self.wrapper.set_bounds(bounds);
        self.world = world;
        self.rebuild_ground(sim);
        Ok(())
    }

    /// Swap in a zone built from `config`. The old walls go only once the
    /// new zone exists.
    fn reconfigure(&mut self, sim: &mut impl Simulation, config: ZoneConfig) -> Result<(), GeometryError> {
        let zone = CollectionZone::new(sim, self.world.x, self.world.y, config)?;
        for id in self.zone.walls() {
            sim.remove_body(*id);
        }
        self.zone = zone;
        self.rebuild_ground(sim);
        Ok(())
    }

    fn rebuild_ground(&mut self, sim: &mut impl Simulation) {
        if let Some(id) = self.ground.take() {
            sim.remove_body(id);
        }
        self.ground = spawn_ground(sim, self.world, self.zone.region());
    }
}

pub struct GoalBoxGame {
    session: GameSession,
    arena: Option<Arena>,
    input: InputHandler,
    rng: Rng,
    zone_config: ZoneConfig,
    /// Session notifications waiting to become UI events.
    outbox: Rc<RefCell<Vec<SessionEvent>>>,
    /// Set by the session's restart hook; the scene is rebuilt on the next step.
    restart_requested: Rc<Cell<bool>>,
    collected: Vec<Collected>,
}

impl GoalBoxGame {
    pub fn new() -> Self {
        let mut session = GameSession::new();

        let outbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outbox);
        session.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(*event));

        let restart_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&restart_requested);
        session.set_restart_hook(move || flag.set(true));

        Self {
            session,
            arena: None,
            input: InputHandler::default(),
            rng: Rng::new(RNG_SEED),
            zone_config: ZoneConfig::default(),
            outbox,
            restart_requested,
            collected: Vec::new(),
        }
    }

    /// Drop every shape and deal a fresh set.
    fn populate(&mut self, ctx: &mut EngineContext) {
        for id in ctx.scene.ids_with_tag(SHAPE_TAG) {
            ctx.remove_body(id);
        }
        let Some(arena) = &self.arena else {
            return;
        };
        let count = match seed_area(arena.world, arena.zone.region()) {
            Some(area) => spawn_initial_shapes(ctx, &mut self.rng, &area).len(),
            None => {
                log::warn!("World too small to place shapes");
                0
            }
        };
        self.session.set_initial_body_count(count);
        self.input.reset();
        log::info!("Round started with {} shapes", count);
    }

    /// Turn pending session notifications into UI events.
    fn flush_session_events(&mut self, ctx: &mut EngineContext) {
        let pending: Vec<SessionEvent> = self.outbox.borrow_mut().drain(..).collect();
        if pending.is_empty() {
            return;
        }
        ctx.emit_event(GameEvent::new(
            game_events::SCORE,
            self.session.score() as f32,
            self.session.attempts() as f32,
            0.0,
        ));
        for event in pending {
            if let SessionEvent::GameOver { score, attempts, ratio } = event {
                ctx.emit_event(GameEvent::new(
                    game_events::GAME_OVER,
                    score as f32,
                    attempts as f32,
                    ratio,
                ));
            }
        }
    }
}

impl Default for GoalBoxGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GoalBoxGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            gravity: Vec2::new(0.0, GRAVITY),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        match Arena::build(ctx, Vec2::new(WORLD_W, WORLD_H), self.zone_config) {
            Ok(arena) => self.arena = Some(arena),
            Err(e) => log::error!("Cannot lay out the goal box: {}", e),
        }
        self.populate(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let target = match &self.arena {
            Some(arena) => arena.zone.region().center(),
            None => Vec2::ZERO,
        };
        let now = ctx.time();

        for event in input.iter() {
            match self.input.handle(event, ctx, &mut self.rng, now, target) {
                Some(Action::Nudged(_)) => self.session.add_attempt(1),
                Some(Action::ToggleDebug) => {
                    ctx.debug_mode = !ctx.debug_mode;
                    log::info!("Debug overlay {}", if ctx.debug_mode { "on" } else { "off" });
                    ctx.emit_event(GameEvent::new(
                        game_events::DEBUG_MODE,
                        if ctx.debug_mode { 1.0 } else { 0.0 },
                        0.0,
                        0.0,
                    ));
                }
                Some(Action::Restart) => self.session.reset(),
                // Deleting never scores, so it cannot end the round even when
                // it removes the last movable shape.
                Some(Action::Spawned(_)) | Some(Action::Deleted(_)) | None => {}
            }
        }

        if self.restart_requested.replace(false) {
            self.populate(ctx);
        }
        self.flush_session_events(ctx);
    }

    fn after_physics(&mut self, ctx: &mut EngineContext) {
        let Some(arena) = &self.arena else {
            return;
        };

        self.collected.clear();
        let pairs = ctx.collisions().to_vec();
        for pair in &pairs {
            arena.zone.on_collision_start(ctx, pair, &mut self.collected);
        }
        arena.zone.on_tick(ctx, &mut self.collected);

        if !self.collected.is_empty() {
            self.session
                .add_score(self.collected.len() as u32, ctx.movable_count());
            for c in &self.collected {
                ctx.emit_event(GameEvent::new(
                    game_events::COLLECTED,
                    c.position.x,
                    c.position.y,
                    c.shape.code(),
                ));
            }
        }

        arena.wrapper.wrap_bodies(ctx);
        self.flush_session_events(ctx);
    }

    fn resize(&mut self, ctx: &mut EngineContext, width: f32, height: f32) {
        let Some(arena) = self.arena.as_mut() else {
            return;
        };
        if let Err(e) = arena.resize(ctx, Vec2::new(width, height)) {
            log::warn!("Keeping previous layout: {}", e);
        }
    }

    fn configure(&mut self, ctx: &mut EngineContext, json: &str) {
        let settings: Settings = match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring config: {}", e);
                return;
            }
        };
        self.input.set_config(settings.input);
        if let Some(arena) = self.arena.as_mut() {
            if let Err(e) = arena.reconfigure(ctx, settings.zone) {
                log::warn!("Keeping previous goal box: {}", e);
                return;
            }
        }
        self.zone_config = settings.zone;
    }

    fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.session.score(),
            attempts: self.session.attempts(),
            is_over: self.session.is_over(),
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        if !ctx.debug_mode {
            return;
        }
        let Some(arena) = &self.arena else {
            return;
        };
        let goal = arena.zone.region();
        ctx.debug_lines.add_rect(goal.min(), goal.max(), DebugColor::GoalRegion);
        if let Some(settled) = arena.zone.settled_region() {
            ctx.debug_lines
                .add_rect(settled.min(), settled.max(), DebugColor::SettledRegion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::INITIAL_SHAPES;
    use goalbox_engine::{DebugLines, InputEvent, Phase};

    fn start() -> (GoalBoxGame, EngineContext) {
        let mut game = GoalBoxGame::new();
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    fn events_of(ctx: &EngineContext, kind: f32) -> Vec<GameEvent> {
        ctx.events.iter().copied().filter(|e| e.kind == kind).collect()
    }

    fn shapes(ctx: &EngineContext) -> Vec<EntityId> {
        ctx.scene.ids_with_tag(SHAPE_TAG)
    }

    #[test]
    fn init_builds_the_scene() {
        let (game, ctx) = start();
        assert_eq!(shapes(&ctx).len(), INITIAL_SHAPES);
        assert_eq!(ctx.movable_count(), INITIAL_SHAPES);
        // ground + three walls
        assert_eq!(ctx.bodies().len(), INITIAL_SHAPES + 4);
        assert_eq!(game.session.initial_body_count(), INITIAL_SHAPES);
        assert_eq!(game.scoreboard(), Scoreboard::default());
    }

    #[test]
    fn settled_shape_scores() {
        let (mut game, mut ctx) = start();
        let id = shapes(&ctx)[0];
        ctx.set_position(id, Vec2::new(750.0, 480.0));

        game.after_physics(&mut ctx);

        assert!(ctx.body(id).is_none());
        assert_eq!(game.scoreboard().score, 1);
        let collected = events_of(&ctx, game_events::COLLECTED);
        assert_eq!(collected.len(), 1);
        assert_eq!((collected[0].a, collected[0].b), (750.0, 480.0));
        assert_eq!(events_of(&ctx, game_events::SCORE).len(), 1);
        assert!(events_of(&ctx, game_events::GAME_OVER).is_empty());
    }

    #[test]
    fn collecting_everything_ends_the_round() {
        let (mut game, mut ctx) = start();
        for (i, id) in shapes(&ctx).into_iter().enumerate() {
            ctx.set_position(id, Vec2::new(710.0 + i as f32 * 14.0, 490.0));
        }

        game.after_physics(&mut ctx);

        let board = game.scoreboard();
        assert_eq!(board.score, INITIAL_SHAPES as u32);
        assert!(board.is_over);
        let over = events_of(&ctx, game_events::GAME_OVER);
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].a, INITIAL_SHAPES as f32);
        assert_eq!(over[0].c, 0.0);
    }

    #[test]
    fn escaped_shapes_wrap_around() {
        let (mut game, mut ctx) = start();
        let id = shapes(&ctx)[0];
        ctx.set_position(id, Vec2::new(-10.0, 300.0));
        game.after_physics(&mut ctx);
        assert_eq!(ctx.body(id).unwrap().pos, Vec2::new(970.0, 300.0));
    }

    #[test]
    fn click_on_wrapped_shape_nudges_it() {
        let (mut game, mut ctx) = start();
        let id = shapes(&ctx)[0];
        ctx.set_position(id, Vec2::new(-10.0, 300.0));
        game.after_physics(&mut ctx);

        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown { x: 970.0, y: 300.0 });
        game.update(&mut ctx, &input);

        assert_eq!(game.scoreboard().attempts, 1);
        assert_eq!(ctx.movable_count(), INITIAL_SHAPES);
    }

    #[test]
    fn deleting_the_last_shape_keeps_the_round_open() {
        let (mut game, mut ctx) = start();
        let ids = shapes(&ctx);
        for id in &ids[1..] {
            ctx.remove_body(*id);
        }
        let last = ids[0];
        ctx.set_position(last, Vec2::new(300.0, 150.0));

        let mut input = InputQueue::new();
        input.push(InputEvent::PointerMove { x: 300.0, y: 150.0 });
        input.push(InputEvent::KeyDown { key_code: 46 });
        game.update(&mut ctx, &input);

        assert!(ctx.body(last).is_none());
        assert_eq!(ctx.movable_count(), 0);
        assert_eq!(game.session.phase(), Phase::Playing);
        assert!(!game.scoreboard().is_over);
        assert!(events_of(&ctx, game_events::GAME_OVER).is_empty());
    }

    #[test]
    fn nudge_counts_an_attempt() {
        let (mut game, mut ctx) = start();
        let id = shapes(&ctx)[0];
        let pos = ctx.body(id).unwrap().pos;
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown { x: pos.x, y: pos.y });

        game.update(&mut ctx, &input);

        assert_eq!(game.scoreboard().attempts, 1);
        let score = events_of(&ctx, game_events::SCORE);
        assert_eq!(score.len(), 1);
        assert_eq!(score[0].b, 1.0);
    }

    #[test]
    fn restart_key_rebuilds_after_game_over() {
        let (mut game, mut ctx) = start();
        for id in shapes(&ctx) {
            ctx.set_position(id, Vec2::new(790.0, 490.0));
        }
        game.after_physics(&mut ctx);
        assert!(game.scoreboard().is_over);
        assert!(shapes(&ctx).is_empty());

        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key_code: 82 });
        game.update(&mut ctx, &input);

        assert_eq!(game.scoreboard(), Scoreboard::default());
        assert_eq!(shapes(&ctx).len(), INITIAL_SHAPES);
        assert_eq!(ctx.bodies().len(), INITIAL_SHAPES + 4);
    }

    #[test]
    fn debug_key_toggles_overlay() {
        let (mut game, mut ctx) = start();
        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key_code: 68 });
        game.update(&mut ctx, &input);

        assert!(ctx.debug_mode);
        let ev = events_of(&ctx, game_events::DEBUG_MODE);
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].a, 1.0);

        let mut lines = DebugLines::with_capacity(64);
        game.render(&mut RenderContext { debug_mode: true, debug_lines: &mut lines });
        // goal box and settled region outlines
        assert_eq!(lines.segment_count(), 8);
    }

    #[test]
    fn resize_moves_the_goal_box() {
        let (mut game, mut ctx) = start();
        let before = shapes(&ctx);
        game.resize(&mut ctx, 1280.0, 720.0);

        let arena = game.arena.as_ref().unwrap();
        assert_eq!(arena.zone.region().min(), Vec2::new(1000.0, 490.0));
        assert_eq!(arena.wrapper.bounds().width(), 1280.0);
        assert_eq!(shapes(&ctx), before);
        assert_eq!(ctx.bodies().len(), INITIAL_SHAPES + 4);

        // Too small: layout stays
        game.resize(&mut ctx, 100.0, 100.0);
        let arena = game.arena.as_ref().unwrap();
        assert_eq!(arena.zone.region().min(), Vec2::new(1000.0, 490.0));
    }

    #[test]
    fn configure_rebuilds_zone() {
        let (mut game, mut ctx) = start();
        game.configure(&mut ctx, r#"{ "zone": { "box_width": 200.0 } }"#);
        let arena = game.arena.as_ref().unwrap();
        assert_eq!(arena.zone.region().min().x, 680.0);
        assert_eq!(ctx.bodies().len(), INITIAL_SHAPES + 4);

        game.configure(&mut ctx, "not json");
        assert_eq!(game.zone_config.box_width, 200.0);
    }
}
