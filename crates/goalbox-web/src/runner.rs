use goalbox_engine::bridge::protocol::HEADER_FLOATS;
use goalbox_engine::{
    build_snapshot_buffer, debug_draw_colliders, DebugLines, EngineContext, FixedTimestep,
    FrameHeader, Game, GameConfig, InputEvent, InputQueue, ProtocolLayout, RenderContext,
    Scoreboard, SnapshotBuffer,
};

use crate::settings::DebugSettings;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly. See [`export_game!`](crate::export_game).
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    snapshots: SnapshotBuffer,
    debug_lines: DebugLines,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    frame: u32,
    initialized: bool,
    /// Last debug flag written to storage.
    persisted_debug: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt, config.max_steps_per_frame);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            snapshots: SnapshotBuffer::with_capacity(config.max_bodies),
            debug_lines: DebugLines::with_capacity(config.max_debug_segments),
            timestep,
            layout,
            config,
            header: [0.0; HEADER_FLOATS],
            frame: 0,
            initialized: false,
            persisted_debug: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        let settings = DebugSettings::load();
        self.ctx.debug_mode = settings.debug_mode;
        self.persisted_debug = settings.debug_mode;

        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish(0);
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one browser frame: fixed steps, then snapshot and overlay buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            // Input is consumed by the first step only
            if step == 0 {
                self.input.drain();
            }
            self.ctx.step_physics();
            self.game.after_physics(&mut self.ctx);
        }

        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "event buffer full: dropping {} events",
                self.ctx.events.len() - self.layout.max_events
            );
            self.ctx.events.truncate(self.layout.max_events);
        }

        self.publish(steps);
        self.frame = self.frame.wrapping_add(1);
    }

    /// The canvas changed size.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.initialized {
            return;
        }
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.game.resize(&mut self.ctx, width, height);
        self.config.world_width = width;
        self.config.world_height = height;
        self.publish(0);
    }

    /// Forward a JSON configuration document to the game.
    pub fn load_config(&mut self, json: &str) {
        if !self.initialized {
            return;
        }
        self.game.configure(&mut self.ctx, json);
    }

    pub fn set_debug_mode(&mut self, on: bool) {
        self.ctx.debug_mode = on;
        self.persist_debug_mode();
    }

    /// Rebuild snapshot, overlay and header buffers from current state.
    fn publish(&mut self, steps: u32) {
        build_snapshot_buffer(self.ctx.scene.iter(), &mut self.snapshots);

        self.debug_lines.clear();
        if self.ctx.debug_mode {
            debug_draw_colliders(&self.ctx.scene, &mut self.debug_lines);
        }
        {
            let mut render_ctx = RenderContext {
                debug_mode: self.ctx.debug_mode,
                debug_lines: &mut self.debug_lines,
            };
            self.game.render(&mut render_ctx);
        }

        FrameHeader {
            frame: self.frame,
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            body_count: self.snapshots.body_count(),
            debug_segment_count: self.debug_lines.segment_count(),
            event_count: self.ctx.events.len() as u32,
            scoreboard: self.game.scoreboard(),
            debug_mode: self.ctx.debug_mode,
            steps,
        }
        .write(&mut self.header);

        self.persist_debug_mode();
    }

    fn persist_debug_mode(&mut self) {
        if self.ctx.debug_mode != self.persisted_debug {
            DebugSettings::new(self.ctx.debug_mode).save();
            self.persisted_debug = self.ctx.debug_mode;
        }
    }

    // ---- Pointer accessors for wasm memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn snapshots_ptr(&self) -> *const f32 {
        self.snapshots.snapshots_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.snapshots.body_count()
    }

    pub fn debug_segments_ptr(&self) -> *const f32 {
        self.debug_lines.segments_ptr()
    }

    pub fn debug_segment_count(&self) -> u32 {
        self.debug_lines.segment_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.game.scoreboard()
    }

    pub fn debug_mode(&self) -> bool {
        self.ctx.debug_mode
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_bodies(&self) -> u32 {
        self.layout.max_bodies as u32
    }

    pub fn max_debug_segments(&self) -> u32 {
        self.layout.max_debug_segments as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.total_floats() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalbox_engine::bridge::protocol::{HEADER_BODY_COUNT, HEADER_SCORE, HEADER_STEPS_LAST_FRAME};
    use goalbox_engine::{BodyDesc, ColliderDesc, ColliderMaterial, GameEvent, Simulation};
    use glam::Vec2;

    /// Counts pointer presses seen by `update` and scores one per press.
    #[derive(Default)]
    struct Recorder {
        presses: u32,
        after_physics_calls: u32,
        resized: Option<(f32, f32)>,
    }

    impl Game for Recorder {
        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.spawn_body(
                "shape",
                BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 }).with_position(Vec2::new(10.0, 10.0)),
                ColliderMaterial::default(),
            );
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            for event in input.iter() {
                if let InputEvent::PointerDown { .. } = event {
                    self.presses += 1;
                    ctx.emit_event(GameEvent::new(1.0, self.presses as f32, 0.0, 0.0));
                }
            }
        }

        fn after_physics(&mut self, _ctx: &mut EngineContext) {
            self.after_physics_calls += 1;
        }

        fn resize(&mut self, _ctx: &mut EngineContext, width: f32, height: f32) {
            self.resized = Some((width, height));
        }

        fn scoreboard(&self) -> Scoreboard {
            Scoreboard { score: self.presses, attempts: 0, is_over: false }
        }
    }

    fn runner() -> GameRunner<Recorder> {
        let mut r = GameRunner::new(Recorder::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = GameRunner::new(Recorder::default());
        r.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        r.tick(1.0 / 60.0);
        assert_eq!(r.game.presses, 0);
        assert_eq!(r.body_count(), 0);
    }

    #[test]
    fn input_is_consumed_once_per_frame() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        // Three fixed steps in one frame
        r.tick(3.0 / 60.0 + 0.001);
        assert_eq!(r.game.after_physics_calls, 3);
        assert_eq!(r.game.presses, 1);
        assert_eq!(r.game_events_len(), 1);
    }

    #[test]
    fn input_waits_for_a_step() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        r.tick(0.001);
        assert_eq!(r.game.presses, 0);
        r.tick(1.0 / 60.0);
        assert_eq!(r.game.presses, 1);
    }

    #[test]
    fn header_reflects_frame_state() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        r.tick(1.0 / 60.0 + 0.001);
        assert_eq!(r.header[HEADER_BODY_COUNT], 1.0);
        assert_eq!(r.header[HEADER_SCORE], 1.0);
        assert_eq!(r.header[HEADER_STEPS_LAST_FRAME], 1.0);
        assert_eq!(r.frame(), 1);
    }

    #[test]
    fn events_are_cleared_each_frame() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        r.tick(1.0 / 60.0 + 0.001);
        assert_eq!(r.game_events_len(), 1);
        r.tick(1.0 / 60.0);
        assert_eq!(r.game_events_len(), 0);
    }

    #[test]
    fn resize_updates_world_size() {
        let mut r = runner();
        r.resize(1280.0, 720.0);
        assert_eq!(r.game.resized, Some((1280.0, 720.0)));
        assert_eq!(r.world_width(), 1280.0);

        r.resize(0.0, 720.0);
        assert_eq!(r.world_width(), 1280.0);
    }

    #[test]
    fn debug_mode_toggles_overlay() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert_eq!(r.debug_segment_count(), 0);

        r.set_debug_mode(true);
        r.tick(1.0 / 60.0);
        assert!(r.debug_mode());
        assert!(r.debug_segment_count() > 0);
        assert_eq!(r.ctx.movable_count(), 1);
    }
}
