//! Pointer and keyboard handling. Owns the spawn rate limiter.

use glam::Vec2;
use goalbox_engine::{EntityId, InputEvent, Rng, Simulation};
use serde::{Deserialize, Serialize};

use crate::shapes::spawn_shape;

/// Custom event kinds from the UI
pub mod events {
    pub const RESET: u32 = 1;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Impulse applied to a clicked shape.
    pub nudge_impulse: f32,
    /// Upward share of the nudge direction, so shapes hop over each other.
    pub nudge_lift: f32,
    /// Minimum simulated seconds between two spawns.
    pub spawn_cooldown: f32,
    pub delete_keys: Vec<u32>,
    pub debug_key: u32,
    pub restart_key: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            nudge_impulse: 4000.0,
            nudge_lift: 0.8,
            spawn_cooldown: 0.5,
            // Delete, Backspace, X
            delete_keys: vec![46, 8, 88],
            debug_key: 68,
            restart_key: 82,
        }
    }
}

/// What an input event turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Nudged(EntityId),
    Spawned(EntityId),
    Deleted(EntityId),
    ToggleDebug,
    Restart,
}

#[derive(Debug, Default)]
pub struct InputHandler {
    config: InputConfig,
    pointer: Vec2,
    last_spawn: Option<f32>,
}

impl InputHandler {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pointer: Vec2::ZERO,
            last_spawn: None,
        }
    }

    pub fn set_config(&mut self, config: InputConfig) {
        self.config = config;
    }

    /// Forget the spawn cooldown (new round).
    pub fn reset(&mut self) {
        self.last_spawn = None;
    }

    /// Apply one input event. `now` is simulated time, `target` the point
    /// nudges push towards.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        sim: &mut impl Simulation,
        rng: &mut Rng,
        now: f32,
        target: Vec2,
    ) -> Option<Action> {
        match *event {
            InputEvent::PointerMove { x, y } => {
                self.pointer = Vec2::new(x, y);
                None
            }
            InputEvent::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                match self.movable_under_pointer(sim) {
                    Some(id) => self.nudge(sim, id, target),
                    None => self.spawn(sim, rng, now),
                }
            }
            InputEvent::KeyDown { key_code } if self.config.delete_keys.contains(&key_code) => {
                let id = self.movable_under_pointer(sim)?;
                sim.remove_body(id).then_some(Action::Deleted(id))
            }
            InputEvent::KeyDown { key_code } if key_code == self.config.debug_key => {
                Some(Action::ToggleDebug)
            }
            InputEvent::KeyDown { key_code } if key_code == self.config.restart_key => {
                Some(Action::Restart)
            }
            InputEvent::Custom { kind, .. } if kind == events::RESET => Some(Action::Restart),
            _ => None,
        }
    }

    fn movable_under_pointer(&self, sim: &impl Simulation) -> Option<EntityId> {
        sim.query_point(self.pointer)
            .into_iter()
            .find(|id| sim.body(*id).is_some_and(|b| !b.is_static))
    }

    fn nudge(&self, sim: &mut impl Simulation, id: EntityId, target: Vec2) -> Option<Action> {
        let body = sim.body(id)?;
        let toward = Vec2::new((target.x - body.pos.x).signum(), 0.0);
        let dir = (toward + Vec2::new(0.0, -self.config.nudge_lift)).normalize_or_zero();
        sim.apply_force_at(id, self.pointer, dir * self.config.nudge_impulse);
        log::debug!("Nudged {:?}", id);
        Some(Action::Nudged(id))
    }

    fn spawn(&mut self, sim: &mut impl Simulation, rng: &mut Rng, now: f32) -> Option<Action> {
        if let Some(last) = self.last_spawn {
            if now - last < self.config.spawn_cooldown {
                return None;
            }
        }
        self.last_spawn = Some(now);
        let id = spawn_shape(sim, rng, self.pointer);
        log::debug!("Spawned {:?} at {:?}", id, self.pointer);
        Some(Action::Spawned(id))
    }
}
