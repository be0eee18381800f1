//! Score, attempts and the Playing/GameOver state machine.
//!
//! The session is owned by the game. UI code learns about changes through
//! observers registered with [`GameSession::subscribe`]; delivery is
//! synchronous, in registration order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ScoreChanged { score: u32 },
    AttemptsChanged { attempts: u32 },
    GameOver { score: u32, attempts: u32, ratio: f32 },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Observer = Box<dyn FnMut(&SessionEvent)>;

#[derive(Default)]
pub struct GameSession {
    score: u32,
    attempts: u32,
    initial_bodies: usize,
    phase: Phase,
    restart_hook: Option<Box<dyn FnMut()>>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by `reset` before observers hear about it.
    pub fn set_restart_hook(&mut self, hook: impl FnMut() + 'static) {
        self.restart_hook = Some(Box::new(hook));
    }

    /// Baseline for the game-over check. Zero disables it.
    pub fn set_initial_body_count(&mut self, count: usize) {
        self.initial_bodies = count;
    }

    pub fn initial_body_count(&self) -> usize {
        self.initial_bodies
    }

    /// Credit `n` collections. `remaining_movable` is the movable body count
    /// after they were removed; reaching zero ends the round.
    /// Ignored once the round is over.
    pub fn add_score(&mut self, n: u32, remaining_movable: usize) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.score = self.score.saturating_add(n);
        let score = self.score;
        self.notify(SessionEvent::ScoreChanged { score });

        if self.initial_bodies > 0 && remaining_movable == 0 {
            self.phase = Phase::GameOver;
            log::info!("Game over: score {} in {} attempts", self.score, self.attempts);
            let event = SessionEvent::GameOver {
                score: self.score,
                attempts: self.attempts,
                ratio: self.ratio(),
            };
            self.notify(event);
        }
    }

    pub fn add_attempt(&mut self, n: u32) {
        self.attempts = self.attempts.saturating_add(n);
        let attempts = self.attempts;
        self.notify(SessionEvent::AttemptsChanged { attempts });
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.attempts = 0;
        self.phase = Phase::Playing;
        log::info!("Session reset");
        if let Some(hook) = self.restart_hook.as_mut() {
            hook();
        }
        self.notify(SessionEvent::Reset);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Score per attempt, `0.0` before the first attempt.
    pub fn ratio(&self) -> f32 {
        if self.attempts == 0 {
            0.0
        } else {
            self.score as f32 / self.attempts as f32
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: SessionEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("score", &self.score)
            .field("attempts", &self.attempts)
            .field("initial_bodies", &self.initial_bodies)
            .field("phase", &self.phase)
            .field("observers", &self.observers.len())
            .finish()
    }
}
