/// Frame data layout shared with the TypeScript side.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Each section is its own buffer in WASM memory; JS reads the pointer and
/// count through the bridge exports and sizes its typed-array views from the
/// capacities below. The header is a small float block refreshed every frame:
///
/// ```text
/// [Header: 12 floats]
/// [Bodies: max_bodies × 8 floats]
/// [Debug segments: max_debug_segments × 5 floats]
/// [Events: max_events × 4 floats]
/// ```

use crate::api::game::GameConfig;
use crate::api::types::{GameEvent, Scoreboard};
use crate::systems::debug::DebugSegment;
use crate::systems::snapshot::BodySnapshot;

/// Number of floats in the header block.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_WORLD_WIDTH: usize = 2;
pub const HEADER_WORLD_HEIGHT: usize = 3;
pub const HEADER_BODY_COUNT: usize = 4;
pub const HEADER_DEBUG_SEGMENT_COUNT: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
pub const HEADER_SCORE: usize = 7;
pub const HEADER_ATTEMPTS: usize = 8;
pub const HEADER_IS_OVER: usize = 9;
pub const HEADER_DEBUG_MODE: usize = 10;
pub const HEADER_STEPS_LAST_FRAME: usize = 11;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Capacities and section sizes derived from the game's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_bodies: usize,
    pub max_debug_segments: usize,
    pub max_events: usize,

    /// Size of the body snapshot section in floats.
    pub body_data_floats: usize,
    /// Size of the debug segment section in floats.
    pub debug_data_floats: usize,
    /// Size of the event section in floats.
    pub event_data_floats: usize,
}

impl ProtocolLayout {
    pub fn new(max_bodies: usize, max_debug_segments: usize, max_events: usize) -> Self {
        Self {
            max_bodies,
            max_debug_segments,
            max_events,
            body_data_floats: max_bodies * BodySnapshot::FLOATS,
            debug_data_floats: max_debug_segments * DebugSegment::FLOATS,
            event_data_floats: max_events * GameEvent::FLOATS,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_bodies, config.max_debug_segments, config.max_events)
    }

    /// Total floats across all sections, header included.
    pub fn total_floats(&self) -> usize {
        HEADER_FLOATS + self.body_data_floats + self.debug_data_floats + self.event_data_floats
    }
}

/// Values written into the header for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameHeader {
    pub frame: u32,
    pub world_width: f32,
    pub world_height: f32,
    pub body_count: u32,
    pub debug_segment_count: u32,
    pub event_count: u32,
    pub scoreboard: Scoreboard,
    pub debug_mode: bool,
    pub steps: u32,
}

impl FrameHeader {
    pub fn write(&self, header: &mut [f32; HEADER_FLOATS]) {
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = self.frame as f32;
        header[HEADER_WORLD_WIDTH] = self.world_width;
        header[HEADER_WORLD_HEIGHT] = self.world_height;
        header[HEADER_BODY_COUNT] = self.body_count as f32;
        header[HEADER_DEBUG_SEGMENT_COUNT] = self.debug_segment_count as f32;
        header[HEADER_EVENT_COUNT] = self.event_count as f32;
        header[HEADER_SCORE] = self.scoreboard.score as f32;
        header[HEADER_ATTEMPTS] = self.scoreboard.attempts as f32;
        header[HEADER_IS_OVER] = if self.scoreboard.is_over { 1.0 } else { 0.0 };
        header[HEADER_DEBUG_MODE] = if self.debug_mode { 1.0 } else { 0.0 };
        header[HEADER_STEPS_LAST_FRAME] = self.steps as f32;
    }
}
