pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod gameplay;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::sim::{BodyView, Simulation};
pub use api::types::{EntityId, GameEvent, Scoreboard};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair, ShapeClass,
};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{FrameHeader, ProtocolLayout};
pub use systems::debug::{debug_draw_colliders, DebugColor, DebugLines, DebugSegment};
pub use systems::snapshot::{build_snapshot_buffer, BodySnapshot, SnapshotBuffer};
pub use systems::rng::Rng;
pub use error::GeometryError;

pub use gameplay::region::Region;
pub use gameplay::wrap::{wrap, BoundaryWrapper};
pub use gameplay::zone::{goal_geometry, Collected, CollectionZone, ZoneConfig};
pub use gameplay::session::{GameSession, Phase, SessionEvent, SubscriptionId};
