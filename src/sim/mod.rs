//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod path;
pub mod pool;
pub mod powerup;
pub mod progress;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, CollisionResolver, ResolveContext};
pub use lane::{HeroState, JumpPhase, LaneModel};
pub use pool::{Pool, Pooled};
pub use powerup::PowerUpState;
pub use progress::ProgressModel;
pub use score::ScoreState;
pub use spawn::{CollectiblePattern, ObstaclePattern, ObstacleWave, RarityTable, SpawnClock, SpawnScheduler};
pub use state::{
    Collectible, CollectibleKind, EntityDescriptor, GameEvent, GamePhase, Lane, Obstacle,
    ObstacleKind, PowerUpKind,
};
pub use tick::{FrameView, GameLoop, Intent};
