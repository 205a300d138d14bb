//! Sphere Runner - gameplay core for an endless lane runner on a rolling sphere
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hero motion, spawning, collisions, scoring)
//! - `platform`: Ports for render/presenter/audio/input collaborators
//! - `persistence`: High score storage
//! - `runner`: Frame driver wiring the simulation to collaborators
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::SimError;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the frame driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Radius of the rolling world sphere
    pub const WORLD_RADIUS: f32 = 26.0;
    /// Angle between neighbouring lanes, measured across the path (radians)
    pub const LANE_ANGLE: f32 = 0.05;

    /// Hero sphere radius
    pub const HERO_RADIUS: f32 = 0.2;
    /// Resting height of the hero centre above the surface
    pub const HERO_BASE_HEIGHT: f32 = HERO_RADIUS;
    /// Height of floating collectibles above the surface
    pub const COLLECTIBLE_HEIGHT: f32 = 0.3;
    /// Height of obstacle hit centres above the surface
    pub const OBSTACLE_HEIGHT: f32 = 0.25;

    /// Starting lives
    pub const START_LIVES: u8 = 3;
    /// Lives cap for extra-life pickups
    pub const MAX_LIVES: u8 = 5;

    /// Key the high score is persisted under
    pub const HIGH_SCORE_KEY: &str = "highScore";
}
