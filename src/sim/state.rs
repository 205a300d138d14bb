//! Entity and event types shared across the simulation
//!
//! Kinds are closed enums so every spawn/collision branch is matched
//! exhaustively. Events are the only channel from the core to collaborators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen, render-only
    Paused,
    /// Run ended
    GameOver,
}

/// One of the three fixed lanes across the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Middle,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];

    /// Lateral offset in lane units (-1, 0, 1)
    pub fn offset(self) -> f32 {
        match self {
            Lane::Left => -1.0,
            Lane::Middle => 0.0,
            Lane::Right => 1.0,
        }
    }

    pub fn left(self) -> Lane {
        match self {
            Lane::Right => Lane::Middle,
            _ => Lane::Left,
        }
    }

    pub fn right(self) -> Lane {
        match self {
            Lane::Left => Lane::Middle,
            _ => Lane::Right,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Vertical obstacle, must be dodged sideways
    Tree,
    /// Low barrier, cleared by jumping over it
    Rock,
}

impl ObstacleKind {
    /// Rocks use the horizontal (jump-over) hitbox
    pub fn is_barrier(self) -> bool {
        matches!(self, ObstacleKind::Rock)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Tree => "tree",
            ObstacleKind::Rock => "rock",
        }
    }
}

impl FromStr for ObstacleKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(ObstacleKind::Tree),
            "rock" => Ok(ObstacleKind::Rock),
            other => Err(SimError::UnknownObstacleKind(other.to_string())),
        }
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Shield,
    Magnet,
    DoublePoints,
    ExtraLife,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 5] = [
        CollectibleKind::Coin,
        CollectibleKind::Shield,
        CollectibleKind::Magnet,
        CollectibleKind::DoublePoints,
        CollectibleKind::ExtraLife,
    ];

    /// Timed effect granted on pickup, if any
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            CollectibleKind::Shield => Some(PowerUpKind::Shield),
            CollectibleKind::Magnet => Some(PowerUpKind::Magnet),
            CollectibleKind::DoublePoints => Some(PowerUpKind::DoublePoints),
            CollectibleKind::Coin | CollectibleKind::ExtraLife => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectibleKind::Coin => "coin",
            CollectibleKind::Shield => "shield",
            CollectibleKind::Magnet => "magnet",
            CollectibleKind::DoublePoints => "doublePoints",
            CollectibleKind::ExtraLife => "extraLife",
        }
    }
}

impl fmt::Display for CollectibleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectibleKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectibleKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SimError::UnknownCollectibleKind(s.to_string()))
    }
}

/// Timed power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Magnet,
    DoublePoints,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::DoublePoints,
    ];
}

/// An obstacle on the rolling path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Lateral position in lane units
    pub lateral: f32,
    /// Distance along the path in the world's own frame
    pub path_distance: f32,
    pub active: bool,
    /// Tick the obstacle was activated in (not collidable until the next one)
    pub spawned_tick: u64,
}

impl Obstacle {
    pub fn dormant(id: u32, kind: ObstacleKind) -> Self {
        Self {
            id,
            kind,
            lateral: 0.0,
            path_distance: 0.0,
            active: false,
            spawned_tick: 0,
        }
    }

    pub fn descriptor(&self) -> EntityDescriptor<ObstacleKind> {
        EntityDescriptor {
            id: self.id,
            kind: self.kind,
            lateral: self.lateral,
            path_distance: self.path_distance,
        }
    }
}

/// A collectible floating above the path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    /// Lateral position in lane units (continuous so the magnet can pull it)
    pub lateral: f32,
    pub path_distance: f32,
    pub active: bool,
    pub spawned_tick: u64,
}

impl Collectible {
    pub fn dormant(id: u32, kind: CollectibleKind) -> Self {
        Self {
            id,
            kind,
            lateral: 0.0,
            path_distance: 0.0,
            active: false,
            spawned_tick: 0,
        }
    }

    pub fn descriptor(&self) -> EntityDescriptor<CollectibleKind> {
        EntityDescriptor {
            id: self.id,
            kind: self.kind,
            lateral: self.lateral,
            path_distance: self.path_distance,
        }
    }
}

/// What a presenter needs to place an entity on the sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor<K> {
    pub id: u32,
    pub kind: K,
    pub lateral: f32,
    pub path_distance: f32,
}

/// Events emitted by a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    HighScoreChanged { high_score: u64 },
    LivesChanged { lives: u8 },
    PowerUpActivated { kind: PowerUpKind, duration: f32 },
    PowerUpExpired { kind: PowerUpKind },
    CollectibleCollected { kind: CollectibleKind },
    ObstacleHit { kind: ObstacleKind, absorbed: bool },
    StateChanged { phase: GamePhase },
    GameOver { final_score: u64, coins: u32 },
    Jumped { double: bool },
    Landed,
    ObstacleSpawned(EntityDescriptor<ObstacleKind>),
    ObstacleDespawned { id: u32 },
    CollectibleSpawned(EntityDescriptor<CollectibleKind>),
    CollectibleDespawned { id: u32 },
    CollectibleMoved(EntityDescriptor<CollectibleKind>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_shifts_saturate() {
        assert_eq!(Lane::Left.left(), Lane::Left);
        assert_eq!(Lane::Middle.left(), Lane::Left);
        assert_eq!(Lane::Right.left(), Lane::Middle);
        assert_eq!(Lane::Right.right(), Lane::Right);
        assert_eq!(Lane::Left.right(), Lane::Middle);
    }

    #[test]
    fn test_collectible_kind_names_round_trip() {
        for kind in CollectibleKind::ALL {
            assert_eq!(kind.as_str().parse::<CollectibleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = "banana".parse::<CollectibleKind>().unwrap_err();
        assert!(matches!(err, SimError::UnknownCollectibleKind(ref s) if s == "banana"));
        assert!("boulder".parse::<ObstacleKind>().is_err());
    }

    #[test]
    fn test_only_rocks_are_barriers() {
        assert!(ObstacleKind::Rock.is_barrier());
        assert!(!ObstacleKind::Tree.is_barrier());
    }

    #[test]
    fn test_only_timed_pickups_grant_power_ups() {
        assert_eq!(CollectibleKind::Shield.power_up(), Some(PowerUpKind::Shield));
        assert_eq!(CollectibleKind::Magnet.power_up(), Some(PowerUpKind::Magnet));
        assert_eq!(CollectibleKind::DoublePoints.power_up(), Some(PowerUpKind::DoublePoints));
        assert_eq!(CollectibleKind::Coin.power_up(), None);
        assert_eq!(CollectibleKind::ExtraLife.power_up(), None);
    }
}
