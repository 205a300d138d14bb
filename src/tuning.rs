//! Data-driven game balance
//!
//! Every gameplay number that designers may want to tweak lives here. Values
//! default to the shipped balance and can be overridden from JSON; missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::state::CollectibleKind;

/// Highest difficulty factor a tuning may ramp to
pub const DIFFICULTY_CEILING: f32 = 3.0;

/// One row of the collectible rarity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityEntry {
    pub kind: CollectibleKind,
    /// Chance in percent
    pub percent: f64,
}

/// Relative weights of the collectible spawn patterns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternWeights {
    pub horizontal: u32,
    pub diagonal: u32,
    pub zigzag: u32,
    pub single: u32,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            horizontal: 20,
            diagonal: 20,
            zigzag: 20,
            single: 40,
        }
    }
}

impl PatternWeights {
    pub fn total(&self) -> u32 {
        self.horizontal + self.diagonal + self.zigzag + self.single
    }
}

/// Game balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Progress ===
    /// Seconds for difficulty to ramp by 1.0
    pub ramp_seconds: f32,
    /// Difficulty ceiling
    pub max_difficulty: f32,
    /// Obstacle spawn interval at difficulty 1.0 (seconds)
    pub obstacle_base_interval: f32,
    /// Collectible spawn interval at difficulty 1.0 (seconds)
    pub collectible_base_interval: f32,
    /// Floor for both spawn intervals (seconds)
    pub min_spawn_interval: f32,
    /// Rolling speed at difficulty 1.0 (world units per second)
    pub base_speed: f32,
    /// Chance of a two-obstacle wave at difficulty 1.0
    pub pair_chance_base: f32,
    /// Extra pair chance per point of difficulty
    pub pair_chance_slope: f32,
    /// Pair chance ceiling
    pub pair_chance_max: f32,

    // === Hero ===
    /// Lane change closure rate (fraction per second)
    pub lane_change_rate: f32,
    /// Upward velocity applied by the first jump
    pub jump_force: f32,
    /// Upward velocity applied by the second jump
    pub double_jump_force: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Seconds of obstacle immunity after losing a life
    pub invulnerability_secs: f32,

    // === Spawning ===
    /// Chance that a two-obstacle wave uses neighbouring lanes
    pub adjacent_pair_chance: f32,
    /// Chance an obstacle is a rock barrier instead of a tree
    pub rock_chance: f32,
    /// Distance ahead of the hero where entities appear
    pub spawn_ahead: f32,
    /// Distance behind the hero where entities are recycled
    pub despawn_behind: f32,
    /// Path spacing between items of a collectible pattern
    pub pattern_spacing: f32,
    /// Chance one slot of a horizontal line becomes a power-up
    pub horizontal_powerup_chance: f32,
    /// Cap on concurrently active collectibles
    pub max_active_collectibles: usize,
    /// Hard cap on pool growth (per pool)
    pub max_pool_size: usize,
    pub rarity: Vec<RarityEntry>,
    pub pattern_weights: PatternWeights,

    // === Collision ===
    /// Lateral/forward distance under which a rock hits
    pub rock_hit_distance: f32,
    /// Height above base that clears a rock
    pub jump_clearance: f32,
    /// 3D distance under which a tree hits
    pub tree_hit_distance: f32,
    /// 3D distance under which a collectible is picked up
    pub pickup_distance: f32,
    /// Enlarged pickup radius while the magnet is active
    pub magnet_collect_radius: f32,
    /// Radius inside which the magnet pulls coins
    pub magnet_attract_radius: f32,
    /// Coin pull speed (world units per second)
    pub magnet_pull_speed: f32,
    /// Obstacles further behind than this are not checked
    pub visibility_cutoff: f32,

    // === Power-ups ===
    pub shield_secs: f32,
    pub magnet_secs: f32,
    pub double_points_secs: f32,

    // === Score ===
    /// Continuous points per second at difficulty 1.0
    pub score_rate: f64,
    /// Points per coin
    pub coin_value: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ramp_seconds: 40.0,
            max_difficulty: 3.0,
            obstacle_base_interval: 0.8,
            collectible_base_interval: 1.0,
            min_spawn_interval: 0.3,
            base_speed: 9.0,
            pair_chance_base: 0.3,
            pair_chance_slope: 0.2,
            pair_chance_max: 0.8,

            lane_change_rate: 5.0,
            jump_force: 10.8,
            double_jump_force: 8.4,
            gravity: 54.0,
            invulnerability_secs: 1.0,

            adjacent_pair_chance: 0.3,
            rock_chance: 0.3,
            spawn_ahead: 23.0,
            despawn_behind: 3.0,
            pattern_spacing: 1.5,
            horizontal_powerup_chance: 0.25,
            max_active_collectibles: 10,
            max_pool_size: 64,
            rarity: vec![
                RarityEntry { kind: CollectibleKind::ExtraLife, percent: 1.0 },
                RarityEntry { kind: CollectibleKind::Shield, percent: 4.0 },
                RarityEntry { kind: CollectibleKind::DoublePoints, percent: 5.0 },
                RarityEntry { kind: CollectibleKind::Magnet, percent: 5.0 },
                RarityEntry { kind: CollectibleKind::Coin, percent: 85.0 },
            ],
            pattern_weights: PatternWeights::default(),

            rock_hit_distance: 0.8,
            jump_clearance: 0.4,
            tree_hit_distance: 0.6,
            pickup_distance: 0.6,
            magnet_collect_radius: 1.0,
            magnet_attract_radius: 3.0,
            magnet_pull_speed: 12.0,
            visibility_cutoff: 1.0,

            shield_secs: 10.0,
            magnet_secs: 15.0,
            double_points_secs: 20.0,

            score_rate: 10.0,
            coin_value: 10.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        positive("ramp_seconds", self.ramp_seconds)?;
        positive("obstacle_base_interval", self.obstacle_base_interval)?;
        positive("collectible_base_interval", self.collectible_base_interval)?;
        positive("min_spawn_interval", self.min_spawn_interval)?;
        positive("base_speed", self.base_speed)?;
        positive("gravity", self.gravity)?;
        positive("spawn_ahead", self.spawn_ahead)?;
        positive("pattern_spacing", self.pattern_spacing)?;
        positive("lane_change_rate", self.lane_change_rate)?;
        positive("jump_force", self.jump_force)?;
        positive("double_jump_force", self.double_jump_force)?;
        positive("rock_hit_distance", self.rock_hit_distance)?;
        positive("jump_clearance", self.jump_clearance)?;
        positive("tree_hit_distance", self.tree_hit_distance)?;
        positive("pickup_distance", self.pickup_distance)?;
        positive("magnet_collect_radius", self.magnet_collect_radius)?;
        positive("magnet_attract_radius", self.magnet_attract_radius)?;
        positive("magnet_pull_speed", self.magnet_pull_speed)?;

        if !(1.0..=DIFFICULTY_CEILING).contains(&self.max_difficulty) {
            return Err(invalid("max_difficulty", "must be within [1.0, 3.0]"));
        }
        for (field, p) in [
            ("pair_chance_base", self.pair_chance_base),
            ("pair_chance_max", self.pair_chance_max),
            ("adjacent_pair_chance", self.adjacent_pair_chance),
            ("rock_chance", self.rock_chance),
            ("horizontal_powerup_chance", self.horizontal_powerup_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, "probability must be within [0, 1]"));
            }
        }
        if self.pattern_weights.total() == 0 {
            return Err(invalid("pattern_weights", "at least one weight must be non-zero"));
        }
        if self.max_pool_size == 0 {
            return Err(invalid("max_pool_size", "must be non-zero"));
        }

        let total: f64 = self.rarity.iter().map(|r| r.percent).sum();
        if (total - 100.0).abs() > 1e-6 || self.rarity.iter().any(|r| r.percent < 0.0) {
            return Err(SimError::InvalidRarityTable { total });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SimError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn invalid(field: &'static str, reason: &str) -> SimError {
    SimError::InvalidTuning {
        field,
        reason: reason.to_string(),
    }
}
