//! Run progression and difficulty scaling
//!
//! Difficulty is a continuous ramp: `min(max, 1 + elapsed / ramp_seconds)`.
//! Everything derived from it (spawn intervals, rolling speed, pair chance) is
//! a pure function of simulated elapsed time, so pausing freezes it. The model
//! also integrates how far the world has rolled.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressModel {
    elapsed: f32,
    /// Path distance the world has rolled past the hero
    distance: f32,
    ramp_seconds: f32,
    max_factor: f32,
    obstacle_base_interval: f32,
    collectible_base_interval: f32,
    min_interval: f32,
    base_speed: f32,
    pair_chance_base: f32,
    pair_chance_slope: f32,
    pair_chance_max: f32,
}

impl ProgressModel {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            elapsed: 0.0,
            distance: 0.0,
            ramp_seconds: tuning.ramp_seconds,
            max_factor: tuning.max_difficulty,
            obstacle_base_interval: tuning.obstacle_base_interval,
            collectible_base_interval: tuning.collectible_base_interval,
            min_interval: tuning.min_spawn_interval,
            base_speed: tuning.base_speed,
            pair_chance_base: tuning.pair_chance_base,
            pair_chance_slope: tuning.pair_chance_slope,
            pair_chance_max: tuning.pair_chance_max,
        }
    }

    /// Advance simulated time. Negative or non-finite deltas are ignored.
    pub fn update(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.distance += self.obstacle_speed() * dt;
            self.elapsed += dt;
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Difficulty factor in [1.0, max_factor]
    pub fn difficulty_factor(&self) -> f32 {
        (1.0 + self.elapsed / self.ramp_seconds).min(self.max_factor)
    }

    /// Seconds between obstacle waves, never below the minimum interval
    pub fn obstacle_spawn_interval(&self) -> f32 {
        (self.obstacle_base_interval / self.difficulty_factor()).max(self.min_interval)
    }

    /// Seconds between collectible spawns, never below the minimum interval
    pub fn collectible_spawn_interval(&self) -> f32 {
        (self.collectible_base_interval / self.difficulty_factor()).max(self.min_interval)
    }

    pub fn min_interval(&self) -> f32 {
        self.min_interval
    }

    /// Points awarded for each obstacle wave survived into
    pub fn wave_bonus(&self) -> f64 {
        let base = (self.obstacle_base_interval * 10.0).floor();
        let difficulty = (self.difficulty_factor() * 10.0).floor();
        (base + difficulty) as f64
    }

    /// Rolling speed in world units per second
    pub fn obstacle_speed(&self) -> f32 {
        self.base_speed * self.difficulty_factor()
    }

    /// Chance that an obstacle wave carries two obstacles
    pub fn pair_spawn_chance(&self) -> f32 {
        (self.pair_chance_base + (self.difficulty_factor() - 1.0) * self.pair_chance_slope)
            .min(self.pair_chance_max)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.distance = 0.0;
    }
}
