//! Obstacle and collectible spawning on the rolling path
//!
//! Two independent schedules, both driven by simulated elapsed time:
//! - Obstacle waves: one obstacle, two in scattered lanes, or an adjacent pair
//! - Collectibles: a single rarity-table draw or a coin pattern
//!
//! All randomness comes from a seeded PCG so a run replays exactly.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::pool::Pool;
use super::progress::ProgressModel;
use super::state::{Collectible, CollectibleKind, GameEvent, Lane, Obstacle, ObstacleKind};
use crate::error::SimError;
use crate::tuning::{PatternWeights, RarityEntry, Tuning};

/// Zigzag lane sequence
const ZIGZAG: [Lane; 5] = [Lane::Middle, Lane::Left, Lane::Middle, Lane::Right, Lane::Middle];

/// Initial pool sizes
const TREE_POOL: usize = 10;
const ROCK_POOL: usize = 5;
const COIN_POOL: usize = 20;

/// Cumulative first-match table of collectible kinds
#[derive(Debug, Clone)]
pub struct RarityTable {
    entries: Vec<RarityEntry>,
}

impl RarityTable {
    pub fn new(entries: Vec<RarityEntry>) -> Result<Self, SimError> {
        let total: f64 = entries.iter().map(|e| e.percent).sum();
        if (total - 100.0).abs() > 1e-6 || entries.iter().any(|e| e.percent < 0.0) {
            return Err(SimError::InvalidRarityTable { total });
        }
        Ok(Self { entries })
    }

    /// Map a roll in [0, 1) to a kind
    pub fn pick(&self, roll: f64) -> CollectibleKind {
        let target = roll * 100.0;
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.percent;
            if target < cumulative {
                return entry.kind;
            }
        }
        // Rounding at the top end lands on the last row
        self.entries.last().map_or(CollectibleKind::Coin, |e| e.kind)
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> CollectibleKind {
        self.pick(rng.random::<f64>())
    }

    /// Draw among the power-up rows only, keeping their relative odds
    pub fn draw_power_up<R: Rng>(&self, rng: &mut R) -> Option<CollectibleKind> {
        let total: f64 = self
            .entries
            .iter()
            .filter(|e| e.kind != CollectibleKind::Coin)
            .map(|e| e.percent)
            .sum();
        if total <= 0.0 {
            return None;
        }
        let target = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut last = None;
        for entry in self.entries.iter().filter(|e| e.kind != CollectibleKind::Coin) {
            cumulative += entry.percent;
            last = Some(entry.kind);
            if target < cumulative {
                return last;
            }
        }
        last
    }

    pub fn entries(&self) -> &[RarityEntry] {
        &self.entries
    }
}

/// Shape of an obstacle wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstaclePattern {
    Single,
    /// Two obstacles in distinct random lanes
    Scattered,
    /// Two obstacles in neighbouring lanes
    AdjacentPair,
}

/// Result of an obstacle wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleWave {
    pub pattern: ObstaclePattern,
    pub spawned: usize,
}

/// Collectible spawn patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectiblePattern {
    /// One item per lane at the same distance
    Horizontal,
    /// One item per lane, stepping forward across the lanes
    Diagonal,
    /// Centre/left/centre/right/centre, stepping forward
    Zigzag,
    Single,
}

impl CollectiblePattern {
    fn pick(weights: &PatternWeights, roll: u32) -> Self {
        let mut roll = roll;
        for (pattern, weight) in [
            (CollectiblePattern::Horizontal, weights.horizontal),
            (CollectiblePattern::Diagonal, weights.diagonal),
            (CollectiblePattern::Zigzag, weights.zigzag),
        ] {
            if roll < weight {
                return pattern;
            }
            roll -= weight;
        }
        CollectiblePattern::Single
    }
}

/// Frame-independent inputs to a spawn step
#[derive(Debug, Clone, Copy)]
pub struct SpawnClock {
    /// Simulated seconds since the run started
    pub now: f32,
    /// Path distance rolled so far (hero position in the world frame)
    pub rolled: f32,
    pub tick: u64,
}

#[derive(Debug)]
pub struct SpawnScheduler {
    rng: Pcg32,
    next_obstacle_at: f32,
    next_collectible_at: f32,
    obstacles: Pool<Obstacle>,
    collectibles: Pool<Collectible>,
    rarity: RarityTable,
    pattern_weights: PatternWeights,
    rock_chance: f64,
    adjacent_pair_chance: f64,
    horizontal_powerup_chance: f64,
    spawn_ahead: f32,
    despawn_behind: f32,
    spacing: f32,
    max_active_collectibles: usize,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning, seed: u64) -> Result<Self, SimError> {
        let obstacles = Pool::new(
            "obstacle",
            &[(ObstacleKind::Tree, TREE_POOL), (ObstacleKind::Rock, ROCK_POOL)],
            tuning.max_pool_size,
        );
        let collectibles = Pool::new(
            "collectible",
            &[
                (CollectibleKind::Coin, COIN_POOL),
                (CollectibleKind::Magnet, 1),
                (CollectibleKind::Shield, 1),
                (CollectibleKind::DoublePoints, 1),
                (CollectibleKind::ExtraLife, 1),
            ],
            tuning.max_pool_size,
        );
        Ok(Self {
            rng: Pcg32::seed_from_u64(seed),
            next_obstacle_at: tuning.obstacle_base_interval,
            next_collectible_at: tuning.collectible_base_interval,
            obstacles,
            collectibles,
            rarity: RarityTable::new(tuning.rarity.clone())?,
            pattern_weights: tuning.pattern_weights,
            rock_chance: tuning.rock_chance as f64,
            adjacent_pair_chance: tuning.adjacent_pair_chance as f64,
            horizontal_powerup_chance: tuning.horizontal_powerup_chance as f64,
            spawn_ahead: tuning.spawn_ahead,
            despawn_behind: tuning.despawn_behind,
            spacing: tuning.pattern_spacing,
            max_active_collectibles: tuning.max_active_collectibles,
        })
    }

    pub fn obstacles(&self) -> &Pool<Obstacle> {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &Pool<Collectible> {
        &self.collectibles
    }

    /// Both pools, for the collision pass
    pub fn pools_mut(&mut self) -> (&mut Pool<Obstacle>, &mut Pool<Collectible>) {
        (&mut self.obstacles, &mut self.collectibles)
    }

    pub fn next_obstacle_at(&self) -> f32 {
        self.next_obstacle_at
    }

    pub fn next_collectible_at(&self) -> f32 {
        self.next_collectible_at
    }

    pub fn rarity(&self) -> &RarityTable {
        &self.rarity
    }

    /// Recycle entities that rolled too far behind the hero
    pub fn recycle_passed(&mut self, rolled: f32, events: &mut Vec<GameEvent>) {
        let cutoff = rolled - self.despawn_behind;
        let passed: Vec<u32> = self
            .obstacles
            .iter_active()
            .filter(|o| o.path_distance < cutoff)
            .map(|o| o.id)
            .collect();
        for id in passed {
            self.obstacles.release(id);
            events.push(GameEvent::ObstacleDespawned { id });
        }

        let passed: Vec<u32> = self
            .collectibles
            .iter_active()
            .filter(|c| c.path_distance < cutoff)
            .map(|c| c.id)
            .collect();
        for id in passed {
            self.collectibles.release(id);
            events.push(GameEvent::CollectibleDespawned { id });
        }
    }

    /// Spawn an obstacle wave if one is due
    pub fn maybe_spawn_obstacle(
        &mut self,
        progress: &ProgressModel,
        clock: SpawnClock,
        events: &mut Vec<GameEvent>,
    ) -> Option<ObstacleWave> {
        if clock.now < self.next_obstacle_at {
            return None;
        }
        self.next_obstacle_at = clock.now + progress.obstacle_spawn_interval();

        let pair = self
            .rng
            .random_bool(progress.pair_spawn_chance().clamp(0.0, 1.0) as f64);
        let pattern = if !pair {
            ObstaclePattern::Single
        } else if self.rng.random_bool(self.adjacent_pair_chance) {
            ObstaclePattern::AdjacentPair
        } else {
            ObstaclePattern::Scattered
        };

        let lanes: Vec<Lane> = match pattern {
            ObstaclePattern::AdjacentPair => {
                let start = if self.rng.random_bool(0.5) { Lane::Left } else { Lane::Middle };
                vec![start, start.right()]
            }
            ObstaclePattern::Single | ObstaclePattern::Scattered => {
                let mut lanes = Lane::ALL;
                lanes.shuffle(&mut self.rng);
                let count = if pattern == ObstaclePattern::Single { 1 } else { 2 };
                lanes[..count].to_vec()
            }
        };

        let mut spawned = 0;
        for lane in lanes {
            let kind = if self.rng.random_bool(self.rock_chance) {
                ObstacleKind::Rock
            } else {
                ObstacleKind::Tree
            };
            match self.activate_obstacle(kind, lane.offset(), clock.rolled + self.spawn_ahead, clock.tick) {
                Ok(id) => {
                    spawned += 1;
                    log::debug!("Spawned {:?} #{} in {:?} lane", kind, id, lane);
                    if let Some(o) = self.obstacles.get(id) {
                        events.push(GameEvent::ObstacleSpawned(o.descriptor()));
                    }
                }
                Err(e) => log::warn!("Skipping obstacle spawn: {}", e),
            }
        }
        Some(ObstacleWave { pattern, spawned })
    }

    /// Spawn collectibles if due. Returns how many were spawned.
    pub fn maybe_spawn_collectible(
        &mut self,
        progress: &ProgressModel,
        clock: SpawnClock,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        if clock.now < self.next_collectible_at {
            return 0;
        }
        self.next_collectible_at = clock.now + progress.collectible_spawn_interval();

        let total = self.pattern_weights.total().max(1);
        let pattern = CollectiblePattern::pick(&self.pattern_weights, self.rng.random_range(0..total));
        self.spawn_collectible_pattern(pattern, clock, events)
    }

    /// Lay out and spawn one pattern. Patterns that would exceed the active
    /// cap are skipped whole.
    pub fn spawn_collectible_pattern(
        &mut self,
        pattern: CollectiblePattern,
        clock: SpawnClock,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let items = self.layout(pattern);
        if self.collectibles.active_count() + items.len() > self.max_active_collectibles {
            log::debug!(
                "Collectible cap reached ({} active), skipping {:?}",
                self.collectibles.active_count(),
                pattern
            );
            return 0;
        }

        let base = clock.rolled + self.spawn_ahead;
        let mut spawned = 0;
        for (lane, offset, kind) in items {
            match self.activate_collectible(kind, lane.offset(), base + offset, clock.tick) {
                Ok(id) => {
                    spawned += 1;
                    if let Some(c) = self.collectibles.get(id) {
                        events.push(GameEvent::CollectibleSpawned(c.descriptor()));
                    }
                }
                Err(e) => log::warn!("Skipping collectible spawn: {}", e),
            }
        }
        spawned
    }

    fn layout(&mut self, pattern: CollectiblePattern) -> Vec<(Lane, f32, CollectibleKind)> {
        let coin = CollectibleKind::Coin;
        match pattern {
            CollectiblePattern::Single => {
                let lane = Lane::ALL[self.rng.random_range(0..Lane::ALL.len())];
                let kind = self.rarity.draw(&mut self.rng);
                vec![(lane, 0.0, kind)]
            }
            CollectiblePattern::Horizontal => {
                let mut items: Vec<_> = Lane::ALL.iter().map(|&lane| (lane, 0.0, coin)).collect();
                if self.rng.random_bool(self.horizontal_powerup_chance) {
                    let slot = self.rng.random_range(0..items.len());
                    if let Some(kind) = self.rarity.draw_power_up(&mut self.rng) {
                        items[slot].2 = kind;
                    }
                }
                items
            }
            CollectiblePattern::Diagonal => {
                let mut lanes = Lane::ALL;
                if self.rng.random_bool(0.5) {
                    lanes.reverse();
                }
                lanes
                    .iter()
                    .enumerate()
                    .map(|(i, &lane)| (lane, i as f32 * self.spacing, coin))
                    .collect()
            }
            CollectiblePattern::Zigzag => ZIGZAG
                .iter()
                .enumerate()
                .map(|(i, &lane)| (lane, i as f32 * self.spacing, coin))
                .collect(),
        }
    }

    fn activate_obstacle(
        &mut self,
        kind: ObstacleKind,
        lateral: f32,
        path_distance: f32,
        tick: u64,
    ) -> Result<u32, SimError> {
        let obstacle = self.obstacles.acquire(kind)?;
        obstacle.lateral = lateral;
        obstacle.path_distance = path_distance;
        obstacle.spawned_tick = tick;
        Ok(obstacle.id)
    }

    fn activate_collectible(
        &mut self,
        kind: CollectibleKind,
        lateral: f32,
        path_distance: f32,
        tick: u64,
    ) -> Result<u32, SimError> {
        let collectible = self.collectibles.acquire(kind)?;
        collectible.lateral = lateral;
        collectible.path_distance = path_distance;
        collectible.spawned_tick = tick;
        Ok(collectible.id)
    }

    /// Place an obstacle `ahead` units in front of the hero (scripted spawns)
    pub fn place_obstacle(
        &mut self,
        kind: ObstacleKind,
        lane: Lane,
        ahead: f32,
        clock: SpawnClock,
        events: &mut Vec<GameEvent>,
    ) -> Result<u32, SimError> {
        let id = self.activate_obstacle(kind, lane.offset(), clock.rolled + ahead, clock.tick)?;
        if let Some(o) = self.obstacles.get(id) {
            events.push(GameEvent::ObstacleSpawned(o.descriptor()));
        }
        Ok(id)
    }

    /// Place a collectible `ahead` units in front of the hero (scripted spawns)
    pub fn place_collectible(
        &mut self,
        kind: CollectibleKind,
        lane: Lane,
        ahead: f32,
        clock: SpawnClock,
        events: &mut Vec<GameEvent>,
    ) -> Result<u32, SimError> {
        let id = self.activate_collectible(kind, lane.offset(), clock.rolled + ahead, clock.tick)?;
        if let Some(c) = self.collectibles.get(id) {
            events.push(GameEvent::CollectibleSpawned(c.descriptor()));
        }
        Ok(id)
    }

    /// Clear the field and restart both schedules
    pub fn reset(&mut self, tuning: &Tuning, seed: u64, events: &mut Vec<GameEvent>) {
        for id in self.obstacles.release_all() {
            events.push(GameEvent::ObstacleDespawned { id });
        }
        for id in self.collectibles.release_all() {
            events.push(GameEvent::CollectibleDespawned { id });
        }
        self.rng = Pcg32::seed_from_u64(seed);
        self.next_obstacle_at = tuning.obstacle_base_interval;
        self.next_collectible_at = tuning.collectible_base_interval;
    }
}
