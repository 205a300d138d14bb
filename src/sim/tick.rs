//! Game loop controller
//!
//! Owns every simulation component and advances them in a fixed order:
//! intents, progress, lane, spawn, collision, power-ups, score.
//! Each tick returns the events it produced, in order.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionOutcome, CollisionResolver, ResolveContext};
use super::lane::{HeroState, JumpPhase, LaneModel};
use super::path::roll_angle;
use super::powerup::PowerUpState;
use super::progress::ProgressModel;
use super::score::ScoreState;
use super::spawn::{CollectiblePattern, SpawnClock, SpawnScheduler};
use super::state::{CollectibleKind, GameEvent, GamePhase, Lane, ObstacleKind, PowerUpKind};
use crate::consts::{MAX_LIVES, START_LIVES};
use crate::error::SimError;
use crate::persistence::PersistenceStore;
use crate::tuning::Tuning;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    PauseToggle,
    Restart,
}

/// Render snapshot of the current frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub hero: HeroState,
    pub tilt: f32,
    /// Angle the world has rolled (radians)
    pub roll_angle: f32,
    pub score: u64,
    pub high_score: u64,
    pub coins: u32,
    pub lives: u8,
    pub difficulty: f32,
    /// Hero hidden this frame (invulnerability blink)
    pub blink: bool,
    pub shield_remaining: f32,
    pub magnet_remaining: f32,
    pub double_points_remaining: f32,
}

pub struct GameLoop {
    phase: GamePhase,
    lives: u8,
    invulnerable_for: f32,
    tick: u64,
    seed: u64,
    tuning: Tuning,
    progress: ProgressModel,
    lane: LaneModel,
    spawner: SpawnScheduler,
    resolver: CollisionResolver,
    powerups: PowerUpState,
    score: ScoreState,
    /// Events produced between ticks (scripted placement)
    pending: Vec<GameEvent>,
}

impl std::fmt::Debug for GameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLoop")
            .field("phase", &self.phase)
            .field("lives", &self.lives)
            .field("tick", &self.tick)
            .field("seed", &self.seed)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

impl GameLoop {
    /// Build a loop in the Menu phase. Fails on invalid tuning.
    pub fn new(tuning: Tuning, seed: u64, store: Box<dyn PersistenceStore>) -> Result<Self, SimError> {
        tuning.validate()?;
        Ok(Self {
            phase: GamePhase::Menu,
            lives: START_LIVES,
            invulnerable_for: 0.0,
            tick: 0,
            seed,
            progress: ProgressModel::new(&tuning),
            lane: LaneModel::new(&tuning),
            spawner: SpawnScheduler::new(&tuning, seed)?,
            resolver: CollisionResolver::new(&tuning),
            powerups: PowerUpState::new(&tuning),
            score: ScoreState::new(&tuning, store),
            tuning,
            pending: Vec::new(),
        })
    }

    /// Advance by `dt` simulated seconds after applying `intents`.
    /// Outside of Playing only intents are processed.
    pub fn tick(&mut self, dt: f32, intents: &[Intent]) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);
        for &intent in intents {
            self.apply_intent(intent, &mut events);
        }
        if self.phase != GamePhase::Playing || !(dt.is_finite() && dt > 0.0) {
            return events;
        }

        self.tick += 1;
        self.progress.update(dt);
        if self.invulnerable_for > 0.0 {
            self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
        }

        if self.lane.update(dt) {
            events.push(GameEvent::Landed);
        }

        let clock = self.spawn_clock();
        self.spawner.recycle_passed(clock.rolled, &mut events);
        if let Some(wave) = self.spawner.maybe_spawn_obstacle(&self.progress, clock, &mut events) {
            if wave.spawned > 0 {
                self.score.add_bonus(self.progress.wave_bonus());
            }
        }
        self.spawner.maybe_spawn_collectible(&self.progress, clock, &mut events);

        let ctx = ResolveContext {
            hero: self.lane.hero(),
            rolled: clock.rolled,
            tick: self.tick,
            dt,
            magnet_active: self.powerups.is_active(PowerUpKind::Magnet),
            invulnerable: self.invulnerable_for > 0.0,
        };
        let (obstacles, collectibles) = self.spawner.pools_mut();
        match self.resolver.resolve(ctx, obstacles, collectibles, &mut events) {
            Some(CollisionOutcome::ObstacleHit { kind, .. }) => self.on_obstacle_hit(kind, &mut events),
            Some(CollisionOutcome::Collected { kind, .. }) => self.on_collected(kind, &mut events),
            None => {}
        }
        if self.phase == GamePhase::GameOver {
            return events;
        }

        self.powerups.update(dt, &mut events);
        self.score.set_multiplier(self.powerups.multiplier());
        self.score
            .accrue_continuous(dt, self.progress.difficulty_factor(), self.score.multiplier());
        self.score.drain_events(&mut events);
        events
    }

    fn apply_intent(&mut self, intent: Intent, events: &mut Vec<GameEvent>) {
        match (self.phase, intent) {
            (GamePhase::Menu, Intent::Restart | Intent::Jump) => self.start_run(self.seed, events),
            (GamePhase::GameOver, Intent::Restart | Intent::Jump) => {
                let seed = next_seed(self.seed);
                self.start_run(seed, events);
            }
            (GamePhase::Playing, Intent::PauseToggle) => self.set_phase(GamePhase::Paused, events),
            (GamePhase::Paused, Intent::PauseToggle) => self.set_phase(GamePhase::Playing, events),
            (GamePhase::Playing, Intent::MoveLeft) => self.lane.shift_left(),
            (GamePhase::Playing, Intent::MoveRight) => self.lane.shift_right(),
            (GamePhase::Playing, Intent::Jump) => {
                if let Some(phase) = self.lane.jump() {
                    events.push(GameEvent::Jumped {
                        double: phase == JumpPhase::DoubleJumping,
                    });
                }
            }
            _ => {}
        }
    }

    fn set_phase(&mut self, phase: GamePhase, events: &mut Vec<GameEvent>) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        events.push(GameEvent::StateChanged { phase });
    }

    fn start_run(&mut self, seed: u64, events: &mut Vec<GameEvent>) {
        log::info!("Starting run (seed {})", seed);
        self.seed = seed;
        self.tick = 0;
        self.lives = START_LIVES;
        self.invulnerable_for = 0.0;
        self.progress.reset();
        self.lane.reset();
        self.powerups.clear();
        self.score.reset();
        self.spawner.reset(&self.tuning, seed, events);

        self.set_phase(GamePhase::Playing, events);
        events.push(GameEvent::LivesChanged { lives: self.lives });
        self.score.drain_events(events);
    }

    /// Shield first, then a spare life, then game over
    fn on_obstacle_hit(&mut self, kind: ObstacleKind, events: &mut Vec<GameEvent>) {
        if self.powerups.consume_shield_on_hit() {
            log::debug!("Shield absorbed {:?}", kind);
            events.push(GameEvent::ObstacleHit { kind, absorbed: true });
            events.push(GameEvent::PowerUpExpired { kind: PowerUpKind::Shield });
            return;
        }

        events.push(GameEvent::ObstacleHit { kind, absorbed: false });
        if self.lives > 1 {
            self.lives -= 1;
            self.invulnerable_for = self.tuning.invulnerability_secs;
            log::debug!("Hit {:?}, {} lives left", kind, self.lives);
            events.push(GameEvent::LivesChanged { lives: self.lives });
        } else {
            self.lives = 0;
            events.push(GameEvent::LivesChanged { lives: 0 });
            self.game_over(events);
        }
    }

    fn on_collected(&mut self, kind: CollectibleKind, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::CollectibleCollected { kind });
        match kind {
            CollectibleKind::Coin => {
                self.score.add_coin();
            }
            CollectibleKind::ExtraLife => {
                if self.lives < MAX_LIVES {
                    self.lives += 1;
                    events.push(GameEvent::LivesChanged { lives: self.lives });
                }
            }
            CollectibleKind::Shield | CollectibleKind::Magnet | CollectibleKind::DoublePoints => {
                if let Some(power_up) = kind.power_up() {
                    events.push(self.powerups.activate(power_up));
                }
            }
        }
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        let final_score = self.score.finalize();
        self.score.drain_events(events);
        log::info!(
            "Game over: score {}, coins {}, high score {}",
            final_score,
            self.score.coins(),
            self.score.high_score()
        );
        events.push(GameEvent::GameOver {
            final_score,
            coins: self.score.coins(),
        });
        self.set_phase(GamePhase::GameOver, events);
    }

    fn spawn_clock(&self) -> SpawnClock {
        SpawnClock {
            now: self.progress.elapsed(),
            rolled: self.progress.distance(),
            tick: self.tick,
        }
    }

    /// Place an obstacle `ahead` units in front of the hero. It becomes
    /// collidable on the next tick.
    pub fn place_obstacle(&mut self, kind: ObstacleKind, lane: Lane, ahead: f32) -> Result<u32, SimError> {
        let clock = self.spawn_clock();
        self.spawner.place_obstacle(kind, lane, ahead, clock, &mut self.pending)
    }

    /// Place a collectible `ahead` units in front of the hero
    pub fn place_collectible(
        &mut self,
        kind: CollectibleKind,
        lane: Lane,
        ahead: f32,
    ) -> Result<u32, SimError> {
        let clock = self.spawn_clock();
        self.spawner.place_collectible(kind, lane, ahead, clock, &mut self.pending)
    }

    /// Spawn a collectible pattern right now, ignoring the schedule
    pub fn spawn_pattern(&mut self, pattern: CollectiblePattern) -> usize {
        let clock = self.spawn_clock();
        self.spawner.spawn_collectible_pattern(pattern, clock, &mut self.pending)
    }

    pub fn frame_view(&self) -> FrameView {
        let blink = self.invulnerable_for > 0.0 && ((self.invulnerable_for * 10.0) as u32) % 2 == 0;
        FrameView {
            phase: self.phase,
            hero: self.lane.hero().clone(),
            tilt: self.lane.tilt(),
            roll_angle: roll_angle(self.progress.distance()),
            score: self.score.display_score(),
            high_score: self.score.high_score(),
            coins: self.score.coins(),
            lives: self.lives,
            difficulty: self.progress.difficulty_factor(),
            blink,
            shield_remaining: self.powerups.remaining(PowerUpKind::Shield),
            magnet_remaining: self.powerups.remaining(PowerUpKind::Magnet),
            double_points_remaining: self.powerups.remaining(PowerUpKind::DoublePoints),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn progress(&self) -> &ProgressModel {
        &self.progress
    }

    pub fn lane(&self) -> &LaneModel {
        &self.lane
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn powerups(&self) -> &PowerUpState {
        &self.powerups
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }
}

/// Seed for the next run (PCG multiplier step)
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;

    /// Tuning with the random schedules pushed out of reach
    fn quiet() -> Tuning {
        Tuning {
            obstacle_base_interval: 1.0e6,
            collectible_base_interval: 1.0e6,
            ..Default::default()
        }
    }

    fn playing() -> GameLoop {
        let mut game = GameLoop::new(quiet(), 1, Box::new(MemoryStore::new())).unwrap();
        game.tick(SIM_DT, &[Intent::Restart]);
        game
    }

    fn run_for(game: &mut GameLoop, seconds: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            events.extend(game.tick(SIM_DT, &[]));
        }
        events
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut game = GameLoop::new(quiet(), 1, Box::new(MemoryStore::new())).unwrap();
        assert!(game.tick(SIM_DT, &[Intent::MoveLeft]).is_empty());
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.progress().elapsed(), 0.0);

        let events = game.tick(SIM_DT, &[Intent::Jump]);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(events.contains(&GameEvent::StateChanged { phase: GamePhase::Playing }));
        assert!(events.contains(&GameEvent::LivesChanged { lives: 3 }));
        // Start intent is not also a jump
        assert_eq!(game.lane().hero().jump_phase, JumpPhase::Grounded);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            gravity: -1.0,
            ..Default::default()
        };
        assert!(GameLoop::new(tuning, 1, Box::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn test_jump_events() {
        let mut game = playing();
        let events = game.tick(SIM_DT, &[Intent::Jump]);
        assert!(events.contains(&GameEvent::Jumped { double: false }));
        let events = game.tick(SIM_DT, &[Intent::Jump]);
        assert!(events.contains(&GameEvent::Jumped { double: true }));
        let events = game.tick(SIM_DT, &[Intent::Jump]);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Jumped { .. })));
        let events = run_for(&mut game, 2.0);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Landed).count(), 1);
    }

    #[test]
    fn test_lane_change_moves_hero() {
        let mut game = playing();
        game.tick(SIM_DT, &[Intent::MoveLeft]);
        run_for(&mut game, 3.0);
        assert_eq!(game.lane().hero().lane, Lane::Left);
        assert_eq!(game.lane().hero().lateral, -1.0);
    }

    #[test]
    fn test_hit_costs_life_and_grants_grace() {
        let mut game = playing();
        game.place_obstacle(ObstacleKind::Tree, Lane::Middle, 0.0).unwrap();
        let events = game.tick(SIM_DT, &[]);
        assert!(events.contains(&GameEvent::ObstacleHit { kind: ObstacleKind::Tree, absorbed: false }));
        assert!(events.contains(&GameEvent::LivesChanged { lives: 2 }));
        assert!(game.is_invulnerable());

        // A second tree during the grace window passes through
        game.place_obstacle(ObstacleKind::Tree, Lane::Middle, 0.0).unwrap();
        game.tick(SIM_DT, &[]);
        assert_eq!(game.lives(), 2);

        run_for(&mut game, 1.1);
        assert!(!game.is_invulnerable());
    }

    #[test]
    fn test_coin_scores_and_counts() {
        let mut game = playing();
        game.place_collectible(CollectibleKind::Coin, Lane::Middle, 0.1).unwrap();
        let events = game.tick(SIM_DT, &[]);
        assert!(events.contains(&GameEvent::CollectibleCollected { kind: CollectibleKind::Coin }));
        assert_eq!(game.score().coins(), 1);
        assert!(game.score().score() >= 10.0);
    }

    #[test]
    fn test_extra_life_caps_at_max() {
        let mut game = playing();
        for _ in 0..4 {
            game.place_collectible(CollectibleKind::ExtraLife, Lane::Middle, 0.1).unwrap();
            game.tick(SIM_DT, &[]);
        }
        assert_eq!(game.lives(), MAX_LIVES);
    }

    #[test]
    fn test_double_points_sets_multiplier() {
        let mut game = playing();
        game.place_collectible(CollectibleKind::DoublePoints, Lane::Middle, 0.1).unwrap();
        let events = game.tick(SIM_DT, &[]);
        assert!(events.contains(&GameEvent::PowerUpActivated {
            kind: PowerUpKind::DoublePoints,
            duration: 20.0
        }));
        assert_eq!(game.score().multiplier(), 2);
    }

    #[test]
    fn test_scheduled_waves_award_distance_bonus() {
        let mut game = GameLoop::new(Tuning::default(), 3, Box::new(MemoryStore::new())).unwrap();
        game.tick(SIM_DT, &[Intent::Restart]);
        // First wave is due at 0.8 s and spawns well ahead of the hero
        let events = run_for(&mut game, 0.85);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ObstacleSpawned(_))));
        // Continuous accrual alone would be ~8.5 points
        assert!(game.score().score() > 20.0);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut game = playing();
        for _ in 0..3 {
            game.place_obstacle(ObstacleKind::Tree, Lane::Middle, 0.0).unwrap();
            game.tick(SIM_DT, &[]);
            run_for(&mut game, 1.1);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        let frozen = game.score().score();
        assert!(game.tick(SIM_DT, &[]).is_empty());
        assert_eq!(game.score().score(), frozen);

        let seed = game.seed();
        let events = game.tick(SIM_DT, &[Intent::Restart]);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_ne!(game.seed(), seed);
        assert_eq!(game.lives(), START_LIVES);
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0 }));
    }

    #[test]
    fn test_frame_view_reflects_state() {
        let mut game = playing();
        run_for(&mut game, 1.0);
        let view = game.frame_view();
        assert_eq!(view.phase, GamePhase::Playing);
        assert_eq!(view.lives, 3);
        assert!(view.roll_angle > 0.0);
        assert!(!view.blink);
    }
}
