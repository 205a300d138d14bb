//! Score, coins and high score
//!
//! Score accrues continuously while playing and jumps on bonuses. The high
//! score is written through to the store as soon as the floored score beats it.

use super::state::GameEvent;
use crate::persistence::PersistenceStore;
use crate::tuning::Tuning;

pub struct ScoreState {
    score: f64,
    coins: u32,
    multiplier: u32,
    high_score: u64,
    rate: f64,
    coin_value: f64,
    store: Box<dyn PersistenceStore>,
    reported_score: u64,
    reported_high: u64,
}

impl std::fmt::Debug for ScoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreState")
            .field("score", &self.score)
            .field("coins", &self.coins)
            .field("multiplier", &self.multiplier)
            .field("high_score", &self.high_score)
            .finish_non_exhaustive()
    }
}

impl ScoreState {
    pub fn new(tuning: &Tuning, store: Box<dyn PersistenceStore>) -> Self {
        let high_score = match store.high_score() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Could not load high score: {}", e);
                0
            }
        };
        log::info!("Loaded high score {}", high_score);
        Self {
            score: 0.0,
            coins: 0,
            multiplier: 1,
            high_score,
            rate: tuning.score_rate,
            coin_value: tuning.coin_value,
            store,
            reported_score: 0,
            reported_high: high_score,
        }
    }

    /// Add `dt * rate * difficulty * multiplier`
    pub fn accrue_continuous(&mut self, dt: f32, difficulty: f32, multiplier: u32) {
        if !(dt > 0.0) {
            return;
        }
        self.score += dt as f64 * self.rate * difficulty as f64 * multiplier as f64;
        self.update_high_score();
    }

    /// Add a flat bonus scaled by the current multiplier. Returns the points added.
    pub fn add_bonus(&mut self, points: f64) -> f64 {
        let added = points * self.multiplier as f64;
        self.score += added;
        self.update_high_score();
        added
    }

    /// Coin pickup: one coin and its point value
    pub fn add_coin(&mut self) -> f64 {
        self.coins += 1;
        self.add_bonus(self.coin_value)
    }

    pub fn set_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier.max(1);
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    fn update_high_score(&mut self) {
        let current = self.display_score();
        if current <= self.high_score {
            return;
        }
        self.high_score = current;
        if let Err(e) = self.store.set_high_score(current) {
            log::warn!("Could not save high score: {}", e);
        }
    }

    /// End of run: make sure the high score reflects the final score
    pub fn finalize(&mut self) -> u64 {
        self.update_high_score();
        self.display_score()
    }

    /// Push score/high score change events since the last drain
    pub fn drain_events(&mut self, events: &mut Vec<GameEvent>) {
        let score = self.display_score();
        if score != self.reported_score {
            self.reported_score = score;
            events.push(GameEvent::ScoreChanged { score });
        }
        if self.high_score != self.reported_high {
            self.reported_high = self.high_score;
            events.push(GameEvent::HighScoreChanged {
                high_score: self.high_score,
            });
        }
    }

    /// New run: clear score and coins, keep the high score
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.coins = 0;
        self.multiplier = 1;
        self.reported_score = u64::MAX;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    fn score_with(store: MemoryStore) -> ScoreState {
        ScoreState::new(&Tuning::default(), Box::new(store))
    }

    #[test]
    fn test_double_multiplier_is_exactly_double() {
        let mut single = score_with(MemoryStore::new());
        let mut double = score_with(MemoryStore::new());
        let dts = [0.016_f32, 0.017, 0.033, 0.0167, 0.1, 0.008];
        for i in 0..500 {
            let dt = dts[i % dts.len()];
            let difficulty = 1.0 + i as f32 * 0.004;
            single.accrue_continuous(dt, difficulty, 1);
            double.accrue_continuous(dt, difficulty, 2);
        }
        assert!(single.score() > 0.0);
        assert_eq!(double.score(), single.score() * 2.0);
    }

    #[test]
    fn test_bonus_uses_multiplier() {
        let mut s = score_with(MemoryStore::new());
        assert_eq!(s.add_coin(), 10.0);
        s.set_multiplier(2);
        assert_eq!(s.add_coin(), 20.0);
        assert_eq!(s.coins(), 2);
        assert_eq!(s.display_score(), 30);
    }

    #[test]
    fn test_high_score_persists_immediately() {
        let store = MemoryStore::with_high_score(15);
        let mut s = score_with(store.clone());
        s.add_bonus(10.0);
        assert_eq!(store.writes(), 0);
        s.add_bonus(10.0);
        assert_eq!(s.high_score(), 20);
        assert_eq!(store.high_score().unwrap(), 20);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut s = score_with(MemoryStore::new());
        s.add_bonus(42.0);
        s.reset();
        assert_eq!(s.score(), 0.0);
        assert_eq!(s.high_score(), 42);
    }

    #[test]
    fn test_drain_events_reports_changes_once() {
        let mut s = score_with(MemoryStore::new());
        let mut events = Vec::new();
        s.add_bonus(5.0);
        s.drain_events(&mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { score: 5 },
                GameEvent::HighScoreChanged { high_score: 5 },
            ]
        );
        events.clear();
        s.drain_events(&mut events);
        assert!(events.is_empty());
    }

    struct BrokenStore;

    impl PersistenceStore for BrokenStore {
        fn high_score(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn set_high_score(&mut self, _value: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_store_failures_do_not_affect_score() {
        let mut s = ScoreState::new(&Tuning::default(), Box::new(BrokenStore));
        assert_eq!(s.high_score(), 0);
        s.add_bonus(7.0);
        assert_eq!(s.display_score(), 7);
        assert_eq!(s.high_score(), 7);
    }
}
