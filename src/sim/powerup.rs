//! Timed power-up effects
//!
//! Each effect has its own timer. Re-activating an active effect resets its
//! timer to the full duration; effects never stack.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, PowerUpKind};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PowerUpTimer {
    pub active: bool,
    pub remaining: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpState {
    shield: PowerUpTimer,
    magnet: PowerUpTimer,
    double_points: PowerUpTimer,
    shield_secs: f32,
    magnet_secs: f32,
    double_points_secs: f32,
}

impl PowerUpState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            shield: PowerUpTimer::default(),
            magnet: PowerUpTimer::default(),
            double_points: PowerUpTimer::default(),
            shield_secs: tuning.shield_secs,
            magnet_secs: tuning.magnet_secs,
            double_points_secs: tuning.double_points_secs,
        }
    }

    pub fn duration(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Shield => self.shield_secs,
            PowerUpKind::Magnet => self.magnet_secs,
            PowerUpKind::DoublePoints => self.double_points_secs,
        }
    }

    fn timer(&self, kind: PowerUpKind) -> &PowerUpTimer {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Magnet => &self.magnet,
            PowerUpKind::DoublePoints => &self.double_points,
        }
    }

    fn timer_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpTimer {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Magnet => &mut self.magnet,
            PowerUpKind::DoublePoints => &mut self.double_points,
        }
    }

    /// Start (or restart) an effect. Returns the activation event.
    pub fn activate(&mut self, kind: PowerUpKind) -> GameEvent {
        let duration = self.duration(kind);
        let timer = self.timer_mut(kind);
        timer.active = true;
        timer.remaining = duration;
        GameEvent::PowerUpActivated { kind, duration }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timer(kind).active
    }

    /// Seconds left on an effect (0 when inactive)
    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        self.timer(kind).remaining
    }

    /// Count down all active timers, pushing an expiry event for each that runs out
    pub fn update(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        for kind in PowerUpKind::ALL {
            let timer = self.timer_mut(kind);
            if !timer.active {
                continue;
            }
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                *timer = PowerUpTimer::default();
                events.push(GameEvent::PowerUpExpired { kind });
            }
        }
    }

    /// Spend the shield on a hit. Returns true if the hit was absorbed.
    pub fn consume_shield_on_hit(&mut self) -> bool {
        if self.shield.active {
            self.shield = PowerUpTimer::default();
            true
        } else {
            false
        }
    }

    /// Score multiplier from DoublePoints
    pub fn multiplier(&self) -> u32 {
        if self.double_points.active { 2 } else { 1 }
    }

    pub fn clear(&mut self) {
        for kind in PowerUpKind::ALL {
            *self.timer_mut(kind) = PowerUpTimer::default();
        }
    }
}
