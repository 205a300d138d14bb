//! Hero lane position and jump physics

use serde::{Deserialize, Serialize};

use super::state::Lane;
use crate::consts::HERO_BASE_HEIGHT;
use crate::tuning::Tuning;

/// Vertical state machine: Grounded -> Jumping -> DoubleJumping -> Grounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Grounded,
    Jumping,
    DoubleJumping,
}

impl JumpPhase {
    pub fn is_airborne(self) -> bool {
        !matches!(self, JumpPhase::Grounded)
    }
}

/// The hero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroState {
    /// Lane the hero is heading for
    pub lane: Lane,
    /// Continuous lateral position in lane units, [-1, 1]
    pub lateral: f32,
    /// Height of the hero centre above the surface
    pub height: f32,
    pub vertical_velocity: f32,
    pub jump_phase: JumpPhase,
    pub base_height: f32,
}

impl Default for HeroState {
    fn default() -> Self {
        Self {
            lane: Lane::Middle,
            lateral: 0.0,
            height: HERO_BASE_HEIGHT,
            vertical_velocity: 0.0,
            jump_phase: JumpPhase::Grounded,
            base_height: HERO_BASE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneModel {
    hero: HeroState,
    change_rate: f32,
    jump_force: f32,
    double_jump_force: f32,
    gravity: f32,
}

impl LaneModel {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            hero: HeroState::default(),
            change_rate: tuning.lane_change_rate,
            jump_force: tuning.jump_force,
            double_jump_force: tuning.double_jump_force,
            gravity: tuning.gravity,
        }
    }

    pub fn hero(&self) -> &HeroState {
        &self.hero
    }

    /// Teleport to a lane (run start / reset)
    pub fn set_lane(&mut self, lane: Lane) {
        self.hero.lane = lane;
        self.hero.lateral = lane.offset();
    }

    pub fn shift_left(&mut self) {
        self.hero.lane = self.hero.lane.left();
    }

    pub fn shift_right(&mut self) {
        self.hero.lane = self.hero.lane.right();
    }

    /// Close a fixed fraction of the remaining gap to `target` (exponential approach)
    pub fn move_toward(&mut self, target: Lane, dt: f32) {
        let frac = (self.change_rate * dt).clamp(0.0, 1.0);
        let goal = target.offset();
        self.hero.lateral += (goal - self.hero.lateral) * frac;
        if (goal - self.hero.lateral).abs() < 1e-4 {
            self.hero.lateral = goal;
        }
    }

    /// Trigger a jump. Returns the new phase, or None if no jump is left.
    pub fn jump(&mut self) -> Option<JumpPhase> {
        let next = match self.hero.jump_phase {
            JumpPhase::Grounded => {
                self.hero.vertical_velocity = self.jump_force;
                JumpPhase::Jumping
            }
            JumpPhase::Jumping => {
                self.hero.vertical_velocity = self.double_jump_force;
                JumpPhase::DoubleJumping
            }
            JumpPhase::DoubleJumping => return None,
        };
        self.hero.jump_phase = next;
        Some(next)
    }

    /// Integrate lane change and jump. Returns true on the tick the hero lands.
    pub fn update(&mut self, dt: f32) -> bool {
        self.move_toward(self.hero.lane, dt);

        if !self.hero.jump_phase.is_airborne() {
            return false;
        }
        self.hero.vertical_velocity -= self.gravity * dt;
        self.hero.height += self.hero.vertical_velocity * dt;

        if self.hero.height <= self.hero.base_height && self.hero.vertical_velocity <= 0.0 {
            self.hero.height = self.hero.base_height;
            self.hero.vertical_velocity = 0.0;
            self.hero.jump_phase = JumpPhase::Grounded;
            return true;
        }
        false
    }

    /// Visual lean toward the target lane, for renderers
    pub fn tilt(&self) -> f32 {
        (self.hero.lane.offset() - self.hero.lateral) * 0.5
    }

    pub fn reset(&mut self) {
        self.hero = HeroState::default();
        self.set_lane(Lane::Middle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn model() -> LaneModel {
        LaneModel::new(&Tuning::default())
    }

    #[test]
    fn test_double_jump_then_no_op() {
        let mut lane = model();
        assert_eq!(lane.jump(), Some(JumpPhase::Jumping));
        assert_eq!(lane.jump(), Some(JumpPhase::DoubleJumping));
        let v = lane.hero().vertical_velocity;
        assert_eq!(lane.jump(), None);
        assert_eq!(lane.hero().vertical_velocity, v);
        assert_eq!(lane.hero().jump_phase, JumpPhase::DoubleJumping);
    }

    #[test]
    fn test_lands_exactly_on_base() {
        let mut lane = model();
        lane.jump();
        lane.jump();
        let mut landed = false;
        for _ in 0..600 {
            if lane.update(SIM_DT) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        let hero = lane.hero();
        assert_eq!(hero.jump_phase, JumpPhase::Grounded);
        assert_eq!(hero.vertical_velocity, 0.0);
        assert_eq!(hero.height, hero.base_height);
    }

    #[test]
    fn test_jump_clears_rock_height() {
        let mut lane = model();
        lane.jump();
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            lane.update(SIM_DT);
            peak = peak.max(lane.hero().height - lane.hero().base_height);
        }
        assert!(peak > 0.4, "single jump peak {peak} should clear a rock");
    }

    #[test]
    fn test_lane_change_is_exponential() {
        let mut lane = model();
        lane.shift_left();
        lane.update(0.1);
        // 5/s * 0.1s closes half the gap
        assert!((lane.hero().lateral + 0.5).abs() < 1e-5);
        lane.update(0.1);
        assert!((lane.hero().lateral + 0.75).abs() < 1e-5);
        for _ in 0..200 {
            lane.update(SIM_DT);
        }
        assert_eq!(lane.hero().lateral, -1.0);
    }

    #[test]
    fn test_set_lane_teleports() {
        let mut lane = model();
        lane.set_lane(Lane::Right);
        assert_eq!(lane.hero().lateral, 1.0);
        assert_eq!(lane.tilt(), 0.0);
    }

    #[test]
    fn test_reset_returns_to_middle_on_ground() {
        let mut lane = model();
        lane.shift_left();
        lane.update(0.1);
        lane.jump();
        lane.update(0.05);
        lane.reset();
        let hero = lane.hero();
        assert_eq!(hero.lane, Lane::Middle);
        assert_eq!(hero.lateral, 0.0);
        assert_eq!(hero.jump_phase, JumpPhase::Grounded);
        assert_eq!(hero.height, hero.base_height);
        assert_eq!(lane.tilt(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_always_lands(dts in prop::collection::vec(0.001f32..0.05, 1..50), double in any::<bool>()) {
            let mut lane = model();
            lane.jump();
            if double {
                lane.jump();
            }
            for dt in dts {
                lane.update(dt);
                prop_assert!(lane.hero().height >= lane.hero().base_height);
            }
            for _ in 0..2000 {
                lane.update(SIM_DT);
            }
            prop_assert_eq!(lane.hero().jump_phase, JumpPhase::Grounded);
            prop_assert_eq!(lane.hero().vertical_velocity, 0.0);
            prop_assert_eq!(lane.hero().height, lane.hero().base_height);
        }
    }
}
