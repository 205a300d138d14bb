//! Frame driver
//!
//! Turns variable display-refresh deltas into fixed simulation steps and
//! forwards each step's events to the collaborators.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::{Collaborators, InputSource};
use crate::sim::{GameEvent, GameLoop, Intent};

/// Fixed-step accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame delta, returning how many `SIM_DT` steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt.min(MAX_FRAME_DT);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Leftover time not yet simulated
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

pub struct Runner {
    game: GameLoop,
    clock: FrameClock,
    input: Option<Box<dyn InputSource>>,
    collaborators: Collaborators,
    queued: Vec<Intent>,
}

impl Runner {
    pub fn new(game: GameLoop, collaborators: Collaborators) -> Self {
        Self {
            game,
            clock: FrameClock::new(),
            input: None,
            collaborators,
            queued: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: Box<dyn InputSource>) -> Self {
        self.input = Some(input);
        self
    }

    /// Queue an intent for the next frame
    pub fn push_intent(&mut self, intent: Intent) {
        self.queued.push(intent);
    }

    /// Run one display frame. Intents go into the first substep only.
    pub fn frame(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let mut intents = std::mem::take(&mut self.queued);
        if let Some(input) = self.input.as_mut() {
            intents.extend(input.poll());
        }

        let steps = self.clock.advance(frame_dt);
        let mut events = Vec::new();
        if steps == 0 {
            if !intents.is_empty() {
                events.extend(self.game.tick(0.0, &intents));
            }
        } else {
            for step in 0..steps {
                let step_intents: &[Intent] = if step == 0 { &intents } else { &[] };
                events.extend(self.game.tick(SIM_DT, step_intents));
            }
        }

        self.collaborators.dispatch(&events);
        self.collaborators.render(&self.game.frame_view());
        events
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.collaborators.resize(width, height);
    }

    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameLoop {
        &mut self.game
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }
}
