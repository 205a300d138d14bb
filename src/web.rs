//! Browser entry point
//!
//! A thin `wasm-bindgen` facade: the page forwards key presses as intents,
//! calls `frame` from `requestAnimationFrame`, and receives the frame's
//! events, sound cues and render snapshot as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioCue, AudioRouter};
use crate::persistence::LocalStorageStore;
use crate::platform::Collaborators;
use crate::runner::Runner;
use crate::settings::Settings;
use crate::sim::{FrameView, GameEvent, GameLoop, Intent};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Sphere Runner core loaded");
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    events: &'a [GameEvent],
    cues: Vec<AudioCue>,
    view: FrameView,
}

#[wasm_bindgen]
pub struct WebGame {
    runner: Runner,
    router: AudioRouter,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game. `tuning_json` overrides balance values when given.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: Option<String>) -> Result<WebGame, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let settings = Settings::load();
        let game = GameLoop::new(tuning, seed as u64, Box::new(LocalStorageStore::new()))?;
        log::info!("Created game with seed {}", seed as u64);
        Ok(Self {
            runner: Runner::new(game, Collaborators::new()),
            router: AudioRouter::from_settings(&settings),
            settings,
        })
    }

    /// Create a game seeded from the current time
    pub fn seeded_now(tuning_json: Option<String>) -> Result<WebGame, JsError> {
        Self::new(js_sys::Date::now(), tuning_json)
    }

    /// Queue an intent by name: left, right, jump, pause, restart
    pub fn intent(&mut self, name: &str) -> Result<(), JsError> {
        let intent = match name {
            "left" => Intent::MoveLeft,
            "right" => Intent::MoveRight,
            "jump" => Intent::Jump,
            "pause" => Intent::PauseToggle,
            "restart" => Intent::Restart,
            other => return Err(JsError::new(&format!("unknown intent '{}'", other))),
        };
        self.runner.push_intent(intent);
        Ok(())
    }

    /// Advance one display frame (`dt` in seconds) and return it as JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsError> {
        let events = self.runner.frame(dt);
        let cues = events.iter().flat_map(|e| self.router.cues(e)).collect();
        let mut view = self.runner.game().frame_view();
        view.blink = self.settings.effective_blink(view.blink);
        view.tilt = self.settings.effective_tilt(view.tilt);
        let output = FrameOutput {
            events: &events,
            cues,
            view,
        };
        Ok(serde_json::to_string(&output)?)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.runner.resize(width, height);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.router.set_muted(muted);
        self.settings.muted = muted;
        self.settings.save();
    }

    pub fn high_score(&self) -> f64 {
        self.runner.game().score().high_score() as f64
    }
}
