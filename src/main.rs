//! Sphere Runner entry point
//!
//! Native builds run a headless scripted run and print a summary. The
//! browser build is driven through `sphere_runner::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use sphere_runner::audio::{AudioRouter, SoundEffect};
    use sphere_runner::persistence::MemoryStore;
    use sphere_runner::platform::{AudioPort, Collaborators, InputSource, PortError};
    use sphere_runner::runner::Runner;
    use sphere_runner::sim::{GameEvent, GameLoop, GamePhase, Intent};
    use sphere_runner::{Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 120.0;

    /// Starts the run, then weaves and hops on a fixed rhythm
    struct Autopilot {
        frame: u32,
    }

    impl InputSource for Autopilot {
        fn poll(&mut self) -> Vec<Intent> {
            self.frame += 1;
            match self.frame {
                1 => vec![Intent::Restart],
                f if f % 90 == 0 => vec![Intent::MoveLeft],
                f if f % 90 == 45 => vec![Intent::MoveRight],
                f if f % 40 == 0 => vec![Intent::Jump],
                _ => Vec::new(),
            }
        }
    }

    /// Logs sound cues instead of playing them
    struct LogAudio;

    impl AudioPort for LogAudio {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), PortError> {
            log::debug!("play {:?} at {:.2}", effect, volume);
            Ok(())
        }

        fn stop_loop(&mut self, effect: SoundEffect) -> Result<(), PortError> {
            log::debug!("stop {:?}", effect);
            Ok(())
        }

        fn set_muted(&mut self, muted: bool) -> Result<(), PortError> {
            log::debug!("muted: {}", muted);
            Ok(())
        }
    }

    fn load_tuning() -> Result<Tuning, Box<dyn std::error::Error>> {
        match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Ok(Tuning::from_json(&std::fs::read_to_string(path)?)?)
            }
            None => Ok(Tuning::default()),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let tuning = load_tuning()?;
        let seed = 0x5EED;
        let store = MemoryStore::new();
        let game = GameLoop::new(tuning, seed, Box::new(store.clone()))?;

        let settings = Settings::load();
        let pickups = Rc::new(RefCell::new(0u32));
        let mut collaborators =
            Collaborators::new().with_audio(Box::new(LogAudio), AudioRouter::from_settings(&settings));
        {
            let pickups = pickups.clone();
            collaborators.subscribe(Box::new(move |event: &GameEvent| match event {
                GameEvent::CollectibleCollected { .. } => *pickups.borrow_mut() += 1,
                GameEvent::LivesChanged { lives } => log::info!("Lives: {}", lives),
                GameEvent::PowerUpActivated { kind, duration } => {
                    log::info!("{:?} active for {}s", kind, duration)
                }
                _ => {}
            }));
        }

        let mut runner = Runner::new(game, collaborators).with_input(Box::new(Autopilot { frame: 0 }));
        let mut elapsed = 0.0;
        while elapsed < MAX_SECONDS {
            runner.frame(FRAME_DT);
            elapsed += FRAME_DT;
            if runner.game().phase() == GamePhase::GameOver {
                break;
            }
        }

        let game = runner.game();
        println!("\nSphere Runner headless run (seed {:#x})", seed);
        println!("  survived:   {:.1}s", game.progress().elapsed());
        println!("  distance:   {:.1}", game.progress().distance());
        println!("  score:      {}", game.score().display_score());
        println!("  coins:      {}", game.score().coins());
        println!("  pickups:    {}", pickups.borrow());
        println!("  high score: {} ({} writes)", game.score().high_score(), store.writes());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sphere Runner (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");

    if let Err(e) = headless::run() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sphere_runner::web::start, this is just to satisfy the compiler
}
