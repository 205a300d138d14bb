//! Platform abstraction layer
//!
//! Ports the core talks to without depending on them:
//! - Rendering and entity presenters
//! - Audio output
//! - Input intents
//!
//! A failing port is logged and skipped. It never reaches game state.

use thiserror::Error;

use crate::audio::{AudioCue, AudioRouter, SoundEffect};
use crate::sim::{CollectibleKind, EntityDescriptor, FrameView, GameEvent, Intent, ObstacleKind};

/// Failure reported by a collaborator
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("{port} failed: {message}")]
    Failed { port: &'static str, message: String },
}

pub trait RenderSurface {
    fn render_frame(&mut self, view: &FrameView) -> Result<(), PortError>;
    fn resize(&mut self, width: u32, height: u32) -> Result<(), PortError>;
}

/// Places obstacles on the curved path and hides them again
pub trait ObstaclePresenter {
    fn show(&mut self, obstacle: &EntityDescriptor<ObstacleKind>) -> Result<(), PortError>;
    fn hide(&mut self, id: u32) -> Result<(), PortError>;
}

pub trait CollectiblePresenter {
    fn show(&mut self, collectible: &EntityDescriptor<CollectibleKind>) -> Result<(), PortError>;
    fn hide(&mut self, id: u32) -> Result<(), PortError>;
    /// Collectible was pulled by the magnet
    fn moved(&mut self, collectible: &EntityDescriptor<CollectibleKind>) -> Result<(), PortError>;
}

pub trait AudioPort {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), PortError>;
    fn stop_loop(&mut self, effect: SoundEffect) -> Result<(), PortError>;
    fn set_muted(&mut self, muted: bool) -> Result<(), PortError>;
}

/// Source of player intents, polled once per frame
pub trait InputSource {
    fn poll(&mut self) -> Vec<Intent>;
}

/// Event listener for HUD and other subscribers
pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Fan-out of tick events to every attached collaborator
#[derive(Default)]
pub struct Collaborators {
    surface: Option<Box<dyn RenderSurface>>,
    obstacles: Option<Box<dyn ObstaclePresenter>>,
    collectibles: Option<Box<dyn CollectiblePresenter>>,
    audio: Option<Box<dyn AudioPort>>,
    router: AudioRouter,
    listeners: Vec<Listener>,
    failures: u64,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, surface: Box<dyn RenderSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_obstacle_presenter(mut self, presenter: Box<dyn ObstaclePresenter>) -> Self {
        self.obstacles = Some(presenter);
        self
    }

    pub fn with_collectible_presenter(mut self, presenter: Box<dyn CollectiblePresenter>) -> Self {
        self.collectibles = Some(presenter);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPort>, router: AudioRouter) -> Self {
        self.audio = Some(audio);
        self.router = router;
        self
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Port calls that failed so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.router.set_muted(muted);
        if let Some(audio) = self.audio.as_mut() {
            let result = audio.set_muted(muted);
            self.note(result);
        }
    }

    /// Deliver events in order to presenters, audio and listeners
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            self.present(event);
            self.sound(event);
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }

    pub fn render(&mut self, view: &FrameView) {
        if let Some(surface) = self.surface.as_mut() {
            let result = surface.render_frame(view);
            self.note(result);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            let result = surface.resize(width, height);
            self.note(result);
        }
    }

    fn present(&mut self, event: &GameEvent) {
        let result = match event {
            GameEvent::ObstacleSpawned(desc) => self.obstacles.as_mut().map(|p| p.show(desc)),
            GameEvent::ObstacleDespawned { id } => self.obstacles.as_mut().map(|p| p.hide(*id)),
            GameEvent::CollectibleSpawned(desc) => self.collectibles.as_mut().map(|p| p.show(desc)),
            GameEvent::CollectibleDespawned { id } => self.collectibles.as_mut().map(|p| p.hide(*id)),
            GameEvent::CollectibleMoved(desc) => self.collectibles.as_mut().map(|p| p.moved(desc)),
            _ => None,
        };
        if let Some(result) = result {
            self.note(result);
        }
    }

    fn sound(&mut self, event: &GameEvent) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        let mut results = Vec::new();
        for cue in self.router.cues(event) {
            results.push(match cue {
                AudioCue::Play { effect, volume } => audio.play(effect, volume),
                AudioCue::StopLoop { effect } => audio.stop_loop(effect),
            });
        }
        for result in results {
            self.note(result);
        }
    }

    fn note(&mut self, result: Result<(), PortError>) {
        if let Err(e) = result {
            self.failures += 1;
            log::warn!("Collaborator error (ignored): {}", e);
        }
    }
}
