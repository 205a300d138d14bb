//! Sound cues for game events
//!
//! The core never synthesizes audio. It maps events to cues and hands them to
//! an [`AudioPort`](crate::platform::AudioPort) with the player's volume applied.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{CollectibleKind, GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Shield picked up
    Shield,
    /// Magnet or double points picked up
    PowerUp,
    ExtraLife,
    Jump,
    DoubleJump,
    /// Unabsorbed obstacle hit
    Collision,
    /// Shield absorbed a hit
    ShieldBreak,
    GameOver,
    /// Looping music while playing
    BackgroundMusic,
}

impl SoundEffect {
    /// Base volume before player settings
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Coin | SoundEffect::Jump => 0.5,
            SoundEffect::DoubleJump => 0.6,
            SoundEffect::Shield | SoundEffect::PowerUp | SoundEffect::ShieldBreak => 0.7,
            SoundEffect::ExtraLife | SoundEffect::Collision | SoundEffect::GameOver => 0.8,
            SoundEffect::BackgroundMusic => 0.4,
        }
    }

    pub fn is_music(self) -> bool {
        matches!(self, SoundEffect::BackgroundMusic)
    }
}

/// Instruction for the audio port
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AudioCue {
    Play { effect: SoundEffect, volume: f32 },
    StopLoop { effect: SoundEffect },
}

/// Sound effect for an event, if it has one
pub fn sound_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::CollectibleCollected { kind } => Some(match kind {
            CollectibleKind::Coin => SoundEffect::Coin,
            CollectibleKind::Shield => SoundEffect::Shield,
            CollectibleKind::Magnet | CollectibleKind::DoublePoints => SoundEffect::PowerUp,
            CollectibleKind::ExtraLife => SoundEffect::ExtraLife,
        }),
        GameEvent::Jumped { double: false } => Some(SoundEffect::Jump),
        GameEvent::Jumped { double: true } => Some(SoundEffect::DoubleJump),
        GameEvent::ObstacleHit { absorbed: true, .. } => Some(SoundEffect::ShieldBreak),
        GameEvent::ObstacleHit { absorbed: false, .. } => Some(SoundEffect::Collision),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        GameEvent::StateChanged { phase: GamePhase::Playing } => Some(SoundEffect::BackgroundMusic),
        _ => None,
    }
}

/// Turns events into cues using the player's volume settings
#[derive(Debug, Clone)]
pub struct AudioRouter {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioRouter {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioRouter {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effective volume for an effect, 0 when muted
    pub fn volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if effect.is_music() { self.music_volume } else { self.sfx_volume };
        effect.base_volume() * self.master_volume * channel
    }

    /// Cues for one event. Leaving Playing stops the music loop.
    pub fn cues(&self, event: &GameEvent) -> Vec<AudioCue> {
        let mut cues = Vec::new();
        if let GameEvent::StateChanged { phase } = event {
            if *phase != GamePhase::Playing {
                cues.push(AudioCue::StopLoop {
                    effect: SoundEffect::BackgroundMusic,
                });
            }
        }
        if let Some(effect) = sound_for_event(event) {
            let volume = self.volume(effect);
            if volume > 0.0 {
                cues.push(AudioCue::Play { effect, volume });
            }
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObstacleKind, PowerUpKind};

    #[test]
    fn test_pickups_map_to_sounds() {
        let sound = |kind| sound_for_event(&GameEvent::CollectibleCollected { kind });
        assert_eq!(sound(CollectibleKind::Coin), Some(SoundEffect::Coin));
        assert_eq!(sound(CollectibleKind::Magnet), Some(SoundEffect::PowerUp));
        assert_eq!(sound(CollectibleKind::ExtraLife), Some(SoundEffect::ExtraLife));
        assert_eq!(
            sound_for_event(&GameEvent::PowerUpExpired { kind: PowerUpKind::Shield }),
            None
        );
    }

    #[test]
    fn test_absorbed_hit_sounds_different() {
        let hit = |absorbed| {
            sound_for_event(&GameEvent::ObstacleHit {
                kind: ObstacleKind::Rock,
                absorbed,
            })
        };
        assert_eq!(hit(true), Some(SoundEffect::ShieldBreak));
        assert_eq!(hit(false), Some(SoundEffect::Collision));
    }

    #[test]
    fn test_muted_router_only_stops_music() {
        let mut router = AudioRouter::default();
        router.set_muted(true);
        assert!(router.cues(&GameEvent::Jumped { double: false }).is_empty());
        assert_eq!(
            router.cues(&GameEvent::StateChanged { phase: GamePhase::Paused }),
            vec![AudioCue::StopLoop { effect: SoundEffect::BackgroundMusic }]
        );
    }

    #[test]
    fn test_volume_applies_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 1.0,
            music_volume: 0.5,
            ..Settings::default()
        };
        let router = AudioRouter::from_settings(&settings);
        assert!((router.volume(SoundEffect::Coin) - 0.25).abs() < 1e-6);
        assert!((router.volume(SoundEffect::BackgroundMusic) - 0.1).abs() < 1e-6);
    }
}
