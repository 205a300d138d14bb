//! Player settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no invulnerability blink, no hero tilt)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Whether the hero should blink while invulnerable
    pub fn effective_blink(&self, blink: bool) -> bool {
        blink && !self.reduced_motion
    }

    /// Hero lean toward the target lane (0 with reduced motion)
    pub fn effective_tilt(&self, tilt: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { tilt }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "sphere_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                report_save(storage.set_item(Self::STORAGE_KEY, &json));
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Log the outcome of a settings write. Returns true if it was stored.
#[cfg(any(target_arch = "wasm32", test))]
fn report_save<E: std::fmt::Debug>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => {
            log::info!("Settings saved");
            true
        }
        Err(e) => {
            log::warn!("Failed to save settings: {:?}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_suppresses_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_blink(true));
        assert_eq!(settings.effective_tilt(0.4), 0.0);
        assert!(Settings::default().effective_blink(true));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 0.7);
    }

    #[test]
    fn test_stale_fields_are_ignored() {
        // Older saves carried HUD and focus toggles that no longer exist
        let json = r#"{ "reduced_motion": true, "show_fps": true, "mute_on_blur": false }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.sfx_volume, 1.0);
    }

    #[test]
    fn test_rejected_write_is_not_reported_saved() {
        assert!(report_save::<&str>(Ok(())));
        assert!(!report_save(Err("QuotaExceededError")));
    }
}
