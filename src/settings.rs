//! Host settings and preferences
//!
//! Serialized as JSON; missing fields fall back to defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::AudioMixer;
use crate::consts::{DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
use crate::host::DEFAULT_UI_SYNC_INTERVAL;
use crate::sim::state::RunConfig;
use crate::sim::weapons::WeaponId;

/// Shortest UI sync interval a host may ask for (seconds)
pub const MIN_UI_SYNC_INTERVAL: f32 = 0.05;

/// How the player steers and aims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Pointer aims, keys move
    #[default]
    MouseKeyboard,
    /// Virtual stick moves; every weapon auto-aims
    Touch,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::MouseKeyboard => "mouse_keyboard",
            InputMode::Touch => "touch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mouse_keyboard" | "mouse" | "keyboard" | "desktop" => Some(InputMode::MouseKeyboard),
            "touch" | "mobile" => Some(InputMode::Touch),
            _ => None,
        }
    }

    pub fn forces_auto_aim(&self) -> bool {
        matches!(self, InputMode::Touch)
    }
}

/// Host preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Minimum seconds between HUD refreshes
    pub ui_sync_interval: f32,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Viewport ===
    pub view_width: f32,
    pub view_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::MouseKeyboard,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            ui_sync_interval: DEFAULT_UI_SYNC_INTERVAL,
            screen_shake: true,
            reduced_motion: false,
            view_width: DEFAULT_VIEW_WIDTH,
            view_height: DEFAULT_VIEW_HEIGHT,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Shake a renderer should apply for the world's raw shake amount
    pub fn shake_amount(&self, raw: f32) -> f32 {
        if self.effective_screen_shake() {
            raw
        } else {
            0.0
        }
    }

    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.view_width, self.view_height).max(Vec2::ONE)
    }

    /// Clamp out-of-range values loaded from disk
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if !self.ui_sync_interval.is_finite() {
            self.ui_sync_interval = DEFAULT_UI_SYNC_INTERVAL;
        }
        self.ui_sync_interval = self.ui_sync_interval.max(MIN_UI_SYNC_INTERVAL);
        if !(self.view_width.is_finite() && self.view_width >= 1.0) {
            self.view_width = DEFAULT_VIEW_WIDTH;
        }
        if !(self.view_height.is_finite() && self.view_height >= 1.0) {
            self.view_height = DEFAULT_VIEW_HEIGHT;
        }
        self
    }

    /// Run parameters for a new run under these settings
    pub fn to_run_config(&self, seed: u64, weapon: WeaponId) -> RunConfig {
        RunConfig {
            seed,
            starting_weapon: weapon,
            view_size: self.view_size(),
            force_auto_aim: self.input_mode.forces_auto_aim(),
        }
    }

    pub fn mixer(&self) -> AudioMixer {
        let mut mixer = AudioMixer::new(self.master_volume, self.sfx_volume);
        mixer.set_muted(self.muted);
        mixer
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_mode_parse() {
        assert_eq!(InputMode::from_str("Touch"), Some(InputMode::Touch));
        assert_eq!(InputMode::from_str("mouse"), Some(InputMode::MouseKeyboard));
        assert_eq!(InputMode::from_str("gamepad"), None);
        assert_eq!(
            InputMode::from_str(InputMode::Touch.as_str()),
            Some(InputMode::Touch)
        );
    }

    #[test]
    fn test_touch_forces_auto_aim() {
        let settings = Settings {
            input_mode: InputMode::Touch,
            ..Settings::default()
        };
        let config = settings.to_run_config(7, WeaponId::LaserTech);
        assert!(config.force_auto_aim);
        assert_eq!(config.seed, 7);
        assert_eq!(config.starting_weapon, WeaponId::LaserTech);
        assert!(!Settings::default().to_run_config(7, WeaponId::Standard).force_auto_aim);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert_eq!(settings.shake_amount(12.0), 12.0);
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert_eq!(settings.shake_amount(12.0), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "master_volume": 4.0}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.view_width, DEFAULT_VIEW_WIDTH);
        assert_eq!(settings.mixer().effective_volume(), 0.0);
    }

    #[test]
    fn test_sanitize_bad_values() {
        let settings = Settings {
            ui_sync_interval: 0.0,
            view_width: -5.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.ui_sync_interval, MIN_UI_SYNC_INTERVAL);
        assert_eq!(settings.view_width, DEFAULT_VIEW_WIDTH);
    }
}
