//! Sound cues and volume mixing
//!
//! The simulation only names cues; a host turns them into sound. Each cue carries a
//! short tone description (oscillator shape, start/end frequency, length, gain) that
//! a procedural synth can render directly.

use serde::{Deserialize, Serialize};

/// Sound cues raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Standard bullet
    Shoot,
    /// Piercing shot
    Laser,
    /// Explosive shot launched
    Rocket,
    /// Melee swing
    Swing,
    /// Orb added to the orbit
    OrbSpawn,
    /// Boomerang thrown
    Throw,
    /// Mine placed
    MineDrop,
    /// Drone shot
    Drone,
    /// Static field pulse
    Zap,
    /// Explosion or kill
    Explosion,
    /// Player hurt
    Hit,
    PickupXp,
    PickupHealth,
    LevelUp,
    /// Ability shockwave
    Shockwave,
    /// Active weapon switched
    Switch,
    BossWarning,
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

/// Tone description for a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub wave: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f32,
    pub gain: f32,
}

impl SoundCue {
    pub fn tone(&self) -> Tone {
        let (wave, start_hz, end_hz, duration, gain) = match self {
            SoundCue::Shoot => (Waveform::Square, 880.0, 440.0, 0.06, 0.15),
            SoundCue::Laser => (Waveform::Sawtooth, 1400.0, 600.0, 0.12, 0.15),
            SoundCue::Rocket => (Waveform::Sawtooth, 180.0, 60.0, 0.25, 0.3),
            SoundCue::Swing => (Waveform::Noise, 600.0, 200.0, 0.15, 0.25),
            SoundCue::OrbSpawn => (Waveform::Sine, 500.0, 900.0, 0.2, 0.2),
            SoundCue::Throw => (Waveform::Triangle, 300.0, 700.0, 0.18, 0.2),
            SoundCue::MineDrop => (Waveform::Sine, 120.0, 80.0, 0.15, 0.3),
            SoundCue::Drone => (Waveform::Square, 1200.0, 900.0, 0.04, 0.08),
            SoundCue::Zap => (Waveform::Sawtooth, 2000.0, 300.0, 0.1, 0.12),
            SoundCue::Explosion => (Waveform::Noise, 200.0, 40.0, 0.35, 0.4),
            SoundCue::Hit => (Waveform::Square, 220.0, 90.0, 0.15, 0.35),
            SoundCue::PickupXp => (Waveform::Sine, 1000.0, 1600.0, 0.08, 0.12),
            SoundCue::PickupHealth => (Waveform::Triangle, 500.0, 1000.0, 0.25, 0.25),
            SoundCue::LevelUp => (Waveform::Triangle, 440.0, 1320.0, 0.5, 0.35),
            SoundCue::Shockwave => (Waveform::Sine, 160.0, 30.0, 0.6, 0.5),
            SoundCue::Switch => (Waveform::Square, 660.0, 990.0, 0.08, 0.15),
            SoundCue::BossWarning => (Waveform::Sawtooth, 110.0, 55.0, 1.5, 0.45),
            SoundCue::GameOver => (Waveform::Triangle, 392.0, 98.0, 1.2, 0.4),
        };
        Tone {
            wave,
            start_hz,
            end_hz,
            duration,
            gain,
        }
    }
}

/// A cue ready to be rendered: tone with pitch and volume applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub cue: SoundCue,
    pub tone: Tone,
    pub volume: f32,
}

/// Host-side volume state
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(0.8, 1.0)
    }
}

impl AudioMixer {
    pub fn new(master_volume: f32, sfx_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Resolve a cue into a voice; `None` when silent
    pub fn voice(&self, cue: SoundCue, pitch: f32) -> Option<Voice> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        let mut tone = cue.tone();
        let pitch = if pitch > 0.0 { pitch } else { 1.0 };
        tone.start_hz *= pitch;
        tone.end_hz *= pitch;
        Some(Voice {
            cue,
            tone,
            volume: tone.gain * vol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_is_silent() {
        let mut mixer = AudioMixer::default();
        assert!(mixer.voice(SoundCue::Shoot, 1.0).is_some());
        mixer.set_muted(true);
        assert!(mixer.voice(SoundCue::Shoot, 1.0).is_none());
    }

    #[test]
    fn test_pitch_scales_frequency() {
        let mixer = AudioMixer::new(1.0, 1.0);
        let voice = mixer.voice(SoundCue::Shoot, 1.2).unwrap();
        assert!((voice.tone.start_hz - 880.0 * 1.2).abs() < 1e-3);
        assert!((voice.volume - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_volume_clamped() {
        let mut mixer = AudioMixer::new(2.0, -1.0);
        assert_eq!(mixer.effective_volume(), 0.0);
        mixer.set_sfx_volume(0.5);
        assert!((mixer.effective_volume() - 0.5).abs() < 1e-6);
    }
}
