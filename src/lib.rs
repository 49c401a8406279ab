//! Neon Survivor - top-down survival arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, stats, weapons, AI, spawning, tick)
//! - `game`: Host-facing facade that drives a run and dispatches events
//! - `host`: Collaborator trait (render, audio, UI sync, persistence)
//! - `audio`: Sound cue identifiers and volume mixing
//! - `highscores`: Leaderboard
//! - `settings`: Host preferences

pub mod audio;
pub mod game;
pub mod highscores;
pub mod host;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{HighScores, ScoreEntry};
pub use host::{Host, UiSummary, UiSyncThrottle};
pub use settings::{InputMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame step the simulation accepts (ms); longer frames are clamped
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 2500.0;
    pub const WORLD_HEIGHT: f32 = 2500.0;
    /// Default visible play area (camera viewport)
    pub const DEFAULT_VIEW_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Movement speed in pixels/s
    pub const PLAYER_BASE_SPEED: f32 = 300.0;
    pub const PLAYER_BASE_MAX_HP: f32 = 150.0;
    pub const PLAYER_BASE_MAGNET_RADIUS: f32 = 80.0;
    pub const SHIELD_REGEN_DELAY: f32 = 3.0;
    /// Fraction of max shield restored per second once regen starts
    pub const SHIELD_REGEN_RATE: f32 = 0.2;
    /// Post-hit invulnerability window (seconds)
    pub const INVULN_DURATION: f32 = 0.5;
    /// Maximum owned weapons
    pub const MAX_WEAPONS: usize = 4;

    /// Projectile defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    /// Bullet speed in pixels/s
    pub const BASE_BULLET_SPEED: f32 = 720.0;
    pub const BASE_DAMAGE: f32 = 25.0;
    /// Ranged fire interval before multipliers (seconds)
    pub const BASE_FIRE_INTERVAL: f32 = 0.15;
    /// Pierce value treated as unlimited
    pub const INFINITE_PIERCE: i32 = 999;

    /// Ability (shockwave) defaults
    pub const ABILITY_BASE_COOLDOWN: f32 = 10.0;
    pub const ABILITY_BASE_RANGE: f32 = 300.0;
    pub const ABILITY_BASE_DAMAGE: f32 = 50.0;

    /// Experience curve: max_xp = XP_BASE * level^XP_GROWTH_EXPONENT
    pub const XP_BASE: f32 = 50.0;
    pub const XP_GROWTH_EXPONENT: f32 = 1.15;

    /// Obstacles generated per run
    pub const OBSTACLE_COUNT: usize = 8;
    /// Radius around the player start kept clear of obstacles
    pub const SAFE_ZONE_RADIUS: f32 = 300.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `theta`
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of a vector (atan2)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Smallest signed difference `b - a` between two angles
#[inline]
pub fn angle_delta(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}
