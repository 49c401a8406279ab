//! Host collaborator interface
//!
//! The simulation never calls out while a tick is running. After each tick the `Game`
//! facade drains the world's events and forwards them to a `Host`, then hands it a
//! read-only view of the finished frame.

use serde::Serialize;

use crate::audio::SoundCue;
use crate::highscores::ScoreEntry;
use crate::sim::state::{GameEvent, WorldState};
use crate::sim::upgrades::UpgradeKind;
use crate::sim::weapons::WeaponId;

/// Default minimum time between UI syncs (seconds)
pub const DEFAULT_UI_SYNC_INTERVAL: f32 = 0.25;

/// Everything outside the simulation: drawing, sound, menus, storage.
///
/// All methods default to no-ops so a host implements only what it needs.
pub trait Host {
    /// Draw the finished frame
    fn render(&mut self, _world: &WorldState) {}

    fn play_sound(&mut self, _cue: SoundCue, _pitch: f32) {}

    /// Pause and present `choices`; resume by applying one of them
    fn on_level_available(&mut self, _level: u32, _choices: &[UpgradeKind]) {}

    /// The run is over; nothing advances until a new run starts
    fn on_player_died(&mut self, _entry: &ScoreEntry) {}

    /// Best-effort leaderboard write
    fn persist_score_entry(&mut self, _entry: &ScoreEntry) {}

    /// Throttled HUD refresh
    fn request_ui_sync(&mut self, _summary: &UiSummary) {}

    /// Every drained event, before the dedicated callbacks above
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Host that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {}

/// Derived player attributes shown on the stats panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSnapshot {
    pub damage_mult: f32,
    pub fire_rate_mult: f32,
    pub bullet_speed_mult: f32,
    pub projectile_count: u32,
    pub area_mult: f32,
    pub duration_mult: f32,
    pub piercing: i32,
    pub blast_radius: f32,
    pub speed: f32,
    pub magnet_radius: f32,
    pub thorns: f32,
    pub hp_regen: f32,
    pub freeze_duration: f32,
    pub chain_chance: f32,
    pub upgrades: Vec<(UpgradeKind, u32)>,
}

/// HUD summary pulled after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSummary {
    pub score: u64,
    pub kills: u32,
    /// Seconds survived
    pub time_alive: f32,
    pub difficulty: f32,
    pub level: u32,
    pub stage_name: &'static str,
    pub hp: f32,
    pub max_hp: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub xp: f32,
    pub max_xp: f32,
    /// Seconds until the ability is ready
    pub ability_cooldown: f32,
    /// 1 = ready
    pub ability_readiness: f32,
    pub weapon: WeaponId,
    pub inventory: Vec<WeaponId>,
    pub attributes: AttributeSnapshot,
}

impl UiSummary {
    pub fn from_world(world: &WorldState) -> Self {
        let p = &world.player;
        Self {
            score: world.score,
            kills: world.kills,
            time_alive: world.time,
            difficulty: world.difficulty(),
            level: p.level,
            stage_name: world.stage().name,
            hp: p.hp,
            max_hp: p.max_hp,
            shield: p.shield,
            max_shield: p.max_shield,
            xp: p.xp,
            max_xp: p.max_xp,
            ability_cooldown: p.ability_timer,
            ability_readiness: p.ability_readiness(),
            weapon: p.weapon(),
            inventory: p.inventory.clone(),
            attributes: AttributeSnapshot {
                damage_mult: p.damage_mult,
                fire_rate_mult: p.fire_rate_mult,
                bullet_speed_mult: p.bullet_speed_mult,
                projectile_count: p.projectile_count,
                area_mult: p.area_mult,
                duration_mult: p.duration_mult,
                piercing: p.piercing,
                blast_radius: p.blast_radius,
                speed: p.speed,
                magnet_radius: p.magnet_radius,
                thorns: p.thorns,
                hp_regen: p.hp_regen,
                freeze_duration: p.freeze_duration,
                chain_chance: p.chain_chance,
                upgrades: p.upgrades.iter().collect(),
            },
        }
    }
}

/// Host-side rate limiter for UI syncs, driven by real frame time
#[derive(Debug, Clone, PartialEq)]
pub struct UiSyncThrottle {
    interval: f32,
    elapsed: f32,
}

impl Default for UiSyncThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_UI_SYNC_INTERVAL)
    }
}

impl UiSyncThrottle {
    pub fn new(interval: f32) -> Self {
        let interval = interval.max(0.0);
        // First call syncs immediately
        Self {
            interval,
            elapsed: interval,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Accumulate `dt` seconds; true when a sync is due
    pub fn ready(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Make the next `ready` call fire
    pub fn force(&mut self) {
        self.elapsed = self.interval;
    }
}
