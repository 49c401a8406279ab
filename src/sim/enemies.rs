//! Enemy and boss tables, stage (biome) progression, spawn scaling

use serde::{Deserialize, Serialize};

use super::rng::theme_noise;

/// Enemy type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Charger,
    Exploder,
    Sniper,
    Ghost,
    Splitter,
    Elite,
    Goliath,
    Swarmer,
    Titan,
}

/// Base stats for an enemy type (level 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyConfig {
    pub base_hp: f32,
    /// Pixels/s
    pub base_speed: f32,
    pub base_damage: f32,
    pub radius: f32,
    pub color: u32,
    pub xp_value: u32,
    pub score: u32,
    /// Seconds into the run before this type can spawn
    pub min_time: f32,
}

impl EnemyKind {
    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Goliath | EnemyKind::Swarmer | EnemyKind::Titan)
    }

    /// Whether the type passes through obstacles (bosses smash them instead)
    pub fn ignores_obstacles(&self) -> bool {
        *self == EnemyKind::Ghost || self.is_boss()
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "Basic",
            EnemyKind::Fast => "Fast",
            EnemyKind::Tank => "Tank",
            EnemyKind::Charger => "Charger",
            EnemyKind::Exploder => "Exploder",
            EnemyKind::Sniper => "Sniper",
            EnemyKind::Ghost => "Ghost",
            EnemyKind::Splitter => "Splitter",
            EnemyKind::Elite => "Elite",
            EnemyKind::Goliath => "GOLIATH",
            EnemyKind::Swarmer => "SWARMER",
            EnemyKind::Titan => "TITAN",
        }
    }

    pub fn config(&self) -> EnemyConfig {
        let (base_hp, base_speed, base_damage, radius, color, xp_value, score, min_time) =
            match self {
                EnemyKind::Basic => (40.0, 140.0, 5.0, 12.0, 0x4ade80, 15, 10, 0.0),
                EnemyKind::Fast => (20.0, 280.0, 3.0, 8.0, 0xf87171, 25, 20, 60.0),
                EnemyKind::Splitter => (80.0, 120.0, 10.0, 18.0, 0x84cc16, 40, 35, 120.0),
                EnemyKind::Charger => (60.0, 350.0, 8.0, 10.0, 0xf97316, 35, 25, 120.0),
                EnemyKind::Tank => (200.0, 60.0, 10.0, 28.0, 0x60a5fa, 80, 50, 180.0),
                EnemyKind::Sniper => (80.0, 100.0, 15.0, 14.0, 0xe879f9, 60, 40, 200.0),
                EnemyKind::Ghost => (60.0, 70.0, 12.0, 14.0, 0x94a3b8, 50, 40, 300.0),
                EnemyKind::Exploder => (120.0, 180.0, 40.0, 16.0, 0xe11d48, 100, 60, 300.0),
                EnemyKind::Elite => (600.0, 120.0, 20.0, 35.0, 0xc084fc, 500, 150, 300.0),
                EnemyKind::Goliath => (8000.0, 180.0, 50.0, 70.0, 0xfbbf24, 5000, 2000, 0.0),
                EnemyKind::Swarmer => (15000.0, 250.0, 40.0, 60.0, 0xf0abfc, 10000, 5000, 0.0),
                EnemyKind::Titan => (50000.0, 120.0, 100.0, 100.0, 0xef4444, 25000, 10000, 0.0),
            };
        EnemyConfig {
            base_hp,
            base_speed,
            base_damage,
            radius,
            color,
            xp_value,
            score,
            min_time,
        }
    }
}

/// Ordinary spawn roll: checked in order, rarer types first.
/// Each entry is (kind, band cap, seconds to reach the cap); a ramp of 0 means a flat band.
pub const SPAWN_BANDS: [(EnemyKind, f32, f32); 8] = [
    (EnemyKind::Elite, 0.05, 600.0),
    (EnemyKind::Exploder, 0.08, 300.0),
    (EnemyKind::Ghost, 0.08, 300.0),
    (EnemyKind::Sniper, 0.08, 240.0),
    (EnemyKind::Tank, 0.12, 180.0),
    (EnemyKind::Charger, 0.12, 180.0),
    (EnemyKind::Splitter, 0.10, 180.0),
    (EnemyKind::Fast, 0.30, 0.0),
];

/// Pick an ordinary enemy type for a uniform roll in [0, 1) at `elapsed` seconds.
///
/// Bands accumulate in priority order; a type whose `min_time` has not been reached
/// contributes nothing, so the roll falls through to the next type and finally to Basic.
pub fn pick_enemy_kind(roll: f32, elapsed: f32) -> EnemyKind {
    let mut cumulative = 0.0;
    for (kind, cap, ramp) in SPAWN_BANDS {
        if elapsed < kind.config().min_time {
            continue;
        }
        let band = if ramp > 0.0 {
            cap * ((elapsed - kind.config().min_time) / ramp).clamp(0.0, 1.0)
        } else {
            cap
        };
        cumulative += band;
        if roll < cumulative {
            return kind;
        }
    }
    EnemyKind::Basic
}

/// Stats of an ordinary enemy after time scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledStats {
    pub hp: f32,
    pub speed: f32,
    pub damage: f32,
    pub xp_value: u32,
}

/// Scale an ordinary enemy by elapsed time (level = 1 + t/60)
pub fn scale_enemy(kind: EnemyKind, elapsed: f32) -> ScaledStats {
    let cfg = kind.config();
    let level = 1.0 + elapsed.max(0.0) / 60.0;
    ScaledStats {
        hp: cfg.base_hp * level * 1.1,
        speed: cfg.base_speed * (1.0 + (level - 1.0) * 0.05).min(2.0),
        damage: cfg.base_damage * (1.0 + (level - 1.0) * 0.25),
        xp_value: (cfg.xp_value as f32 * level).ceil() as u32,
    }
}

/// Boss hp/damage scaled by elapsed time and total kills
pub fn scale_boss(kind: EnemyKind, elapsed: f32, kills: u32) -> (f32, f32) {
    let cfg = kind.config();
    let hp = cfg.base_hp * (1.0 + elapsed / 120.0) * (1.0 + kills as f32 / 1000.0);
    let damage = cfg.base_damage * (1.0 + elapsed / 300.0);
    (hp, damage)
}

/// First boss wave time and interval between waves (seconds)
pub const BOSS_FIRST_WAVE: f32 = 180.0;
pub const BOSS_WAVE_INTERVAL: f32 = 180.0;
/// Radius of the ring bosses spawn on, around the player
pub const BOSS_RING_RADIUS: f32 = 500.0;
/// Seconds between the boss warning and the bosses appearing
pub const BOSS_WARNING_LEAD: f32 = 3.0;

/// Bosses per wave: one more every second wave, capped at three
pub fn boss_wave_size(waves_spawned: u32) -> u32 {
    (1 + waves_spawned / 2).min(3)
}

/// Boss health fraction at or below which a boss enrages
pub const ENRAGE_THRESHOLD: f32 = 0.5;

/// Goliath
pub const GOLIATH_IDLE: f32 = 3.0;
pub const GOLIATH_IDLE_ENRAGED: f32 = 1.8;
pub const GOLIATH_CHARGE_DURATION: f32 = 0.8;
pub const GOLIATH_CHARGE_SPEED_MULT: f32 = 3.0;
/// Swarmer
pub const SWARMER_SUMMON: f32 = 6.0;
pub const SWARMER_SUMMON_ENRAGED: f32 = 3.5;
pub const SWARMER_ADDS: u32 = 4;
pub const SWARMER_KEEP_DISTANCE: f32 = 300.0;
/// Titan
pub const TITAN_RING: f32 = 4.0;
pub const TITAN_RING_ENRAGED: f32 = 2.0;
pub const TITAN_RING_COUNT: u32 = 16;
pub const TITAN_RING_COUNT_ENRAGED: u32 = 24;
pub const TITAN_BULLET_SPEED: f32 = 250.0;

/// Special-attack interval of a boss (Goliath idle, Swarmer summon, Titan ring)
pub fn special_interval(kind: EnemyKind, enraged: bool) -> f32 {
    match (kind, enraged) {
        (EnemyKind::Goliath, false) => GOLIATH_IDLE,
        (EnemyKind::Goliath, true) => GOLIATH_IDLE_ENRAGED,
        (EnemyKind::Swarmer, false) => SWARMER_SUMMON,
        (EnemyKind::Swarmer, true) => SWARMER_SUMMON_ENRAGED,
        (EnemyKind::Titan, false) => TITAN_RING,
        (EnemyKind::Titan, true) => TITAN_RING_ENRAGED,
        _ => 0.0,
    }
}

/// Charger duty cycle
pub const CHARGER_WINDUP: f32 = 1.2;
pub const CHARGER_RUSH: f32 = 0.6;
pub const CHARGER_WINDUP_SPEED: f32 = 0.25;

/// Sniper behaviour
pub const SNIPER_RANGE: f32 = 450.0;
pub const SNIPER_FIRE_INTERVAL: f32 = 2.5;
pub const SNIPER_BULLET_SPEED: f32 = 400.0;

/// Exploder contact multiplier
pub const EXPLODER_DAMAGE_MULT: f32 = 1.5;

/// Non-boss enemies older than this (seconds) and out of sight are culled
pub const ENEMY_MAX_AGE: f32 = 120.0;
/// Non-boss enemies further than this outside the world are culled
pub const ENEMY_BOUNDS_MARGIN: f32 = 500.0;

/// Movement speed multiplier while frozen
pub const FROZEN_SPEED_MULT: f32 = 0.6;

/// A kill-gated biome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub index: usize,
    pub threshold: u32,
    pub name: &'static str,
    pub hue: f32,
    pub density_mult: f32,
    pub boss: EnemyKind,
}

pub const STAGES: [Stage; 4] = [
    Stage {
        index: 0,
        threshold: 0,
        name: "NEON OUTSKIRTS",
        hue: 200.0,
        density_mult: 1.0,
        boss: EnemyKind::Goliath,
    },
    Stage {
        index: 1,
        threshold: 400,
        name: "RUST SECTOR",
        hue: 25.0,
        density_mult: 1.4,
        boss: EnemyKind::Swarmer,
    },
    Stage {
        index: 2,
        threshold: 1000,
        name: "DEEP CORE",
        hue: 270.0,
        density_mult: 1.8,
        boss: EnemyKind::Titan,
    },
    Stage {
        index: 3,
        threshold: 2000,
        name: "THE VOID",
        hue: 0.0,
        density_mult: 2.5,
        boss: EnemyKind::Titan,
    },
];

/// Highest stage whose threshold is <= kills
pub fn stage_for_kills(kills: u32) -> &'static Stage {
    STAGES
        .iter()
        .rev()
        .find(|s| kills >= s.threshold)
        .unwrap_or(&STAGES[0])
}

/// Background parameters for the renderer, derived from the stage index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageTheme {
    pub hue: f32,
    /// Background pattern index (0..4)
    pub pattern: u32,
    pub density: f32,
    pub speed: f32,
    pub pulse: f32,
}

impl Stage {
    pub fn theme(&self) -> StageTheme {
        let zone = self.index as u32;
        StageTheme {
            hue: self.hue,
            pattern: (theme_noise(zone, 0) * 4.0) as u32,
            density: 0.5 + theme_noise(zone, 1),
            speed: 0.2 + theme_noise(zone, 2) * 0.8,
            pulse: theme_noise(zone, 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_selection_uses_highest_threshold() {
        assert_eq!(stage_for_kills(0).name, "NEON OUTSKIRTS");
        assert_eq!(stage_for_kills(399).name, "NEON OUTSKIRTS");
        assert_eq!(stage_for_kills(400).name, "RUST SECTOR");
        assert_eq!(stage_for_kills(1500).name, "DEEP CORE");
        assert_eq!(stage_for_kills(50_000).name, "THE VOID");
    }

    #[test]
    fn test_only_basic_at_start() {
        for i in 0..20 {
            assert_eq!(pick_enemy_kind(i as f32 / 20.0, 0.0), EnemyKind::Basic);
        }
    }

    #[test]
    fn test_fast_band_after_a_minute() {
        assert_eq!(pick_enemy_kind(0.1, 61.0), EnemyKind::Fast);
        assert_eq!(pick_enemy_kind(0.9, 61.0), EnemyKind::Basic);
    }

    #[test]
    fn test_elite_checked_first_late_game() {
        assert_eq!(pick_enemy_kind(0.01, 1200.0), EnemyKind::Elite);
    }

    #[test]
    fn test_scaling_at_start_is_base() {
        let s = scale_enemy(EnemyKind::Basic, 0.0);
        assert!((s.hp - 44.0).abs() < 1e-4);
        assert_eq!(s.damage, 5.0);
        assert_eq!(s.speed, 140.0);
        assert_eq!(s.xp_value, 15);
    }

    #[test]
    fn test_speed_scaling_capped() {
        let s = scale_enemy(EnemyKind::Basic, 60.0 * 100.0);
        assert!((s.speed - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_boss_wave_size() {
        assert_eq!(boss_wave_size(0), 1);
        assert_eq!(boss_wave_size(2), 2);
        assert_eq!(boss_wave_size(10), 3);
    }

    #[test]
    fn test_enraged_intervals_shorter() {
        for kind in [EnemyKind::Goliath, EnemyKind::Swarmer, EnemyKind::Titan] {
            assert!(special_interval(kind, true) < special_interval(kind, false));
        }
    }

    #[test]
    fn test_theme_is_deterministic() {
        assert_eq!(STAGES[1].theme(), STAGES[1].theme());
        assert!(STAGES[2].theme().pattern < 4);
    }
}
