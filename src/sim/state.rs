//! World state and core simulation types
//!
//! Everything a run mutates lives in one owned `WorldState`; starting a run is a plain
//! reassignment of that struct.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemies::{self, EnemyKind, Stage};
use super::rng::SimRng;
use super::upgrades::{UpgradeCounts, UpgradeKind};
use super::weapons::WeaponId;
use super::{spawner, stats};
use crate::audio::SoundCue;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Playing,
    /// Paused by the host
    Paused,
    /// Waiting for the host to apply an upgrade choice
    LevelUp,
    /// Player died; nothing advances until a new run starts
    GameOver,
}

/// Parameters a run is started with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub starting_weapon: WeaponId,
    /// Visible play area (camera viewport) in world pixels
    pub view_size: Vec2,
    /// Touch input forces auto-aim on every weapon
    pub force_auto_aim: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_weapon: WeaponId::Standard,
            view_size: Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT),
            force_auto_aim: false,
        }
    }
}

/// Input sampled at tick time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement intent; clamped to unit length by the tick
    pub movement: Vec2,
    /// World-space pointer position
    pub aim_target: Vec2,
    /// Trigger held (ranged and boomerang weapons need it)
    pub fire_held: bool,
}

/// Notifications produced by a tick, drained by the host facade
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound { cue: SoundCue, pitch: f32 },
    LevelAvailable { level: u32 },
    PlayerDied,
    PlayerDamaged { amount: f32, absorbed: f32 },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    BossWarning { kind: EnemyKind, count: u32 },
    BossSpawned { kind: EnemyKind },
    BossDefeated { kind: EnemyKind },
    StageChanged { index: usize, name: &'static str },
    ObstacleDestroyed { id: u32 },
    UpgradeApplied { kind: UpgradeKind },
    WeaponGranted { weapon: WeaponId },
    SupplyDrop,
}

/// Evolved weapon forms (active only while the matching weapon is equipped)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionFlags {
    pub shotgun: bool,
    pub overload: bool,
    pub sniper: bool,
    pub homing: bool,
    pub incendiary: bool,
    pub giant_saber: bool,
    pub nova_orbs: bool,
    pub quantum_storm: bool,
    pub gravity_well: bool,
    pub thunder_god: bool,
}

/// Passive skill state (static field and combat drones)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveSkills {
    pub static_field_range: f32,
    pub static_field_damage: f32,
    pub static_field_interval: f32,
    pub static_field_timer: f32,
    pub drone_count: u32,
    pub drone_interval: f32,
    pub drone_damage: f32,
    pub drone_timer: f32,
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing/aim angle (radians)
    pub angle: f32,
    /// Movement speed (pixels/s)
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub shield_regen_delay: f32,
    pub shield_regen_timer: f32,
    pub magnet_radius: f32,
    pub thorns: f32,
    /// Hp healed once per second
    pub hp_regen: f32,
    pub regen_timer: f32,

    /// Owned weapons in pickup order (never empty)
    pub inventory: Vec<WeaponId>,
    pub active_weapon: usize,
    /// Starting weapon; decides chassis max hp and speed
    pub chassis: WeaponId,

    // Derived from the active weapon and upgrades (see stats::recalculate)
    pub damage_mult: f32,
    pub fire_rate_mult: f32,
    pub bullet_speed_mult: f32,
    pub projectile_count: u32,
    pub area_mult: f32,
    pub duration_mult: f32,
    pub piercing: i32,
    pub blast_radius: f32,
    pub auto_aim: bool,
    /// Seconds of freeze applied per hit
    pub freeze_duration: f32,
    /// Per-shot chance of chain lightning
    pub chain_chance: f32,
    pub evolutions: EvolutionFlags,
    pub passives: PassiveSkills,

    pub ability_cooldown: f32,
    pub ability_timer: f32,
    pub ability_range: f32,

    pub fire_timer: f32,
    pub invuln_timer: f32,

    pub xp: f32,
    pub max_xp: f32,
    pub level: u32,
    pub upgrades: UpgradeCounts,
    /// Weapon-slot picks taken after every weapon was owned
    pub surplus_damage_stacks: u32,
}

impl Player {
    /// Fresh player at `pos` with `weapon` as the only owned weapon.
    ///
    /// Derived stats are left at neutral values; `stats::recalculate` fills them.
    pub fn new(weapon: WeaponId, pos: Vec2) -> Self {
        let base = weapon.base();
        Self {
            pos,
            radius: PLAYER_RADIUS,
            angle: 0.0,
            speed: PLAYER_BASE_SPEED,
            hp: base.max_hp,
            max_hp: base.max_hp,
            shield: 0.0,
            max_shield: 0.0,
            shield_regen_delay: SHIELD_REGEN_DELAY,
            shield_regen_timer: 0.0,
            magnet_radius: PLAYER_BASE_MAGNET_RADIUS,
            thorns: 0.0,
            hp_regen: 0.0,
            regen_timer: 0.0,
            inventory: vec![weapon],
            active_weapon: 0,
            chassis: weapon,
            damage_mult: 1.0,
            fire_rate_mult: 1.0,
            bullet_speed_mult: 1.0,
            projectile_count: 1,
            area_mult: 1.0,
            duration_mult: 1.0,
            piercing: 0,
            blast_radius: 0.0,
            auto_aim: false,
            freeze_duration: 0.0,
            chain_chance: 0.0,
            evolutions: EvolutionFlags::default(),
            passives: PassiveSkills::default(),
            ability_cooldown: ABILITY_BASE_COOLDOWN,
            ability_timer: 0.0,
            ability_range: ABILITY_BASE_RANGE,
            fire_timer: 0.0,
            invuln_timer: 0.0,
            xp: 0.0,
            max_xp: max_xp_for_level(1),
            level: 1,
            upgrades: UpgradeCounts::default(),
            surplus_damage_stacks: 0,
        }
    }

    /// Currently equipped weapon
    pub fn weapon(&self) -> WeaponId {
        self.inventory
            .get(self.active_weapon)
            .copied()
            .unwrap_or(self.chassis)
    }

    /// Progress toward the next level in [0, 1]
    pub fn xp_fraction(&self) -> f32 {
        if self.max_xp <= 0.0 {
            return 0.0;
        }
        (self.xp / self.max_xp).clamp(0.0, 1.0)
    }

    /// Ability readiness in [0, 1] (1 = ready)
    pub fn ability_readiness(&self) -> f32 {
        if self.ability_cooldown <= 0.0 {
            return 1.0;
        }
        1.0 - (self.ability_timer / self.ability_cooldown).clamp(0.0, 1.0)
    }
}

/// Experience needed to clear `level`
pub fn max_xp_for_level(level: u32) -> f32 {
    (XP_BASE * (level.max(1) as f32).powf(XP_GROWTH_EXPONENT)).floor()
}

/// Boss phase for the Goliath charge cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMode {
    Idle,
    Charge,
}

/// Per-type action state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBrain {
    /// Plain seek
    Seek,
    Charger {
        rushing: bool,
        timer: f32,
    },
    Sniper {
        attack_timer: f32,
    },
    Boss {
        mode: BossMode,
        /// Remaining time in the current Goliath charge
        action_timer: f32,
        /// Countdown to the next special attack (idle end, summon, ring)
        special_timer: f32,
        charge_dir: Vec2,
        enraged: bool,
    },
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub hp: f32,
    pub max_hp: f32,
    /// Contact damage (projectile damage for snipers)
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub score_value: u32,
    /// Decaying knockback velocity
    pub pushback: Vec2,
    pub frozen_timer: f32,
    pub burn_timer: f32,
    pub burn_damage: f32,
    pub brain: EnemyBrain,
    /// Seconds alive
    pub age: f32,
}

impl Enemy {
    /// Build an enemy of `kind` with explicit hp/damage/speed
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, hp: f32, damage: f32, speed: f32) -> Self {
        let cfg = kind.config();
        let brain = match kind {
            EnemyKind::Charger => EnemyBrain::Charger {
                rushing: false,
                timer: enemies::CHARGER_WINDUP,
            },
            EnemyKind::Sniper => EnemyBrain::Sniper {
                attack_timer: enemies::SNIPER_FIRE_INTERVAL,
            },
            k if k.is_boss() => EnemyBrain::Boss {
                mode: BossMode::Idle,
                action_timer: 0.0,
                special_timer: enemies::special_interval(k, false),
                charge_dir: Vec2::ZERO,
                enraged: false,
            },
            _ => EnemyBrain::Seek,
        };
        Self {
            id,
            kind,
            pos,
            radius: cfg.radius,
            color: cfg.color,
            hp,
            max_hp: hp,
            damage,
            speed,
            xp_value: cfg.xp_value,
            score_value: cfg.score,
            pushback: Vec2::ZERO,
            frozen_timer: 0.0,
            burn_timer: 0.0,
            burn_damage: 0.0,
            brain,
            age: 0.0,
        }
    }

    /// Level-1 enemy of `kind` straight from the table
    pub fn from_table(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let cfg = kind.config();
        Self::new(id, kind, pos, cfg.base_hp, cfg.base_damage, cfg.base_speed)
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn is_enraged(&self) -> bool {
        matches!(self.brain, EnemyBrain::Boss { enraged: true, .. })
    }

    /// Apply damage, keeping hp within [0, max_hp]
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).clamp(0.0, self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Obstacle cosmetic type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Ruin,
}

/// Axis-aligned rectangle; `pos` is the top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Closest point of the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }
}

/// Mode-specific projectile data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileBehavior {
    /// Straight flight; `ttl` limits range when set
    Standard { ttl: Option<f32> },
    /// Arc hit-volume that follows the player
    MeleeArc {
        swing_angle: f32,
        arc_width: f32,
        reach: f32,
        /// Seconds left in the swing
        duration: f32,
    },
    /// Persistent orb circling the player
    Orbit {
        angle: f32,
        radius: f32,
        /// Counts down to clearing `hit_ids`
        rehit_timer: f32,
        /// Nova splash countdown
        splash_timer: f32,
    },
    /// Outbound then homing back to the player
    Boomerang { return_speed: f32, returning: bool },
    /// Stationary timed hazard
    Mine { duration: f32 },
    /// Drone bullet
    DroneShot,
}

/// Player-origin projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Additional enemies this projectile may hit; destroyed when it goes negative
    pub pierce: i32,
    /// 0 = not explosive
    pub explode_radius: f32,
    pub freeze: f32,
    pub chain: bool,
    pub homing: bool,
    pub incendiary: bool,
    pub hit_ids: Vec<u32>,
    pub color: u32,
    pub behavior: ProjectileBehavior,
}

impl Projectile {
    /// Straight projectile with no payload
    pub fn new(id: u32, pos: Vec2, vel: Vec2, damage: f32, behavior: ProjectileBehavior) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BULLET_RADIUS,
            damage,
            pierce: 0,
            explode_radius: 0.0,
            freeze: 0.0,
            chain: false,
            homing: false,
            incendiary: false,
            hit_ids: Vec::new(),
            color: 0xfef08a,
            behavior,
        }
    }

    /// Persistent kinds are never culled by leaving the world
    pub fn is_persistent(&self) -> bool {
        matches!(
            self.behavior,
            ProjectileBehavior::MeleeArc { .. }
                | ProjectileBehavior::Orbit { .. }
                | ProjectileBehavior::Boomerang { .. }
                | ProjectileBehavior::Mine { .. }
        )
    }

    /// Kinds that gate repeat hits by id/probability instead of spending pierce
    pub fn uses_hit_gate(&self) -> bool {
        matches!(
            self.behavior,
            ProjectileBehavior::MeleeArc { .. }
                | ProjectileBehavior::Orbit { .. }
                | ProjectileBehavior::Boomerang { .. }
        )
    }
}

/// Enemy-origin projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootKind {
    XpOrb,
    HealthPack,
}

/// A pickup on the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub id: u32,
    pub pos: Vec2,
    pub kind: LootKind,
    pub radius: f32,
    pub value: f32,
    /// Seconds left before it disappears
    pub life: f32,
    /// Cosmetic bobbing phase
    pub float_offset: f32,
}

/// XP orb value, health pack heal and loot lifetime
pub const XP_ORB_VALUE: f32 = 25.0;
pub const HEALTH_PACK_VALUE: f32 = 50.0;
pub const LOOT_LIFETIME: f32 = 30.0;
pub const LOOT_RADIUS: f32 = 8.0;
/// Speed loot is pulled toward the player inside the magnet radius (pixels/s)
pub const LOOT_MAGNET_SPEED: f32 = 480.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    /// Expanding ring (ability shockwave)
    Ring,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

/// Damage numbers and callouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 400;
/// Maximum floating texts
pub const MAX_FLOATING_TEXTS: usize = 60;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct WorldState {
    pub config: RunConfig,
    pub rng: SimRng,
    pub phase: RunPhase,
    /// Simulated seconds since run start
    pub time: f32,
    pub score: u64,
    pub kills: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub loot: Vec<Loot>,
    pub particles: Vec<Particle>,
    pub floating_texts: Vec<FloatingText>,
    /// Top-left of the visible area
    pub camera: Vec2,
    pub view_size: Vec2,
    pub screen_shake: f32,
    /// Seconds until the next ordinary spawn
    pub spawn_timer: f32,
    /// Run time at which the next boss wave is announced
    pub next_boss_time: f32,
    pub boss_waves: u32,
    /// Countdown from boss warning to spawn
    pub boss_warning: Option<f32>,
    pub supply_timer: f32,
    pub stage_index: usize,
    /// Level-ups waiting for an upgrade choice
    pub pending_level_ups: u32,
    /// Choices offered for the current level-up
    pub offered_upgrades: Vec<UpgradeKind>,
    /// Enemies created mid-tick (splitter children, boss adds), merged at the end of the tick
    pub pending_spawns: Vec<Enemy>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl WorldState {
    /// Start a new run
    pub fn new(config: RunConfig) -> Self {
        let mut rng = SimRng::new(config.seed);
        let center = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) * 0.5;
        let mut next_id = 1;
        let obstacles = spawner::generate_obstacles(&mut rng, center, &mut next_id);

        let mut player = Player::new(config.starting_weapon, center);
        stats::recalculate(&mut player);
        player.hp = player.max_hp;

        let mut state = Self {
            config,
            rng,
            phase: RunPhase::Playing,
            time: 0.0,
            score: 0,
            kills: 0,
            player,
            enemies: Vec::new(),
            obstacles,
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            loot: Vec::new(),
            particles: Vec::new(),
            floating_texts: Vec::new(),
            camera: Vec2::ZERO,
            view_size: config.view_size.max(Vec2::ONE),
            screen_shake: 0.0,
            spawn_timer: 0.0,
            next_boss_time: enemies::BOSS_FIRST_WAVE,
            boss_waves: 0,
            boss_warning: None,
            supply_timer: 0.0,
            stage_index: 0,
            pending_level_ups: 0,
            offered_upgrades: Vec::new(),
            pending_spawns: Vec::new(),
            events: Vec::new(),
            next_id,
        };
        state.update_camera();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn stage(&self) -> &'static Stage {
        &enemies::STAGES[self.stage_index.min(enemies::STAGES.len() - 1)]
    }

    /// 1 + elapsed minutes
    pub fn difficulty(&self) -> f32 {
        1.0 + self.time / 60.0
    }

    /// Center the camera on the player, kept inside the world
    pub fn update_camera(&mut self) {
        let max = (Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) - self.view_size).max(Vec2::ZERO);
        self.camera = (self.player.pos - self.view_size * 0.5).clamp(Vec2::ZERO, max);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, cue: SoundCue, pitch: f32) {
        self.events.push(GameEvent::Sound { cue, pitch });
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    /// Burst of sparks at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = self.rng.angle();
            let speed = self.rng.range(60.0, 300.0);
            let life = self.rng.range(0.3, 0.7);
            let size = self.rng.range(1.5, 4.0);
            self.particles.push(Particle {
                pos,
                vel: crate::from_angle(angle) * speed,
                color,
                life,
                max_life: life,
                size,
                kind: ParticleKind::Spark,
            });
        }
    }

    /// Expanding ring effect reaching `radius`
    pub fn spawn_ring(&mut self, pos: Vec2, color: u32, radius: f32) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(Particle {
            pos,
            vel: Vec2::ZERO,
            color,
            life: 0.5,
            max_life: 0.5,
            size: radius,
            kind: ParticleKind::Ring,
        });
    }

    pub fn spawn_text(&mut self, pos: Vec2, text: impl Into<String>, color: u32, size: f32) {
        if self.floating_texts.len() >= MAX_FLOATING_TEXTS {
            self.floating_texts.remove(0);
        }
        self.floating_texts.push(FloatingText {
            pos,
            text: text.into(),
            color,
            life: 1.0,
            size,
        });
    }

    /// Drop a loot item at `pos`
    pub fn spawn_loot(&mut self, pos: Vec2, kind: LootKind) {
        let id = self.next_entity_id();
        let float_offset = self.rng.angle();
        let value = match kind {
            LootKind::XpOrb => XP_ORB_VALUE,
            LootKind::HealthPack => HEALTH_PACK_VALUE,
        };
        self.loot.push(Loot {
            id,
            pos,
            kind,
            radius: LOOT_RADIUS,
            value,
            life: LOOT_LIFETIME,
            float_offset,
        });
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_clean() {
        let state = WorldState::new(RunConfig::default());
        assert_eq!(state.phase, RunPhase::Playing);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.player.inventory, vec![WeaponId::Standard]);
        assert!(state.enemies.is_empty());
        assert_eq!(state.obstacles.len(), OBSTACLE_COUNT);
        assert_eq!(state.player.max_xp, 50.0);
    }

    #[test]
    fn test_chassis_hp_comes_from_weapon() {
        let config = RunConfig {
            starting_weapon: WeaponId::RocketHeavy,
            ..RunConfig::default()
        };
        let state = WorldState::new(config);
        assert_eq!(state.player.max_hp, 250.0);
    }

    #[test]
    fn test_xp_fraction_guards_zero() {
        let mut player = Player::new(WeaponId::Standard, Vec2::ZERO);
        player.max_xp = 0.0;
        player.xp = 10.0;
        assert_eq!(player.xp_fraction(), 0.0);
    }

    #[test]
    fn test_max_xp_curve() {
        assert_eq!(max_xp_for_level(1), 50.0);
        assert_eq!(max_xp_for_level(2), (50.0 * 2f32.powf(1.15)).floor());
    }

    #[test]
    fn test_enemy_damage_clamps() {
        let mut enemy = Enemy::from_table(1, EnemyKind::Basic, Vec2::ZERO);
        enemy.take_damage(1000.0);
        assert_eq!(enemy.hp, 0.0);
        assert!(enemy.is_dead());
        enemy.take_damage(-5.0);
        assert_eq!(enemy.hp, 0.0);
    }

    #[test]
    fn test_camera_stays_in_world() {
        let mut state = WorldState::new(RunConfig::default());
        state.player.pos = Vec2::ZERO;
        state.update_camera();
        assert_eq!(state.camera, Vec2::ZERO);
        state.player.pos = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        state.update_camera();
        assert_eq!(
            state.camera,
            Vec2::new(WORLD_WIDTH - DEFAULT_VIEW_WIDTH, WORLD_HEIGHT - DEFAULT_VIEW_HEIGHT)
        );
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = WorldState::new(RunConfig { seed: 99, ..RunConfig::default() });
        let b = WorldState::new(RunConfig { seed: 99, ..RunConfig::default() });
        assert_eq!(a.obstacles, b.obstacles);
    }
}
