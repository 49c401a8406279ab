//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Clamped frame step only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering, audio or platform dependencies

pub mod ability;
pub mod ai;
pub mod collision;
pub mod enemies;
pub mod fire;
pub mod progression;
pub mod projectiles;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod stats;
pub mod tick;
pub mod upgrades;
pub mod weapons;

pub use ability::trigger_ability;
pub use collision::{CollisionResult, circle_rect_collision};
pub use enemies::{EnemyKind, Stage, StageTheme};
pub use progression::{apply_upgrade, switch_active_weapon};
pub use rng::SimRng;
pub use state::{
    Enemy, GameEvent, Loot, LootKind, Obstacle, Player, Projectile, ProjectileBehavior, RunConfig,
    RunPhase, TickInput, WorldState,
};
pub use tick::tick;
pub use upgrades::{Rarity, UpgradeKind};
pub use weapons::{Archetype, WeaponId};
