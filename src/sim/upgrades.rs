//! Upgrade catalog, evolution requirements and level-up choice rolling

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use super::state::Player;
use super::weapons::WeaponId;

/// Closed set of upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    FireRate,
    Speed,
    Health,
    Multishot,
    BulletSpeed,
    Laser,
    Rocket,
    Shield,
    Magnet,
    Thorns,
    Regen,
    Area,
    Duration,
    AbilityCooldown,
    AbilityArea,
    WeaponSlot,
    Freeze,
    ChainLightning,
    StaticField,
    DroneSupport,
    EvoShotgun,
    EvoOverload,
    EvoSniper,
    EvoHoming,
    EvoIncendiary,
    EvoGiantSaber,
    EvoNovaOrbs,
    EvoQuantumStorm,
    EvoGravityWell,
    EvoThunderGod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// What must be true before an evolution is offered or takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The given weapon must be the active weapon
    ActiveWeapon(WeaponId),
    /// At least one stack of the given passive
    Passive(UpgradeKind),
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 31] = [
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
        UpgradeKind::Speed,
        UpgradeKind::Health,
        UpgradeKind::Multishot,
        UpgradeKind::BulletSpeed,
        UpgradeKind::Laser,
        UpgradeKind::Rocket,
        UpgradeKind::Shield,
        UpgradeKind::Magnet,
        UpgradeKind::Thorns,
        UpgradeKind::Regen,
        UpgradeKind::Area,
        UpgradeKind::Duration,
        UpgradeKind::AbilityCooldown,
        UpgradeKind::AbilityArea,
        UpgradeKind::WeaponSlot,
        UpgradeKind::Freeze,
        UpgradeKind::ChainLightning,
        UpgradeKind::StaticField,
        UpgradeKind::DroneSupport,
        UpgradeKind::EvoShotgun,
        UpgradeKind::EvoOverload,
        UpgradeKind::EvoSniper,
        UpgradeKind::EvoHoming,
        UpgradeKind::EvoIncendiary,
        UpgradeKind::EvoGiantSaber,
        UpgradeKind::EvoNovaOrbs,
        UpgradeKind::EvoQuantumStorm,
        UpgradeKind::EvoGravityWell,
        UpgradeKind::EvoThunderGod,
    ];

    /// Stable identifier used by hosts
    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "damage",
            UpgradeKind::FireRate => "fire_rate",
            UpgradeKind::Speed => "speed",
            UpgradeKind::Health => "health",
            UpgradeKind::Multishot => "multishot",
            UpgradeKind::BulletSpeed => "bullet_speed",
            UpgradeKind::Laser => "laser",
            UpgradeKind::Rocket => "rocket",
            UpgradeKind::Shield => "shield",
            UpgradeKind::Magnet => "magnet",
            UpgradeKind::Thorns => "thorns",
            UpgradeKind::Regen => "regen",
            UpgradeKind::Area => "area",
            UpgradeKind::Duration => "duration",
            UpgradeKind::AbilityCooldown => "ability_cooldown",
            UpgradeKind::AbilityArea => "ability_area",
            UpgradeKind::WeaponSlot => "weapon_slot",
            UpgradeKind::Freeze => "freeze",
            UpgradeKind::ChainLightning => "chain_lightning",
            UpgradeKind::StaticField => "static_field",
            UpgradeKind::DroneSupport => "drone_support",
            UpgradeKind::EvoShotgun => "evo_shotgun",
            UpgradeKind::EvoOverload => "evo_overload",
            UpgradeKind::EvoSniper => "evo_sniper",
            UpgradeKind::EvoHoming => "evo_homing",
            UpgradeKind::EvoIncendiary => "evo_incendiary",
            UpgradeKind::EvoGiantSaber => "evo_giant_saber",
            UpgradeKind::EvoNovaOrbs => "evo_nova_orbs",
            UpgradeKind::EvoQuantumStorm => "evo_quantum_storm",
            UpgradeKind::EvoGravityWell => "evo_gravity_well",
            UpgradeKind::EvoThunderGod => "evo_thunder_god",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "High-Energy Rounds",
            UpgradeKind::FireRate => "Overclock Module",
            UpgradeKind::Speed => "Thruster Tuning",
            UpgradeKind::Health => "Nano Armor",
            UpgradeKind::Multishot => "Split Shot",
            UpgradeKind::BulletSpeed => "Rail Accelerator",
            UpgradeKind::Laser => "Prism Lens",
            UpgradeKind::Rocket => "Micro Warheads",
            UpgradeKind::Shield => "Shield Generator",
            UpgradeKind::Magnet => "Gravity Lens",
            UpgradeKind::Thorns => "Reactive Armor",
            UpgradeKind::Regen => "Bio Repair",
            UpgradeKind::Area => "Wide Lens",
            UpgradeKind::Duration => "Stabilizer",
            UpgradeKind::AbilityCooldown => "Tactical Cooling",
            UpgradeKind::AbilityArea => "Shock Expander",
            UpgradeKind::WeaponSlot => "Weapon Drop",
            UpgradeKind::Freeze => "Cryo Rounds",
            UpgradeKind::ChainLightning => "Chain Lightning",
            UpgradeKind::StaticField => "Static Field",
            UpgradeKind::DroneSupport => "Combat Drone",
            UpgradeKind::EvoShotgun => "EVO: Riot Breaker",
            UpgradeKind::EvoOverload => "EVO: Overload Cannon",
            UpgradeKind::EvoSniper => "EVO: Gauss Sniper",
            UpgradeKind::EvoHoming => "EVO: Sidewinder",
            UpgradeKind::EvoIncendiary => "EVO: Hellfire",
            UpgradeKind::EvoGiantSaber => "EVO: Titan Slash",
            UpgradeKind::EvoNovaOrbs => "EVO: Supernova",
            UpgradeKind::EvoQuantumStorm => "EVO: Quantum Storm",
            UpgradeKind::EvoGravityWell => "EVO: Singularity",
            UpgradeKind::EvoThunderGod => "EVO: Thunder God",
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            UpgradeKind::Damage
            | UpgradeKind::FireRate
            | UpgradeKind::Speed
            | UpgradeKind::Area
            | UpgradeKind::Magnet
            | UpgradeKind::BulletSpeed
            | UpgradeKind::Duration => Rarity::Common,
            UpgradeKind::Health
            | UpgradeKind::Shield
            | UpgradeKind::AbilityCooldown
            | UpgradeKind::AbilityArea
            | UpgradeKind::Freeze => Rarity::Rare,
            UpgradeKind::Thorns
            | UpgradeKind::Regen
            | UpgradeKind::Laser
            | UpgradeKind::ChainLightning
            | UpgradeKind::StaticField => Rarity::Epic,
            _ => Rarity::Legendary,
        }
    }

    /// Evolution requirement; `None` for ordinary upgrades
    pub fn requirement(&self) -> Option<Requirement> {
        use Requirement::*;
        match self {
            UpgradeKind::EvoShotgun | UpgradeKind::EvoOverload | UpgradeKind::EvoSniper => {
                Some(ActiveWeapon(WeaponId::Standard))
            }
            UpgradeKind::EvoHoming | UpgradeKind::EvoIncendiary => {
                Some(ActiveWeapon(WeaponId::RocketHeavy))
            }
            UpgradeKind::EvoGiantSaber => Some(ActiveWeapon(WeaponId::PlasmaSaber)),
            UpgradeKind::EvoNovaOrbs => Some(ActiveWeapon(WeaponId::PsiOrbs)),
            UpgradeKind::EvoQuantumStorm => Some(ActiveWeapon(WeaponId::QuantumBlade)),
            UpgradeKind::EvoGravityWell => Some(ActiveWeapon(WeaponId::VoidTrap)),
            UpgradeKind::EvoThunderGod => Some(Passive(UpgradeKind::StaticField)),
            _ => None,
        }
    }

    pub fn is_evolution(&self) -> bool {
        self.requirement().is_some()
    }
}

impl Requirement {
    pub fn is_met(&self, player: &Player) -> bool {
        match *self {
            Requirement::ActiveWeapon(weapon) => player.weapon() == weapon,
            Requirement::Passive(kind) => player.upgrades.get(kind) > 0,
        }
    }
}

/// Stack counts per upgrade kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCounts(BTreeMap<UpgradeKind, u32>);

impl UpgradeCounts {
    pub fn get(&self, kind: UpgradeKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn add(&mut self, kind: UpgradeKind) -> u32 {
        let count = self.0.entry(kind).or_insert(0);
        *count += 1;
        *count
    }

    pub fn owns(&self, kind: UpgradeKind) -> bool {
        self.get(kind) > 0
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UpgradeKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Number of choices offered per level-up
pub const CHOICES_PER_LEVEL: usize = 3;

/// Whether `kind` may be offered to `player` right now
pub fn is_offerable(kind: UpgradeKind, player: &Player) -> bool {
    match kind.requirement() {
        Some(req) => req.is_met(player) && !player.upgrades.owns(kind),
        None => true,
    }
}

/// Draw up to `count` distinct upgrades the player may take
pub fn roll_choices(player: &Player, rng: &mut SimRng, count: usize) -> Vec<UpgradeKind> {
    let mut pool: Vec<UpgradeKind> = UpgradeKind::ALL
        .iter()
        .copied()
        .filter(|k| is_offerable(*k, player))
        .collect();
    let mut picks = Vec::with_capacity(count);
    while picks.len() < count && !pool.is_empty() {
        let i = rng.index(pool.len());
        picks.push(pool.swap_remove(i));
    }
    picks
}
