//! Weapon ids, archetypes and base stat blocks

use serde::{Deserialize, Serialize};

/// Behavioral category of a weapon (decides firing and projectile rules)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Ranged,
    Melee,
    Orbital,
    Boomerang,
    Mine,
}

/// Starter weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponId {
    Standard,
    SmartTracker,
    RocketHeavy,
    LaserTech,
    PlasmaSaber,
    PsiOrbs,
    QuantumBlade,
    VoidTrap,
}

/// Base stat block for a weapon before any upgrades
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponBase {
    pub projectile_count: u32,
    pub damage_mult: f32,
    /// Multiplier on the fire interval (lower fires faster, 0 = no timer)
    pub fire_rate_mult: f32,
    pub bullet_speed_mult: f32,
    pub area_mult: f32,
    pub piercing: i32,
    pub blast_radius: f32,
    pub auto_aim: bool,
    /// Max hp of the chassis when this is the starting weapon
    pub max_hp: f32,
    /// Movement speed override (pixels/s) when this is the starting weapon
    pub speed: Option<f32>,
    /// Display color (0xRRGGBB)
    pub color: u32,
}

impl WeaponId {
    pub const ALL: [WeaponId; 8] = [
        WeaponId::Standard,
        WeaponId::SmartTracker,
        WeaponId::RocketHeavy,
        WeaponId::LaserTech,
        WeaponId::PlasmaSaber,
        WeaponId::PsiOrbs,
        WeaponId::QuantumBlade,
        WeaponId::VoidTrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponId::Standard => "standard",
            WeaponId::SmartTracker => "smart_tracker",
            WeaponId::RocketHeavy => "rocket_heavy",
            WeaponId::LaserTech => "laser_tech",
            WeaponId::PlasmaSaber => "plasma_saber",
            WeaponId::PsiOrbs => "psi_orbs",
            WeaponId::QuantumBlade => "quantum_blade",
            WeaponId::VoidTrap => "void_trap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == s.trim().to_lowercase())
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeaponId::Standard => "Standard Assault",
            WeaponId::SmartTracker => "Smart Tracker",
            WeaponId::RocketHeavy => "Heavy Demolisher",
            WeaponId::LaserTech => "Prism Laser",
            WeaponId::PlasmaSaber => "Plasma Saber",
            WeaponId::PsiOrbs => "Psi Orbs",
            WeaponId::QuantumBlade => "Quantum Blade",
            WeaponId::VoidTrap => "Void Trap",
        }
    }

    pub fn archetype(&self) -> Archetype {
        match self {
            WeaponId::Standard
            | WeaponId::SmartTracker
            | WeaponId::RocketHeavy
            | WeaponId::LaserTech => Archetype::Ranged,
            WeaponId::PlasmaSaber => Archetype::Melee,
            WeaponId::PsiOrbs => Archetype::Orbital,
            WeaponId::QuantumBlade => Archetype::Boomerang,
            WeaponId::VoidTrap => Archetype::Mine,
        }
    }

    pub fn base(&self) -> WeaponBase {
        let standard = WeaponBase {
            projectile_count: 1,
            damage_mult: 1.0,
            fire_rate_mult: 1.0,
            bullet_speed_mult: 1.0,
            area_mult: 1.0,
            piercing: 0,
            blast_radius: 0.0,
            auto_aim: false,
            max_hp: crate::consts::PLAYER_BASE_MAX_HP,
            speed: None,
            color: 0x22d3ee,
        };
        match self {
            WeaponId::Standard => standard,
            WeaponId::SmartTracker => WeaponBase {
                damage_mult: 0.75,
                fire_rate_mult: 0.9,
                bullet_speed_mult: 1.2,
                auto_aim: true,
                max_hp: 120.0,
                color: 0x10b981,
                ..standard
            },
            WeaponId::RocketHeavy => WeaponBase {
                damage_mult: 1.8,
                fire_rate_mult: 1.5,
                bullet_speed_mult: 0.8,
                blast_radius: 60.0,
                max_hp: 250.0,
                color: 0xf97316,
                ..standard
            },
            WeaponId::LaserTech => WeaponBase {
                damage_mult: 0.5,
                fire_rate_mult: 0.6,
                bullet_speed_mult: 1.5,
                piercing: 3,
                max_hp: 100.0,
                color: 0xd8b4fe,
                ..standard
            },
            WeaponId::PlasmaSaber => WeaponBase {
                damage_mult: 2.5,
                fire_rate_mult: 2.0,
                area_mult: 1.2,
                max_hp: 180.0,
                speed: Some(360.0),
                color: 0xf43f5e,
                ..standard
            },
            WeaponId::PsiOrbs => WeaponBase {
                projectile_count: 2,
                damage_mult: 0.8,
                fire_rate_mult: 0.0,
                area_mult: 1.2,
                max_hp: 140.0,
                color: 0xa78bfa,
                ..standard
            },
            WeaponId::QuantumBlade => WeaponBase {
                damage_mult: 1.5,
                fire_rate_mult: 1.2,
                bullet_speed_mult: 1.5,
                piercing: crate::consts::INFINITE_PIERCE,
                max_hp: 130.0,
                color: 0xffffff,
                ..standard
            },
            WeaponId::VoidTrap => WeaponBase {
                damage_mult: 4.0,
                fire_rate_mult: 1.5,
                bullet_speed_mult: 0.0,
                blast_radius: 80.0,
                max_hp: 200.0,
                color: 0x52525b,
                ..standard
            },
        }
    }
}

impl Archetype {
    /// Fire interval before the weapon's fire-rate multiplier (seconds)
    pub fn base_interval(&self) -> f32 {
        match self {
            Archetype::Ranged => crate::consts::BASE_FIRE_INTERVAL,
            Archetype::Melee => 0.5,
            Archetype::Boomerang => 0.5,
            Archetype::Mine => 1.0,
            Archetype::Orbital => 0.0,
        }
    }

    /// Whether the weapon fires on its own once ready (no trigger needed)
    pub fn fires_automatically(&self) -> bool {
        matches!(self, Archetype::Melee | Archetype::Orbital | Archetype::Mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_id_round_trips_through_str() {
        for id in WeaponId::ALL {
            assert_eq!(WeaponId::from_str(id.as_str()), Some(id));
        }
        assert_eq!(WeaponId::from_str("Psi_Orbs "), Some(WeaponId::PsiOrbs));
        assert_eq!(WeaponId::from_str("railgun"), None);
    }

    #[test]
    fn test_archetypes() {
        assert_eq!(WeaponId::PsiOrbs.archetype(), Archetype::Orbital);
        assert_eq!(WeaponId::VoidTrap.archetype(), Archetype::Mine);
        assert!(Archetype::Melee.fires_automatically());
        assert!(!Archetype::Boomerang.fires_automatically());
    }

    #[test]
    fn test_orbs_start_with_two() {
        assert_eq!(WeaponId::PsiOrbs.base().projectile_count, 2);
        assert!(WeaponId::SmartTracker.base().auto_aim);
    }
}
