//! Stat recalculation
//!
//! `recalculate` rebuilds every derived player stat from the active weapon's base block,
//! the chassis and the upgrade counts. It reads only `upgrades`, `inventory`,
//! `active_weapon`, `chassis` and `surplus_damage_stacks`, and overwrites the derived
//! subset, so calling it twice yields identical results.

use super::state::{EvolutionFlags, Player};
use super::upgrades::UpgradeKind;
use crate::consts::*;

/// Range at which combat drones pick targets
pub const DRONE_RANGE: f32 = 600.0;
/// Damage bonus per weapon-slot pick once every weapon is owned
pub const SURPLUS_DAMAGE_BONUS: f32 = 0.25;

#[inline]
fn stack(factor: f32, count: u32) -> f32 {
    factor.powi(count as i32)
}

/// Rebuild derived stats after an upgrade, a weapon switch or at run start
pub fn recalculate(player: &mut Player) {
    let up = &player.upgrades;
    let n = |kind: UpgradeKind| up.get(kind);

    let weapon = player.weapon();
    let base = weapon.base();
    let chassis = player.chassis.base();

    // Evolutions only count while their requirement holds
    let evo = |kind: UpgradeKind| {
        up.owns(kind)
            && kind
                .requirement()
                .map(|req| req.is_met(player))
                .unwrap_or(false)
    };
    let evolutions = EvolutionFlags {
        shotgun: evo(UpgradeKind::EvoShotgun),
        overload: evo(UpgradeKind::EvoOverload),
        sniper: evo(UpgradeKind::EvoSniper),
        homing: evo(UpgradeKind::EvoHoming),
        incendiary: evo(UpgradeKind::EvoIncendiary),
        giant_saber: evo(UpgradeKind::EvoGiantSaber),
        nova_orbs: evo(UpgradeKind::EvoNovaOrbs),
        quantum_storm: evo(UpgradeKind::EvoQuantumStorm),
        gravity_well: evo(UpgradeKind::EvoGravityWell),
        thunder_god: evo(UpgradeKind::EvoThunderGod),
    };

    // Damage
    let mut damage_mult = base.damage_mult
        * stack(1.15, n(UpgradeKind::Damage))
        * stack(0.85, n(UpgradeKind::Multishot))
        * stack(1.5, n(UpgradeKind::Rocket));
    if evolutions.overload {
        damage_mult *= 1.5;
    }
    if evolutions.sniper {
        damage_mult *= 4.0;
    }
    damage_mult *= 1.0 + SURPLUS_DAMAGE_BONUS * player.surplus_damage_stacks as f32;

    // Fire interval multiplier (higher = slower)
    let mut fire_rate_mult = base.fire_rate_mult
        * stack(0.85, n(UpgradeKind::FireRate))
        * stack(1.2, n(UpgradeKind::Rocket));
    if evolutions.overload {
        fire_rate_mult *= 1.6;
    }
    if evolutions.sniper {
        fire_rate_mult *= 2.5;
    }

    let mut bullet_speed_mult = base.bullet_speed_mult
        * stack(1.25, n(UpgradeKind::BulletSpeed))
        * stack(1.3, n(UpgradeKind::Laser));
    if evolutions.sniper {
        bullet_speed_mult *= 2.0;
    }
    if evolutions.quantum_storm {
        bullet_speed_mult *= 1.5;
    }

    let mut projectile_count = base.projectile_count + n(UpgradeKind::Multishot);
    if evolutions.overload {
        projectile_count += 2;
    }
    if evolutions.shotgun {
        projectile_count += 4;
    }
    if evolutions.nova_orbs || evolutions.quantum_storm {
        projectile_count *= 2;
    }

    let mut area_mult = base.area_mult * stack(1.2, n(UpgradeKind::Area));
    if evolutions.giant_saber {
        area_mult *= 1.3;
    }

    let mut piercing = base.piercing + 2 * n(UpgradeKind::Laser) as i32;
    if evolutions.sniper {
        piercing = INFINITE_PIERCE;
    }
    piercing = piercing.min(INFINITE_PIERCE);

    let mut blast_radius = base.blast_radius + 40.0 * n(UpgradeKind::Rocket) as f32;
    if evolutions.incendiary {
        blast_radius *= 2.0;
    }

    // Chassis
    let max_hp = chassis.max_hp + 50.0 * n(UpgradeKind::Health) as f32;
    let speed = chassis.speed.unwrap_or(PLAYER_BASE_SPEED) * stack(1.1, n(UpgradeKind::Speed));
    let max_shield = 50.0 * n(UpgradeKind::Shield) as f32;
    let magnet_radius = PLAYER_BASE_MAGNET_RADIUS * stack(1.4, n(UpgradeKind::Magnet));
    let thorns = 30.0 * n(UpgradeKind::Thorns) as f32;
    let hp_regen = 2.0 * n(UpgradeKind::Regen) as f32;
    let freeze_duration = 1.5 * n(UpgradeKind::Freeze) as f32;
    let chain_chance = (0.3 * n(UpgradeKind::ChainLightning) as f32).min(1.0);
    let duration_mult = stack(1.2, n(UpgradeKind::Duration));
    let ability_cooldown = ABILITY_BASE_COOLDOWN * stack(0.85, n(UpgradeKind::AbilityCooldown));
    let ability_range = ABILITY_BASE_RANGE * stack(1.25, n(UpgradeKind::AbilityArea));

    // Passives
    let field = n(UpgradeKind::StaticField);
    let (mut field_range, mut field_damage, mut field_interval) = if field > 0 {
        (140.0 + 20.0 * (field - 1) as f32, 8.0 * field as f32, 1.0)
    } else {
        (0.0, 0.0, 0.0)
    };
    if evolutions.thunder_god && field > 0 {
        field_range *= 2.0;
        field_damage *= 2.0;
        field_interval = 0.5;
    }
    let drones = n(UpgradeKind::DroneSupport);

    // Health keeps its fraction when the maximum moves
    if max_hp != player.max_hp {
        let fraction = if player.max_hp > 0.0 {
            (player.hp / player.max_hp).clamp(0.0, 1.0)
        } else {
            1.0
        };
        player.hp = fraction * max_hp;
        player.max_hp = max_hp;
    }
    player.hp = player.hp.clamp(0.0, player.max_hp);

    player.max_shield = max_shield;
    player.shield = player.shield.clamp(0.0, max_shield);
    player.speed = speed;
    player.magnet_radius = magnet_radius;
    player.thorns = thorns;
    player.hp_regen = hp_regen;

    player.damage_mult = damage_mult;
    player.fire_rate_mult = fire_rate_mult;
    player.bullet_speed_mult = bullet_speed_mult;
    player.projectile_count = projectile_count;
    player.area_mult = area_mult;
    player.duration_mult = duration_mult;
    player.piercing = piercing;
    player.blast_radius = blast_radius;
    player.auto_aim = base.auto_aim;
    player.freeze_duration = freeze_duration;
    player.chain_chance = chain_chance;
    player.evolutions = evolutions;

    player.ability_cooldown = ability_cooldown;
    player.ability_range = ability_range;

    let passives = &mut player.passives;
    passives.static_field_range = field_range;
    passives.static_field_damage = field_damage;
    passives.static_field_interval = field_interval;
    passives.drone_count = drones;
    passives.drone_interval = if drones > 0 { 1.0 } else { 0.0 };
    passives.drone_damage = if drones > 0 {
        20.0 * damage_mult
    } else {
        0.0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapons::WeaponId;
    use glam::Vec2;
    use proptest::prelude::*;

    fn fresh(weapon: WeaponId) -> Player {
        let mut p = Player::new(weapon, Vec2::ZERO);
        recalculate(&mut p);
        p
    }

    #[test]
    fn test_base_stats_match_weapon() {
        let p = fresh(WeaponId::LaserTech);
        let base = WeaponId::LaserTech.base();
        assert_eq!(p.damage_mult, base.damage_mult);
        assert_eq!(p.fire_rate_mult, base.fire_rate_mult);
        assert_eq!(p.piercing, 3);
        assert_eq!(p.max_hp, 100.0);
        assert_eq!(p.speed, PLAYER_BASE_SPEED);
    }

    #[test]
    fn test_saber_chassis_speed() {
        assert_eq!(fresh(WeaponId::PlasmaSaber).speed, 360.0);
    }

    #[test]
    fn test_health_upgrade_preserves_fraction() {
        let mut p = fresh(WeaponId::Standard);
        p.hp = 75.0; // half of 150
        p.upgrades.add(UpgradeKind::Health);
        recalculate(&mut p);
        assert_eq!(p.max_hp, 200.0);
        assert!((p.hp - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_evolution_requires_matching_weapon() {
        let mut p = fresh(WeaponId::Standard);
        p.upgrades.add(UpgradeKind::EvoSniper);
        recalculate(&mut p);
        assert!(p.evolutions.sniper);
        assert_eq!(p.piercing, INFINITE_PIERCE);

        p.inventory.push(WeaponId::LaserTech);
        p.active_weapon = 1;
        recalculate(&mut p);
        assert!(!p.evolutions.sniper);
        assert_eq!(p.piercing, 3);
    }

    #[test]
    fn test_upgrade_then_clear_restores_base() {
        let base = fresh(WeaponId::RocketHeavy);
        let mut p = base.clone();
        for kind in [
            UpgradeKind::Damage,
            UpgradeKind::Rocket,
            UpgradeKind::Multishot,
            UpgradeKind::EvoIncendiary,
            UpgradeKind::Speed,
        ] {
            p.upgrades.add(kind);
        }
        recalculate(&mut p);
        assert_ne!(p.damage_mult, base.damage_mult);
        p.upgrades.clear();
        recalculate(&mut p);
        assert_eq!(p.damage_mult, base.damage_mult);
        assert_eq!(p.fire_rate_mult, base.fire_rate_mult);
        assert_eq!(p.bullet_speed_mult, base.bullet_speed_mult);
        assert_eq!(p.projectile_count, base.projectile_count);
        assert_eq!(p.blast_radius, base.blast_radius);
        assert_eq!(p.speed, base.speed);
        assert_eq!(p.evolutions, base.evolutions);
    }

    #[test]
    fn test_static_field_and_thunder_god() {
        let mut p = fresh(WeaponId::Standard);
        p.upgrades.add(UpgradeKind::StaticField);
        recalculate(&mut p);
        assert_eq!(p.passives.static_field_range, 140.0);
        assert_eq!(p.passives.static_field_damage, 8.0);
        p.upgrades.add(UpgradeKind::EvoThunderGod);
        recalculate(&mut p);
        assert_eq!(p.passives.static_field_range, 280.0);
        assert_eq!(p.passives.static_field_interval, 0.5);
    }

    #[test]
    fn test_shield_clamped_when_max_drops() {
        let mut p = fresh(WeaponId::Standard);
        p.shield = 40.0;
        recalculate(&mut p);
        assert_eq!(p.shield, 0.0);
    }

    fn arb_upgrades() -> impl Strategy<Value = Vec<(usize, u32)>> {
        prop::collection::vec((0..UpgradeKind::ALL.len(), 1u32..4), 0..12)
    }

    proptest! {
        #[test]
        fn prop_recalculate_is_idempotent(
            weapon in 0..WeaponId::ALL.len(),
            ups in arb_upgrades(),
            hp_frac in 0.0f32..1.0,
        ) {
            let mut p = fresh(WeaponId::ALL[weapon]);
            for (k, times) in ups {
                for _ in 0..times {
                    p.upgrades.add(UpgradeKind::ALL[k]);
                }
            }
            p.hp = p.max_hp * hp_frac;
            recalculate(&mut p);
            let once = p.clone();
            recalculate(&mut p);
            prop_assert_eq!(once, p);
        }

        #[test]
        fn prop_hp_and_shield_in_bounds(
            ups in arb_upgrades(),
            hp in -100.0f32..1000.0,
            shield in -50.0f32..500.0,
        ) {
            let mut p = fresh(WeaponId::Standard);
            for (k, times) in ups {
                for _ in 0..times {
                    p.upgrades.add(UpgradeKind::ALL[k]);
                }
            }
            p.hp = hp;
            p.shield = shield;
            recalculate(&mut p);
            prop_assert!(p.hp >= 0.0 && p.hp <= p.max_hp);
            prop_assert!(p.shield >= 0.0 && p.shield <= p.max_shield);
        }
    }
}
