//! Player shockwave ability

use super::progression::reap_dead;
use super::state::{RunPhase, WorldState};
use crate::audio::SoundCue;
use crate::consts::ABILITY_BASE_DAMAGE;

/// Knockback impulse given to non-boss enemies (pixels/s)
pub const ABILITY_PUSHBACK: f32 = 600.0;
/// Bosses take this share of the damage and are not pushed
pub const BOSS_DAMAGE_MULT: f32 = 0.5;

/// Fire the shockwave if it is off cooldown. Returns whether it fired.
pub fn trigger_ability(state: &mut WorldState) -> bool {
    if state.phase != RunPhase::Playing || state.player.ability_timer > 0.0 {
        return false;
    }

    let center = state.player.pos;
    let range = state.player.ability_range;
    let damage = ABILITY_BASE_DAMAGE * state.player.damage_mult;
    state.player.ability_timer = state.player.ability_cooldown;

    for e in state.enemies.iter_mut() {
        if e.is_dead() {
            continue;
        }
        let offset = e.pos - center;
        if offset.length() > range + e.radius {
            continue;
        }
        if e.is_boss() {
            e.take_damage(damage * BOSS_DAMAGE_MULT);
        } else {
            e.take_damage(damage);
            e.pushback += offset.normalize_or_zero() * ABILITY_PUSHBACK;
        }
    }
    state
        .enemy_projectiles
        .retain(|p| p.pos.distance(center) > range);

    state.spawn_ring(center, 0x22d3ee, range);
    state.add_shake(20.0);
    state.play_sound(SoundCue::Shockwave, 1.0);
    log::debug!("Shockwave at ({:.0}, {:.0}) r={:.0}", center.x, center.y, range);

    reap_dead(state);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemies::EnemyKind;
    use crate::sim::state::{Enemy, EnemyProjectile, RunConfig, TickInput};
    use crate::sim::tick::tick;
    use glam::Vec2;

    fn state() -> WorldState {
        let mut s = WorldState::new(RunConfig {
            seed: 9,
            ..RunConfig::default()
        });
        s.obstacles.clear();
        s
    }

    fn add(s: &mut WorldState, kind: EnemyKind, offset: Vec2) {
        let id = s.next_entity_id();
        let pos = s.player.pos + offset;
        s.enemies.push(Enemy::from_table(id, kind, pos));
    }

    #[test]
    fn test_shockwave_damage_and_pushback() {
        let mut s = state();
        add(&mut s, EnemyKind::Tank, Vec2::new(100.0, 0.0));
        add(&mut s, EnemyKind::Goliath, Vec2::new(0.0, 150.0));
        add(&mut s, EnemyKind::Tank, Vec2::new(0.0, -600.0));

        assert!(trigger_ability(&mut s));

        assert_eq!(s.enemies[0].hp, 150.0);
        assert!(s.enemies[0].pushback.x > 0.0);
        assert_eq!(s.enemies[1].hp, s.enemies[1].max_hp - 25.0);
        assert_eq!(s.enemies[1].pushback, Vec2::ZERO);
        assert_eq!(s.enemies[2].hp, 200.0);
        assert_eq!(s.player.ability_timer, s.player.ability_cooldown);
    }

    #[test]
    fn test_cooldown_blocks_retrigger() {
        let mut s = state();
        assert!(trigger_ability(&mut s));
        assert!(!trigger_ability(&mut s));
        s.player.ability_timer = 0.0;
        assert!(trigger_ability(&mut s));
    }

    #[test]
    fn test_not_while_paused() {
        let mut s = state();
        s.phase = RunPhase::Paused;
        assert!(!trigger_ability(&mut s));
        assert_eq!(s.player.ability_timer, 0.0);
    }

    #[test]
    fn test_clears_enemy_bullets_in_range() {
        let mut s = state();
        for dx in [50.0, 1000.0] {
            let id = s.next_entity_id();
            let pos = s.player.pos + Vec2::new(dx, 0.0);
            s.enemy_projectiles.push(EnemyProjectile {
                id,
                pos,
                vel: Vec2::ZERO,
                radius: 6.0,
                damage: 10.0,
                color: 0,
            });
        }
        trigger_ability(&mut s);
        assert_eq!(s.enemy_projectiles.len(), 1);
    }

    #[test]
    fn test_level_from_shockwave_kill_halts_next_tick() {
        let mut s = state();
        s.spawn_timer = 1000.0;
        s.player.xp = s.player.max_xp - 1.0;
        add(&mut s, EnemyKind::Goliath, Vec2::new(100.0, 0.0));
        s.enemies[0].hp = 1.0;
        add(&mut s, EnemyKind::Elite, Vec2::new(-250.0, 0.0));
        let elite_pos = s.enemies[1].pos;

        assert!(trigger_ability(&mut s));
        assert_eq!(s.kills, 1);
        assert!(s.pending_level_ups > 0);
        assert_eq!(s.phase, RunPhase::LevelUp);

        tick(&mut s, &TickInput::default(), 16.0);
        assert_eq!(s.time, 0.0);
        assert_eq!(s.enemies[0].pos, elite_pos);
    }

    #[test]
    fn test_kills_are_reaped() {
        let mut s = state();
        add(&mut s, EnemyKind::Basic, Vec2::new(50.0, 0.0));
        trigger_ability(&mut s);
        assert!(s.enemies.is_empty());
        assert_eq!(s.kills, 1);
    }
}
