//! Per-frame simulation tick
//!
//! Runs every subsystem in a fixed order against the one owned `WorldState`.

use super::state::{GameEvent, ParticleKind, RunPhase, TickInput, WorldState};
use super::{ai, collision, fire, progression, projectiles, spawner};
use crate::audio::SoundCue;
use crate::consts::*;

/// Rate at which screen shake dies off (per second)
const SHAKE_DECAY: f32 = 10.0;
/// Particle velocity damping per second
const PARTICLE_DRAG: f32 = 3.0;
/// Floating text rise speed (pixels/s)
const TEXT_RISE: f32 = 30.0;

/// Convert a host frame time to a simulation step, clamped for stability
pub fn frame_dt(elapsed_ms: f32) -> f32 {
    if !elapsed_ms.is_finite() {
        return 0.0;
    }
    elapsed_ms.clamp(0.0, MAX_FRAME_MS) / 1000.0
}

/// Advance the world by one frame of `elapsed_ms` (clamped to `MAX_FRAME_MS`).
///
/// Nothing moves unless the run is in `RunPhase::Playing`.
pub fn tick(state: &mut WorldState, input: &TickInput, elapsed_ms: f32) {
    if state.phase != RunPhase::Playing {
        return;
    }
    let dt = frame_dt(elapsed_ms);
    state.time += dt;

    update_timers(state, dt);

    spawner::update_spawns(state, dt);
    spawner::update_bosses(state, dt);
    spawner::update_stage(state);
    spawner::update_supply_drop(state, dt);

    move_player(state, input, dt);

    fire::update_fire(state, input, dt);
    fire::update_passives(state, dt);
    progression::reap_dead(state);

    projectiles::update_projectiles(state, dt);
    progression::reap_dead(state);

    ai::update_enemies(state, dt);
    projectiles::update_enemy_projectiles(state, dt);

    collision::resolve_contacts(state);
    progression::reap_dead(state);

    projectiles::update_status(state, dt);
    progression::reap_dead(state);

    let spawned = std::mem::take(&mut state.pending_spawns);
    state.enemies.extend(spawned);

    progression::update_loot(state, dt);
    update_effects(state, dt);

    if state.player.hp <= 0.0 {
        state.phase = RunPhase::GameOver;
        state.push_event(GameEvent::PlayerDied);
        state.play_sound(SoundCue::GameOver, 1.0);
        log::info!(
            "Game over at {:.1}s: score {}, kills {}, level {}",
            state.time,
            state.score,
            state.kills,
            state.player.level
        );
        return;
    }

    if state.pending_level_ups > 0 {
        state.phase = RunPhase::LevelUp;
    }
}

/// Cooldowns, invulnerability, shield and hp regeneration, shake decay
fn update_timers(state: &mut WorldState, dt: f32) {
    let p = &mut state.player;
    p.ability_timer = (p.ability_timer - dt).max(0.0);
    p.invuln_timer = (p.invuln_timer - dt).max(0.0);

    if p.max_shield > 0.0 && p.shield < p.max_shield {
        if p.shield_regen_timer > 0.0 {
            p.shield_regen_timer = (p.shield_regen_timer - dt).max(0.0);
        } else {
            p.shield = (p.shield + p.max_shield * SHIELD_REGEN_RATE * dt).min(p.max_shield);
        }
    }

    if p.hp_regen > 0.0 {
        p.regen_timer += dt;
        if p.regen_timer >= 1.0 {
            p.regen_timer -= 1.0;
            p.hp = (p.hp + p.hp_regen).min(p.max_hp);
        }
    }

    state.screen_shake *= (1.0 - SHAKE_DECAY * dt).max(0.0);
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
}

/// Axis-separated player movement, clamped to the world; camera follows
fn move_player(state: &mut WorldState, input: &TickInput, dt: f32) {
    let intent = input.movement.clamp_length_max(1.0);
    if intent != glam::Vec2::ZERO {
        let p = &state.player;
        let delta = intent * p.speed * dt;
        let moved = collision::move_circle(p.pos, delta, p.radius, &state.obstacles);
        state.player.pos = collision::clamp_to_world(moved.pos, state.player.radius);
    }
    state.update_camera();
}

fn update_effects(state: &mut WorldState, dt: f32) {
    let drag = (1.0 - PARTICLE_DRAG * dt).max(0.0);
    state.particles.retain_mut(|p| {
        p.life -= dt;
        if p.kind == ParticleKind::Spark {
            p.pos += p.vel * dt;
            p.vel *= drag;
        }
        p.life > 0.0
    });
    state.floating_texts.retain_mut(|t| {
        t.life -= dt;
        t.pos.y -= TEXT_RISE * dt;
        t.life > 0.0
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemies::{self, EnemyKind};
    use crate::sim::state::{Enemy, EnemyBrain, LootKind, ProjectileBehavior, RunConfig};
    use crate::sim::stats;
    use crate::sim::upgrades::UpgradeKind;
    use crate::sim::weapons::WeaponId;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn state_with(weapon: WeaponId, seed: u64) -> WorldState {
        let mut s = WorldState::new(RunConfig {
            seed,
            starting_weapon: weapon,
            ..RunConfig::default()
        });
        s.obstacles.clear();
        // Keep ordinary spawns out of the way
        s.spawn_timer = 1000.0;
        s
    }

    fn push_enemy(s: &mut WorldState, kind: EnemyKind, offset: Vec2) -> u32 {
        let id = s.next_entity_id();
        let pos = s.player.pos + offset;
        s.enemies.push(Enemy::from_table(id, kind, pos));
        id
    }

    fn enemy(s: &WorldState, id: u32) -> Option<&Enemy> {
        s.enemies.iter().find(|e| e.id == id)
    }

    #[test]
    fn test_contact_damage_then_thorns() {
        let mut s = state_with(WeaponId::Standard, 1);
        s.player.upgrades.add(UpgradeKind::Thorns);
        stats::recalculate(&mut s.player);
        let hp = s.player.hp;
        let offset = Vec2::new(s.player.radius + 6.0, 0.0);
        let id = push_enemy(&mut s, EnemyKind::Basic, offset);
        let (damage, enemy_hp) = {
            let e = enemy(&s, id).unwrap();
            (e.damage, e.hp)
        };

        tick(&mut s, &TickInput::default(), FRAME_MS);

        assert_eq!(s.player.hp, hp - damage);
        assert_eq!(enemy(&s, id).unwrap().hp, enemy_hp - s.player.thorns);
        assert!(s.player.invuln_timer > 0.0);

        // Invulnerability window holds off the next touch
        tick(&mut s, &TickInput::default(), FRAME_MS);
        assert_eq!(s.player.hp, hp - damage);
    }

    #[test]
    fn test_orbs_evenly_spaced_after_tick() {
        let mut s = state_with(WeaponId::PsiOrbs, 2);
        s.player.upgrades.add(UpgradeKind::Multishot);
        stats::recalculate(&mut s.player);
        assert_eq!(s.player.projectile_count, 3);

        tick(&mut s, &TickInput::default(), FRAME_MS);

        let angles: Vec<f32> = s
            .projectiles
            .iter()
            .filter_map(|p| match p.behavior {
                ProjectileBehavior::Orbit { angle, .. } => Some(angle),
                _ => None,
            })
            .collect();
        assert_eq!(angles.len(), 3);
        for k in 1..3 {
            let gap = (angles[k] - angles[0]).rem_euclid(TAU);
            assert!((gap - k as f32 * TAU / 3.0).abs() < 1e-3, "gap {}", gap);
        }
    }

    #[test]
    fn test_boss_enrage_in_tick() {
        let mut s = state_with(WeaponId::Standard, 3);
        let id = push_enemy(&mut s, EnemyKind::Titan, Vec2::new(900.0, 0.0));
        if let Some(e) = s.enemies.iter_mut().find(|e| e.id == id) {
            e.hp = e.max_hp * 0.5;
        }

        tick(&mut s, &TickInput::default(), FRAME_MS);

        let boss = enemy(&s, id).unwrap();
        assert!(boss.is_enraged());
        let enraged = enemies::special_interval(boss.kind, true);
        assert!(enraged < enemies::special_interval(boss.kind, false));
        match boss.brain {
            EnemyBrain::Boss { special_timer, .. } => assert!(special_timer <= enraged),
            other => panic!("boss without a boss brain: {:?}", other),
        }
    }

    #[test]
    fn test_pause_gate() {
        let mut s = state_with(WeaponId::Standard, 4);
        s.phase = RunPhase::Paused;
        let pos = s.player.pos;
        let input = TickInput {
            movement: Vec2::X,
            ..TickInput::default()
        };
        tick(&mut s, &input, FRAME_MS);
        assert_eq!(s.time, 0.0);
        assert_eq!(s.player.pos, pos);
    }

    #[test]
    fn test_frame_time_is_clamped() {
        let mut s = state_with(WeaponId::Standard, 5);
        tick(&mut s, &TickInput::default(), 5000.0);
        assert!((s.time - MAX_FRAME_MS / 1000.0).abs() < 1e-6);
        assert_eq!(frame_dt(f32::NAN), 0.0);
        assert_eq!(frame_dt(-3.0), 0.0);
    }

    #[test]
    fn test_movement_is_normalized() {
        let mut s = state_with(WeaponId::Standard, 6);
        let start = s.player.pos;
        let input = TickInput {
            movement: Vec2::new(10.0, 10.0),
            ..TickInput::default()
        };
        tick(&mut s, &input, 100.0);
        let moved = s.player.pos.distance(start);
        assert!((moved - s.player.speed * 0.1).abs() < 1e-2);
    }

    #[test]
    fn test_death_ends_run() {
        let mut s = state_with(WeaponId::Standard, 7);
        s.player.hp = 1.0;
        push_enemy(&mut s, EnemyKind::Basic, Vec2::new(5.0, 0.0));

        tick(&mut s, &TickInput::default(), FRAME_MS);
        assert_eq!(s.phase, RunPhase::GameOver);
        assert!(s.events.contains(&GameEvent::PlayerDied));

        let time = s.time;
        tick(&mut s, &TickInput::default(), FRAME_MS);
        assert_eq!(s.time, time);
    }

    #[test]
    fn test_level_up_pauses_until_upgrade() {
        let mut s = state_with(WeaponId::Standard, 8);
        s.player.xp = 40.0;
        let pos = s.player.pos;
        s.spawn_loot(pos, LootKind::XpOrb);

        tick(&mut s, &TickInput::default(), FRAME_MS);
        assert_eq!(s.phase, RunPhase::LevelUp);
        let time = s.time;
        tick(&mut s, &TickInput::default(), FRAME_MS);
        assert_eq!(s.time, time);

        let choice = s.offered_upgrades[0];
        progression::apply_upgrade(&mut s, choice);
        assert_eq!(s.phase, RunPhase::Playing);
    }

    #[test]
    fn test_shield_regen_waits_for_delay() {
        let mut s = state_with(WeaponId::Standard, 9);
        s.player.upgrades.add(UpgradeKind::Shield);
        stats::recalculate(&mut s.player);
        s.player.shield = 0.0;
        s.player.shield_regen_timer = SHIELD_REGEN_DELAY;

        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(s.player.shield, 0.0);

        s.player.shield_regen_timer = 0.0;
        tick(&mut s, &TickInput::default(), 100.0);
        assert!((s.player.shield - 50.0 * SHIELD_REGEN_RATE * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = WorldState::new(RunConfig {
            seed: 2024,
            ..RunConfig::default()
        });
        let mut b = WorldState::new(RunConfig {
            seed: 2024,
            ..RunConfig::default()
        });
        for i in 0..900 {
            let t = i as f32 * 0.05;
            let input = TickInput {
                movement: Vec2::new(t.cos(), t.sin()),
                aim_target: a.player.pos + Vec2::new(t.sin(), t.cos()) * 200.0,
                fire_held: i % 3 != 0,
            };
            tick(&mut a, &input, FRAME_MS);
            tick(&mut b, &input, FRAME_MS);
            if a.phase == RunPhase::LevelUp {
                let pick = a.offered_upgrades[0];
                progression::apply_upgrade(&mut a, pick);
                progression::apply_upgrade(&mut b, pick);
            }
        }
        assert_eq!(a.time, b.time);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player, b.player);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.projectiles, b.projectiles);
        assert_eq!(a.events, b.events);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_tick_keeps_invariants(
            seed in any::<u64>(),
            steps in prop::collection::vec(
                (-1.0f32..1.0, -1.0f32..1.0, any::<bool>(), 0.0f32..150.0),
                1..150,
            ),
        ) {
            let mut s = WorldState::new(RunConfig { seed, ..RunConfig::default() });
            for (dx, dy, fire_held, ms) in steps {
                let input = TickInput {
                    movement: Vec2::new(dx, dy),
                    aim_target: s.player.pos + Vec2::new(dy, dx) * 100.0,
                    fire_held,
                };
                tick(&mut s, &input, ms);
                if s.phase == RunPhase::LevelUp {
                    let pick = s.offered_upgrades[0];
                    progression::apply_upgrade(&mut s, pick);
                }
                let p = &s.player;
                prop_assert!(p.hp >= 0.0 && p.hp <= p.max_hp);
                prop_assert!(p.shield >= 0.0 && p.shield <= p.max_shield);
                prop_assert!(p.fire_timer >= 0.0 && p.ability_timer >= 0.0);
                prop_assert!(s.enemies.iter().all(|e| !e.is_dead() && e.hp <= e.max_hp));
                prop_assert!(p.pos.x >= p.radius && p.pos.x <= WORLD_WIDTH - p.radius);
            }
        }
    }
}
