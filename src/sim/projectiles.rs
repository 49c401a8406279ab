//! Projectile and enemy-projectile update, hit resolution and status effects

use std::f32::consts::TAU;

use glam::Vec2;

use super::collision::{circles_overlap, damage_player, out_of_world};
use super::fire::{NOVA_SPLASH_INTERVAL, ORB_REHIT, ORBIT_SPEED, nearest_enemy};
use super::state::{Projectile, ProjectileBehavior, WorldState};
use crate::audio::SoundCue;
use crate::{angle_delta, angle_of, from_angle};

/// Homing acquisition radius and turn rate (radians/s)
pub const HOMING_RADIUS: f32 = 400.0;
pub const HOMING_TURN_RATE: f32 = 4.0;
/// Boomerang flight
pub const BOOMERANG_DRAG: f32 = 1.5;
pub const BOOMERANG_RETURN_ACCEL: f32 = 900.0;
pub const BOOMERANG_RETURN_THRESHOLD: f32 = 600.0;
pub const BOOMERANG_MAX_RETURN: f32 = 1500.0;
pub const BOOMERANG_CATCH_MARGIN: f32 = 20.0;
/// Chance per tick that a boomerang re-hits an enemy it already struck
pub const BOOMERANG_REHIT_CHANCE: f32 = 0.1;
/// Gravity well pull
pub const GRAVITY_WELL_RADIUS: f32 = 250.0;
pub const GRAVITY_WELL_PULL: f32 = 180.0;
/// Burn: duration, chance per tick to deal damage, damage as a fraction of the hit
pub const BURN_DURATION: f32 = 3.0;
pub const BURN_TICK_CHANCE: f32 = 0.1;
pub const BURN_DAMAGE_FRACTION: f32 = 0.2;
/// Chain lightning
pub const CHAIN_TARGETS: usize = 3;
pub const CHAIN_RANGE: f32 = 200.0;
pub const CHAIN_DAMAGE_FRACTION: f32 = 0.5;
/// Nova orb splash
pub const NOVA_SPLASH_RADIUS: f32 = 60.0;
pub const NOVA_SPLASH_FRACTION: f32 = 0.5;
/// Non-persistent projectiles are removed this far outside the world
pub const CULL_MARGIN: f32 = 50.0;
/// Knockback impulse from a hit (pixels/s)
pub const KNOCKBACK: f32 = 60.0;

/// Whether `target` lies inside a melee arc
pub fn in_arc(center: Vec2, swing_angle: f32, arc_width: f32, reach: f32, target: Vec2) -> bool {
    let offset = target - center;
    if offset.length_squared() > reach * reach {
        return false;
    }
    if arc_width >= TAU || offset.length_squared() < 1e-6 {
        return true;
    }
    angle_delta(swing_angle, angle_of(offset)).abs() <= arc_width / 2.0
}

/// Advance every player projectile and resolve its hits
pub fn update_projectiles(state: &mut WorldState, dt: f32) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut alive = vec![true; projectiles.len()];

    for (j, proj) in projectiles.iter_mut().enumerate() {
        if !advance(state, proj, dt) || !resolve_hits(state, proj) {
            alive[j] = false;
        }
    }

    let mut j = 0;
    projectiles.retain(|_| {
        let keep = alive[j];
        j += 1;
        keep
    });
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;
}

/// Move a projectile per its behavior; false when it expires
fn advance(state: &mut WorldState, proj: &mut Projectile, dt: f32) -> bool {
    let player_pos = state.player.pos;

    match &mut proj.behavior {
        ProjectileBehavior::Standard { ttl } => {
            if proj.homing {
                steer_toward_nearest(state, &mut proj.vel, proj.pos, dt);
            }
            proj.pos += proj.vel * dt;
            if let Some(t) = ttl {
                *t -= dt;
                if *t <= 0.0 {
                    return false;
                }
            }
            !out_of_world(proj.pos, CULL_MARGIN)
        }
        ProjectileBehavior::DroneShot => {
            proj.pos += proj.vel * dt;
            !out_of_world(proj.pos, CULL_MARGIN)
        }
        ProjectileBehavior::MeleeArc {
            swing_angle,
            arc_width,
            reach,
            duration,
        } => {
            *duration -= dt;
            if *duration <= 0.0 {
                return false;
            }
            proj.pos = player_pos;
            // The blade also swats enemy bullets out of the air
            let (swing, width, reach) = (*swing_angle, *arc_width, *reach);
            state
                .enemy_projectiles
                .retain(|ep| !in_arc(player_pos, swing, width, reach + ep.radius, ep.pos));
            true
        }
        ProjectileBehavior::Orbit {
            angle,
            radius,
            rehit_timer,
            splash_timer,
        } => {
            *angle = (*angle + ORBIT_SPEED * dt).rem_euclid(TAU);
            let nova = state.player.evolutions.nova_orbs;
            let r = if nova {
                *radius * (1.0 + 0.25 * (state.time * 4.0).sin())
            } else {
                *radius
            };
            proj.pos = player_pos + from_angle(*angle) * r;

            *rehit_timer -= dt;
            if *rehit_timer <= 0.0 {
                *rehit_timer = ORB_REHIT;
                proj.hit_ids.clear();
            }

            if nova {
                *splash_timer -= dt;
                if *splash_timer <= 0.0 {
                    *splash_timer = NOVA_SPLASH_INTERVAL;
                    splash(state, proj.pos, NOVA_SPLASH_RADIUS, proj.damage * NOVA_SPLASH_FRACTION);
                }
            }
            true
        }
        ProjectileBehavior::Boomerang {
            return_speed,
            returning,
        } => {
            *return_speed = (*return_speed + BOOMERANG_RETURN_ACCEL * dt).min(BOOMERANG_MAX_RETURN);
            if !*returning {
                proj.vel *= (1.0 - BOOMERANG_DRAG * dt).max(0.0);
                proj.pos += proj.vel * dt;
                if *return_speed > BOOMERANG_RETURN_THRESHOLD {
                    *returning = true;
                    proj.hit_ids.clear();
                }
                return true;
            }

            // Home on the player's current position; never culled by bounds
            let catch = state.player.radius + proj.radius + BOOMERANG_CATCH_MARGIN;
            let to_player = player_pos - proj.pos;
            let dist = to_player.length();
            let step = *return_speed * dt;
            if dist <= catch || step >= dist {
                return false;
            }
            proj.vel = to_player / dist * *return_speed;
            proj.pos += proj.vel * dt;
            proj.pos.distance(player_pos) > catch
        }
        ProjectileBehavior::Mine { duration } => {
            *duration -= dt;
            if *duration <= 0.0 {
                return false;
            }
            if state.player.evolutions.gravity_well {
                let center = proj.pos;
                for e in state.enemies.iter_mut() {
                    if e.is_boss() || e.is_dead() {
                        continue;
                    }
                    let to_mine = center - e.pos;
                    let dist = to_mine.length();
                    if dist <= GRAVITY_WELL_RADIUS && dist > 0.0 {
                        e.pos += to_mine / dist * (GRAVITY_WELL_PULL * dt).min(dist);
                    }
                }
            }
            true
        }
    }
}

/// Turn `vel` toward the nearest enemy by at most the turn rate, keeping its speed
fn steer_toward_nearest(state: &WorldState, vel: &mut Vec2, pos: Vec2, dt: f32) {
    let Some((_, target)) = nearest_enemy(state, pos, HOMING_RADIUS) else {
        return;
    };
    let speed = vel.length();
    if speed <= 0.0 {
        return;
    }
    let current = angle_of(*vel);
    let desired = angle_of(target - pos);
    let max_turn = HOMING_TURN_RATE * dt;
    let turn = angle_delta(current, desired).clamp(-max_turn, max_turn);
    *vel = from_angle(current + turn) * speed;
}

/// Test a projectile against the enemies; false when it is used up
pub fn resolve_hits(state: &mut WorldState, proj: &mut Projectile) -> bool {
    for k in 0..state.enemies.len() {
        let (epos, eradius, eid) = {
            let e = &state.enemies[k];
            if e.is_dead() {
                continue;
            }
            (e.pos, e.radius, e.id)
        };

        let touching = match proj.behavior {
            ProjectileBehavior::MeleeArc {
                swing_angle,
                arc_width,
                reach,
                ..
            } => in_arc(proj.pos, swing_angle, arc_width, reach + eradius, epos),
            _ => circles_overlap(proj.pos, proj.radius, epos, eradius),
        };
        if !touching {
            continue;
        }

        let already_hit = proj.hit_ids.contains(&eid);
        match proj.behavior {
            ProjectileBehavior::Boomerang { .. } => {
                if already_hit && !state.rng.chance(BOOMERANG_REHIT_CHANCE) {
                    continue;
                }
            }
            _ => {
                if already_hit {
                    continue;
                }
            }
        }

        if proj.explode_radius > 0.0 {
            explode(state, proj);
            return false;
        }

        strike(state, k, proj);
        if !already_hit {
            proj.hit_ids.push(eid);
        }
        if proj.uses_hit_gate() {
            continue;
        }

        proj.pierce -= 1;
        return proj.pierce >= 0;
    }
    true
}

/// Damage one enemy and apply the projectile's payload
fn strike(state: &mut WorldState, k: usize, proj: &Projectile) {
    let damage = proj.damage;
    let pos = {
        let e = &mut state.enemies[k];
        e.take_damage(damage);
        apply_status(e, proj);
        if !e.is_boss() {
            let away = (e.pos - proj.pos).normalize_or_zero();
            e.pushback += away * KNOCKBACK;
        }
        e.pos
    };
    state.spawn_text(pos, format!("{}", damage.floor()), 0xffffff, 14.0);
    state.spawn_explosion(proj.pos, proj.color, 3);
    if proj.chain {
        chain_lightning(state, k, damage * CHAIN_DAMAGE_FRACTION);
    }
}

fn apply_status(e: &mut super::state::Enemy, proj: &Projectile) {
    if proj.freeze > 0.0 {
        e.frozen_timer = e.frozen_timer.max(proj.freeze);
    }
    if proj.incendiary {
        e.burn_timer = BURN_DURATION;
        e.burn_damage = e.burn_damage.max(proj.damage * BURN_DAMAGE_FRACTION);
    }
}

/// Damage every enemy within the blast (radius measured to the enemy's edge)
fn explode(state: &mut WorldState, proj: &Projectile) {
    let center = proj.pos;
    let radius = proj.explode_radius;
    for e in state.enemies.iter_mut() {
        if e.is_dead() {
            continue;
        }
        if e.pos.distance(center) <= radius + e.radius {
            e.take_damage(proj.damage);
            apply_status(e, proj);
        }
    }
    state.spawn_explosion(center, 0xf97316, 15);
    state.play_sound(SoundCue::Explosion, 1.0);
    state.add_shake(6.0);
}

/// Splash damage around a point
fn splash(state: &mut WorldState, center: Vec2, radius: f32, damage: f32) {
    for e in state.enemies.iter_mut() {
        if !e.is_dead() && e.pos.distance(center) <= radius + e.radius {
            e.take_damage(damage);
        }
    }
    state.spawn_ring(center, 0xa78bfa, radius);
}

/// Arc from enemy `source` to the nearest few others
fn chain_lightning(state: &mut WorldState, source: usize, damage: f32) {
    let from = state.enemies[source].pos;
    let mut targets: Vec<(f32, usize)> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, e)| *i != source && !e.is_dead())
        .map(|(i, e)| (e.pos.distance(from), i))
        .filter(|(d, _)| *d <= CHAIN_RANGE)
        .collect();
    targets.sort_by(|a, b| a.0.total_cmp(&b.0));
    for &(_, i) in targets.iter().take(CHAIN_TARGETS) {
        state.enemies[i].take_damage(damage);
        let pos = state.enemies[i].pos;
        state.spawn_explosion(pos, 0xfacc15, 4);
    }
}

/// Straight-line enemy bullets; damage goes through the shield pipeline
pub fn update_enemy_projectiles(state: &mut WorldState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut hits = Vec::new();
    state.enemy_projectiles.retain_mut(|ep| {
        ep.pos += ep.vel * dt;
        if circles_overlap(ep.pos, ep.radius, player_pos, player_radius) {
            hits.push(ep.damage);
            return false;
        }
        !out_of_world(ep.pos, CULL_MARGIN)
    });
    for damage in hits {
        damage_player(state, damage);
    }
}

/// Freeze countdown and burn ticks
pub fn update_status(state: &mut WorldState, dt: f32) {
    for e in state.enemies.iter_mut() {
        if e.frozen_timer > 0.0 {
            e.frozen_timer = (e.frozen_timer - dt).max(0.0);
        }
        if e.burn_timer > 0.0 {
            e.burn_timer = (e.burn_timer - dt).max(0.0);
            // Flat per-tick chance, not normalized to time
            if state.rng.chance(BURN_TICK_CHANCE) {
                e.take_damage(e.burn_damage);
            }
        }
    }
}
