//! Weapon fire controller and passive skills
//!
//! Each archetype decides whether to emit projectiles this tick. Ranged and boomerang
//! weapons need the trigger; melee, orbital and mine weapons run on their own.

use std::f32::consts::TAU;

use glam::Vec2;

use super::state::{Projectile, ProjectileBehavior, TickInput, WorldState};
use super::stats::DRONE_RANGE;
use super::weapons::Archetype;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::{angle_of, from_angle};

/// Radius in which auto-aim picks a target
pub const AUTO_AIM_RADIUS: f32 = 800.0;
/// Angle between shots in a symmetric fan
pub const FAN_SPREAD: f32 = 0.17;
/// Half-width of the random shotgun cone
pub const SHOTGUN_SPREAD: f32 = 0.5;
/// Shotgun pellets expire after this long
pub const SHOTGUN_TTL: f32 = 0.35;
/// Melee arc width (radians) and reach (pixels, before area)
pub const MELEE_ARC: f32 = 2.2;
pub const MELEE_REACH: f32 = 90.0;
pub const MELEE_DURATION: f32 = 0.2;
/// Orbit radius (before area) and angular speed
pub const ORBIT_RADIUS: f32 = 80.0;
pub const ORBIT_SPEED: f32 = 3.0;
pub const ORB_RADIUS: f32 = 10.0;
/// Seconds before an orb may hit the same enemy again
pub const ORB_REHIT: f32 = 0.5;
pub const NOVA_SPLASH_INTERVAL: f32 = 2.0;
pub const BOOMERANG_RADIUS: f32 = 12.0;
pub const MINE_RADIUS: f32 = 14.0;
pub const MINE_DURATION: f32 = 12.0;
/// Simultaneous mines per projectile count
pub const MINES_PER_COUNT: usize = 4;
pub const DRONE_BULLET_SPEED: f32 = 600.0;
/// Distance drones hover from the player
pub const DRONE_ORBIT: f32 = 40.0;

/// Resolved aim for this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub angle: f32,
    /// An auto-aim target was found
    pub locked: bool,
}

/// Index and position of the nearest live enemy within `radius` of `from`
pub fn nearest_enemy(state: &WorldState, from: Vec2, radius: f32) -> Option<(usize, Vec2)> {
    let mut best: Option<(usize, Vec2, f32)> = None;
    for (i, e) in state.enemies.iter().enumerate() {
        if e.is_dead() {
            continue;
        }
        let d = e.pos.distance_squared(from);
        if d > radius * radius {
            continue;
        }
        if best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((i, e.pos, d));
        }
    }
    best.map(|(i, pos, _)| (i, pos))
}

/// Auto-aim at the nearest enemy when enabled, else at the pointer
pub fn resolve_aim(state: &WorldState, input: &TickInput) -> Aim {
    let player = &state.player;
    let auto = player.auto_aim || state.config.force_auto_aim;
    if auto {
        if let Some((_, target)) = nearest_enemy(state, player.pos, AUTO_AIM_RADIUS) {
            return Aim {
                angle: angle_of(target - player.pos),
                locked: true,
            };
        }
    }
    let to_pointer = input.aim_target - player.pos;
    let angle = if to_pointer.length_squared() > 1e-6 {
        angle_of(to_pointer)
    } else {
        player.angle
    };
    Aim {
        angle,
        locked: false,
    }
}

/// Fire interval of the active weapon (seconds)
pub fn fire_interval(state: &WorldState) -> f32 {
    state.player.weapon().archetype().base_interval() * state.player.fire_rate_mult
}

/// Run the active weapon for one tick
pub fn update_fire(state: &mut WorldState, input: &TickInput, dt: f32) {
    let archetype = state.player.weapon().archetype();
    let aim = resolve_aim(state, input);
    state.player.angle = aim.angle;
    state.player.fire_timer = (state.player.fire_timer - dt).max(0.0);

    // Orbs only exist while the orbital weapon is equipped
    if archetype != Archetype::Orbital {
        state
            .projectiles
            .retain(|p| !matches!(p.behavior, ProjectileBehavior::Orbit { .. }));
    }

    // Touch play has no trigger: auto-aim lock is the trigger
    let trigger = if state.config.force_auto_aim {
        aim.locked
    } else {
        input.fire_held
    };
    let ready = state.player.fire_timer <= 0.0;

    match archetype {
        Archetype::Ranged => {
            if trigger && ready {
                fire_ranged(state, aim.angle);
                state.player.fire_timer = fire_interval(state);
            }
        }
        Archetype::Melee => {
            if ready {
                swing_melee(state, aim.angle);
                state.player.fire_timer = fire_interval(state);
            }
        }
        Archetype::Orbital => maintain_orbs(state),
        Archetype::Boomerang => {
            let in_flight = state
                .projectiles
                .iter()
                .filter(|p| matches!(p.behavior, ProjectileBehavior::Boomerang { .. }))
                .count();
            let cap_ok = state.player.evolutions.quantum_storm
                || in_flight < state.player.projectile_count.max(1) as usize;
            if trigger && ready && cap_ok {
                throw_boomerang(state, aim.angle);
                state.player.fire_timer = fire_interval(state);
            }
        }
        Archetype::Mine => {
            if ready {
                let mines = state
                    .projectiles
                    .iter()
                    .filter(|p| matches!(p.behavior, ProjectileBehavior::Mine { .. }))
                    .count();
                let cap = MINES_PER_COUNT * state.player.projectile_count.max(1) as usize;
                if mines < cap {
                    drop_mine(state);
                }
                // Replenish timer runs whether or not a mine was placed
                state.player.fire_timer = fire_interval(state);
            }
        }
    }
}

fn base_damage(state: &WorldState) -> f32 {
    BASE_DAMAGE * state.player.damage_mult
}

/// Shared payload for a new player projectile
fn payload(state: &mut WorldState, mut proj: Projectile) -> Projectile {
    proj.freeze = state.player.freeze_duration;
    proj.color = state.player.weapon().base().color;
    let chance = state.player.chain_chance;
    // Chain lightning is decided once per shot
    proj.chain = state.rng.chance(chance);
    proj
}

/// Emit `projectile_count` shots around `angle`
pub fn fire_ranged(state: &mut WorldState, angle: f32) {
    let count = state.player.projectile_count.max(1);
    let speed = BASE_BULLET_SPEED * state.player.bullet_speed_mult;
    let damage = base_damage(state);
    let blast = state.player.blast_radius * state.player.area_mult;
    let piercing = state.player.piercing;
    let evo = state.player.evolutions;
    let origin = state.player.pos + from_angle(angle) * state.player.radius;

    for i in 0..count {
        let offset = if evo.shotgun {
            state.rng.range(-SHOTGUN_SPREAD, SHOTGUN_SPREAD)
        } else {
            (i as f32 - (count - 1) as f32 / 2.0) * FAN_SPREAD
        };
        let dir = from_angle(angle + offset);
        let ttl = evo.shotgun.then_some(SHOTGUN_TTL);
        let id = state.next_entity_id();
        let mut proj = Projectile::new(
            id,
            origin,
            dir * speed,
            damage,
            ProjectileBehavior::Standard { ttl },
        );
        if blast > 0.0 {
            // Explosive shots detonate on the first hit
            proj.explode_radius = blast;
            proj.pierce = 0;
            proj.radius = BULLET_RADIUS * 1.6;
        } else {
            proj.pierce = piercing;
        }
        proj.homing = evo.homing;
        proj.incendiary = evo.incendiary;
        let proj = payload(state, proj);
        state.projectiles.push(proj);
    }

    if blast > 0.0 {
        state.play_sound(SoundCue::Rocket, 1.0);
    } else if piercing > 0 {
        state.play_sound(SoundCue::Laser, 1.0);
    } else {
        let pitch = state.rng.range(1.0, 1.2);
        state.play_sound(SoundCue::Shoot, pitch);
    }
}

/// Arc hit-volume around the player facing `angle`
pub fn swing_melee(state: &mut WorldState, angle: f32) {
    let player = &state.player;
    let reach = MELEE_REACH * player.area_mult;
    let arc_width = if player.evolutions.giant_saber {
        TAU
    } else {
        MELEE_ARC
    };
    let duration = MELEE_DURATION * player.duration_mult;
    let pos = player.pos;
    let damage = base_damage(state);
    let id = state.next_entity_id();
    let mut proj = Projectile::new(
        id,
        pos,
        Vec2::ZERO,
        damage,
        ProjectileBehavior::MeleeArc {
            swing_angle: angle,
            arc_width,
            reach,
            duration,
        },
    );
    proj.radius = reach;
    proj.pierce = INFINITE_PIERCE;
    let proj = payload(state, proj);
    state.projectiles.push(proj);
    state.play_sound(SoundCue::Swing, 1.0);
}

/// Keep exactly `projectile_count` orbs, evenly spaced and carrying current stats.
///
/// Existing orbs keep their ids and angles; only a count change re-spaces them.
pub fn maintain_orbs(state: &mut WorldState) {
    let want = state.player.projectile_count.max(1) as usize;
    let have = state
        .projectiles
        .iter()
        .filter(|p| matches!(p.behavior, ProjectileBehavior::Orbit { .. }))
        .count();

    let damage = base_damage(state);
    let orbit_radius = ORBIT_RADIUS * state.player.area_mult;
    let orb_radius = ORB_RADIUS * state.player.area_mult;
    let freeze = state.player.freeze_duration;

    if have > want {
        let mut seen = 0;
        state.projectiles.retain(|p| {
            if matches!(p.behavior, ProjectileBehavior::Orbit { .. }) {
                seen += 1;
                seen <= want
            } else {
                true
            }
        });
    } else if have < want {
        let pos = state.player.pos;
        for _ in have..want {
            let id = state.next_entity_id();
            let orb = Projectile::new(
                id,
                pos,
                Vec2::ZERO,
                damage,
                ProjectileBehavior::Orbit {
                    angle: 0.0,
                    radius: orbit_radius,
                    rehit_timer: ORB_REHIT,
                    splash_timer: NOVA_SPLASH_INTERVAL,
                },
            );
            let orb = payload(state, orb);
            state.projectiles.push(orb);
        }
        state.play_sound(SoundCue::OrbSpawn, 1.0);
    }

    let respace = have != want;
    let mut base_angle = None;
    let mut slot = 0;
    let player_pos = state.player.pos;
    for p in state.projectiles.iter_mut() {
        if let ProjectileBehavior::Orbit { angle, radius, .. } = &mut p.behavior {
            p.damage = damage;
            p.radius = orb_radius;
            p.pierce = INFINITE_PIERCE;
            p.freeze = freeze;
            *radius = orbit_radius;
            if respace {
                let start = *base_angle.get_or_insert(*angle);
                *angle = start + slot as f32 * TAU / want as f32;
                p.pos = player_pos + from_angle(*angle) * *radius;
            }
            slot += 1;
        }
    }
}

/// Outbound boomerang with unlimited pierce
pub fn throw_boomerang(state: &mut WorldState, angle: f32) {
    let speed = BASE_BULLET_SPEED * state.player.bullet_speed_mult;
    let damage = base_damage(state);
    let origin = state.player.pos;
    let id = state.next_entity_id();
    let mut proj = Projectile::new(
        id,
        origin,
        from_angle(angle) * speed,
        damage,
        ProjectileBehavior::Boomerang {
            return_speed: 0.0,
            returning: false,
        },
    );
    proj.radius = BOOMERANG_RADIUS * state.player.area_mult;
    proj.pierce = INFINITE_PIERCE;
    let proj = payload(state, proj);
    state.projectiles.push(proj);
    state.play_sound(SoundCue::Throw, 1.0);
}

/// Stationary mine at the player's feet
pub fn drop_mine(state: &mut WorldState) {
    let damage = base_damage(state);
    let pos = state.player.pos;
    let id = state.next_entity_id();
    let mut mine = Projectile::new(
        id,
        pos,
        Vec2::ZERO,
        damage,
        ProjectileBehavior::Mine {
            duration: MINE_DURATION * state.player.duration_mult,
        },
    );
    mine.radius = MINE_RADIUS;
    mine.pierce = 0;
    mine.explode_radius = state.player.blast_radius * state.player.area_mult;
    let mine = payload(state, mine);
    state.projectiles.push(mine);
    state.play_sound(SoundCue::MineDrop, 1.0);
}

/// Static field pulses and drone fire
pub fn update_passives(state: &mut WorldState, dt: f32) {
    let passives = state.player.passives;

    if passives.static_field_interval > 0.0 {
        let timer = state.player.passives.static_field_timer - dt;
        if timer <= 0.0 {
            state.player.passives.static_field_timer = passives.static_field_interval;
            let center = state.player.pos;
            let mut zapped = 0;
            for e in state.enemies.iter_mut() {
                if e.is_dead() {
                    continue;
                }
                if e.pos.distance(center) <= passives.static_field_range + e.radius {
                    e.take_damage(passives.static_field_damage);
                    zapped += 1;
                }
            }
            if zapped > 0 {
                state.play_sound(SoundCue::Zap, 1.0);
            }
            state.spawn_ring(center, 0x60a5fa, passives.static_field_range);
        } else {
            state.player.passives.static_field_timer = timer;
        }
    }

    if passives.drone_count > 0 {
        let timer = state.player.passives.drone_timer - dt;
        if timer > 0.0 {
            state.player.passives.drone_timer = timer;
            return;
        }
        state.player.passives.drone_timer = passives.drone_interval;
        let mut fired = false;
        for k in 0..passives.drone_count {
            let phase = state.time * 2.0 + k as f32 * TAU / passives.drone_count as f32;
            let from = state.player.pos + from_angle(phase) * DRONE_ORBIT;
            let Some((_, target)) = nearest_enemy(state, from, DRONE_RANGE) else {
                continue;
            };
            let dir = (target - from).normalize_or_zero();
            let id = state.next_entity_id();
            let mut shot = Projectile::new(
                id,
                from,
                dir * DRONE_BULLET_SPEED,
                passives.drone_damage,
                ProjectileBehavior::DroneShot,
            );
            shot.radius = BULLET_RADIUS * 0.8;
            shot.color = 0x38bdf8;
            state.projectiles.push(shot);
            fired = true;
        }
        if fired {
            state.play_sound(SoundCue::Drone, 1.0);
        }
    }
}
