//! Enemy behaviour: seek, charger and sniper cycles, boss state machines

use std::f32::consts::TAU;

use glam::Vec2;

use super::collision::{circle_rect_collision, move_circle, out_of_world};
use super::enemies::{self, EnemyKind};
use super::state::{BossMode, Enemy, EnemyBrain, EnemyProjectile, GameEvent, WorldState};
use crate::audio::SoundCue;
use crate::from_angle;

/// Per-tick decay rate of knockback velocity
pub const PUSHBACK_DECAY: f32 = 8.0;
pub const SNIPER_BULLET_RADIUS: f32 = 6.0;
pub const TITAN_BULLET_RADIUS: f32 = 8.0;
/// Titan ring bullets hit for this share of the boss's contact damage
pub const TITAN_BULLET_DAMAGE_MULT: f32 = 0.25;

/// Deferred side effect of one enemy's turn
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    FireAt {
        from: Vec2,
        dir: Vec2,
        damage: f32,
        color: u32,
    },
    Summon {
        at: Vec2,
        count: u32,
    },
    Ring {
        center: Vec2,
        count: u32,
        damage: f32,
        color: u32,
    },
}

/// What an enemy decided this tick
struct Intent {
    vel: Vec2,
    action: Option<Action>,
    enraged_now: bool,
}

/// Update brains, move every live enemy, then drop strays
pub fn update_enemies(state: &mut WorldState, dt: f32) {
    let player_pos = state.player.pos;

    for i in 0..state.enemies.len() {
        if state.enemies[i].is_dead() {
            continue;
        }
        let intent = think(&mut state.enemies[i], player_pos, dt);

        if intent.enraged_now {
            let e = &state.enemies[i];
            let (pos, kind) = (e.pos, e.kind);
            state.spawn_text(pos, "ENRAGED!", 0xef4444, 26.0);
            state.add_shake(20.0);
            log::info!("{} enraged", kind.name());
        }

        move_enemy(state, i, intent.vel * dt, player_pos);
        state.enemies[i].age += dt;

        if let Some(action) = intent.action {
            perform(state, action);
        }
    }

    despawn_strays(state);
}

/// Advance the brain and pick a velocity (knockback included)
fn think(e: &mut Enemy, player_pos: Vec2, dt: f32) -> Intent {
    let to_player = player_pos - e.pos;
    let dist = to_player.length();
    let dir = to_player.normalize_or_zero();
    let slow = if e.frozen_timer > 0.0 {
        enemies::FROZEN_SPEED_MULT
    } else {
        1.0
    };
    let speed = e.speed * slow;
    let mut action = None;
    let mut enraged_now = false;

    if e.is_boss() && !e.is_enraged() && e.hp <= e.max_hp * enemies::ENRAGE_THRESHOLD {
        if let EnemyBrain::Boss {
            enraged,
            special_timer,
            ..
        } = &mut e.brain
        {
            *enraged = true;
            *special_timer = special_timer.min(enemies::special_interval(e.kind, true));
            enraged_now = true;
        }
    }

    let kind = e.kind;
    let vel = match &mut e.brain {
        EnemyBrain::Seek => dir * speed,
        EnemyBrain::Charger { rushing, timer } => {
            *timer -= dt;
            if *timer <= 0.0 {
                *rushing = !*rushing;
                *timer = if *rushing {
                    enemies::CHARGER_RUSH
                } else {
                    enemies::CHARGER_WINDUP
                };
            }
            if *rushing {
                dir * speed
            } else {
                dir * speed * enemies::CHARGER_WINDUP_SPEED
            }
        }
        EnemyBrain::Sniper { attack_timer } => {
            if dist <= enemies::SNIPER_RANGE {
                *attack_timer -= dt;
                if *attack_timer <= 0.0 {
                    *attack_timer = enemies::SNIPER_FIRE_INTERVAL;
                    action = Some(Action::FireAt {
                        from: e.pos,
                        dir,
                        damage: e.damage,
                        color: e.color,
                    });
                }
                Vec2::ZERO
            } else {
                dir * speed
            }
        }
        EnemyBrain::Boss {
            mode,
            action_timer,
            special_timer,
            charge_dir,
            enraged,
        } => match kind {
            EnemyKind::Goliath => match *mode {
                BossMode::Idle => {
                    *special_timer -= dt;
                    if *special_timer <= 0.0 {
                        *mode = BossMode::Charge;
                        *action_timer = enemies::GOLIATH_CHARGE_DURATION;
                        *charge_dir = dir;
                    }
                    dir * speed
                }
                BossMode::Charge => {
                    *action_timer -= dt;
                    if *action_timer <= 0.0 {
                        *mode = BossMode::Idle;
                        *special_timer = enemies::special_interval(kind, *enraged);
                    }
                    *charge_dir * speed * enemies::GOLIATH_CHARGE_SPEED_MULT
                }
            },
            EnemyKind::Swarmer => {
                *special_timer -= dt;
                if *special_timer <= 0.0 {
                    *special_timer = enemies::special_interval(kind, *enraged);
                    action = Some(Action::Summon {
                        at: e.pos,
                        count: enemies::SWARMER_ADDS,
                    });
                }
                if dist < enemies::SWARMER_KEEP_DISTANCE {
                    -dir * speed
                } else {
                    dir * speed
                }
            }
            _ => {
                *special_timer -= dt;
                if *special_timer <= 0.0 {
                    *special_timer = enemies::special_interval(kind, *enraged);
                    let count = if *enraged {
                        enemies::TITAN_RING_COUNT_ENRAGED
                    } else {
                        enemies::TITAN_RING_COUNT
                    };
                    action = Some(Action::Ring {
                        center: e.pos,
                        count,
                        damage: e.damage * TITAN_BULLET_DAMAGE_MULT,
                        color: e.color,
                    });
                }
                dir * speed
            }
        },
    };

    let vel = vel + e.pushback;
    e.pushback *= (1.0 - PUSHBACK_DECAY * dt).max(0.0);

    Intent {
        vel,
        action,
        enraged_now,
    }
}

/// Apply one enemy's displacement with its obstacle rules
fn move_enemy(state: &mut WorldState, i: usize, delta: Vec2, player_pos: Vec2) {
    let kind = state.enemies[i].kind;

    if kind == EnemyKind::Ghost {
        state.enemies[i].pos += delta;
        return;
    }

    if kind.is_boss() {
        state.enemies[i].pos += delta;
        let (pos, radius) = (state.enemies[i].pos, state.enemies[i].radius);
        let smashed: Vec<(u32, Vec2)> = state
            .obstacles
            .iter()
            .filter(|o| circle_rect_collision(pos, radius, o).hit)
            .map(|o| (o.id, o.center()))
            .collect();
        if smashed.is_empty() {
            return;
        }
        state.obstacles.retain(|o| !smashed.iter().any(|(id, _)| *id == o.id));
        for (id, center) in smashed {
            state.push_event(GameEvent::ObstacleDestroyed { id });
            state.spawn_explosion(center, 0x78716c, 25);
            log::debug!("Obstacle {} destroyed by {}", id, kind.name());
        }
        state.play_sound(SoundCue::Explosion, 0.6);
        state.add_shake(20.0);
        return;
    }

    let e = &mut state.enemies[i];
    let result = move_circle(e.pos, delta, e.radius, &state.obstacles);
    e.pos = result.pos;

    // Big bodies wedged against a corner slide sideways instead of stalling
    if matches!(kind, EnemyKind::Elite | EnemyKind::Tank) && result.blocked_x && result.blocked_y {
        let dir = (player_pos - e.pos).normalize_or_zero();
        let nudge = Vec2::new(-dir.y, dir.x) * delta.length().max(1.0);
        e.pos = move_circle(e.pos, nudge, e.radius, &state.obstacles).pos;
    }
}

fn perform(state: &mut WorldState, action: Action) {
    match action {
        Action::FireAt {
            from,
            dir,
            damage,
            color,
        } => {
            let id = state.next_entity_id();
            state.enemy_projectiles.push(EnemyProjectile {
                id,
                pos: from,
                vel: dir * enemies::SNIPER_BULLET_SPEED,
                radius: SNIPER_BULLET_RADIUS,
                damage,
                color,
            });
        }
        Action::Summon { at, count } => {
            let kind = EnemyKind::Fast;
            let scaled = enemies::scale_enemy(kind, state.time);
            for _ in 0..count {
                let offset = from_angle(state.rng.angle()) * state.rng.range(60.0, 120.0);
                let id = state.next_entity_id();
                let mut add =
                    Enemy::new(id, kind, at + offset, scaled.hp, scaled.damage, scaled.speed);
                add.xp_value = scaled.xp_value;
                state.pending_spawns.push(add);
            }
            state.spawn_ring(at, 0xf0abfc, 120.0);
        }
        Action::Ring {
            center,
            count,
            damage,
            color,
        } => {
            for k in 0..count {
                let angle = k as f32 * TAU / count as f32;
                let id = state.next_entity_id();
                state.enemy_projectiles.push(EnemyProjectile {
                    id,
                    pos: center,
                    vel: from_angle(angle) * enemies::TITAN_BULLET_SPEED,
                    radius: TITAN_BULLET_RADIUS,
                    damage,
                    color,
                });
            }
            state.add_shake(8.0);
        }
    }
}

/// Non-boss enemies far outside the world, or old and out of sight, leave without a kill
fn despawn_strays(state: &mut WorldState) {
    let player_pos = state.player.pos;
    let sight = state.view_size.length();
    state.enemies.retain(|e| {
        if e.is_boss() || e.is_dead() {
            return true;
        }
        let lost = out_of_world(e.pos, enemies::ENEMY_BOUNDS_MARGIN);
        let stale = e.age > enemies::ENEMY_MAX_AGE && e.pos.distance(player_pos) > sight;
        !(lost || stale)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Obstacle, ObstacleKind, RunConfig};

    fn bare_state() -> WorldState {
        let mut s = WorldState::new(RunConfig {
            seed: 5,
            ..RunConfig::default()
        });
        s.obstacles.clear();
        s
    }

    fn add(s: &mut WorldState, kind: EnemyKind, offset: Vec2) -> usize {
        let id = s.next_entity_id();
        let pos = s.player.pos + offset;
        s.enemies.push(Enemy::from_table(id, kind, pos));
        s.enemies.len() - 1
    }

    fn boss_timer(e: &Enemy) -> f32 {
        match e.brain {
            EnemyBrain::Boss { special_timer, .. } => special_timer,
            _ => panic!("not a boss"),
        }
    }

    #[test]
    fn test_seek_moves_toward_player() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Basic, Vec2::new(300.0, 0.0));
        update_enemies(&mut s, 0.1);
        let x = s.enemies[0].pos.x - s.player.pos.x;
        assert!((x - (300.0 - 14.0)).abs() < 1e-3);
    }

    #[test]
    fn test_frozen_enemy_is_slower() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Basic, Vec2::new(300.0, 0.0));
        s.enemies[0].frozen_timer = 1.0;
        update_enemies(&mut s, 0.1);
        let moved = 300.0 - (s.enemies[0].pos.x - s.player.pos.x);
        assert!((moved - 14.0 * enemies::FROZEN_SPEED_MULT).abs() < 1e-3);
    }

    #[test]
    fn test_charger_alternates_windup_and_rush() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Charger, Vec2::new(1000.0, 0.0));
        update_enemies(&mut s, 0.1);
        let slow = 1000.0 - (s.enemies[0].pos.x - s.player.pos.x);
        assert!((slow - 350.0 * enemies::CHARGER_WINDUP_SPEED * 0.1).abs() < 1e-2);

        update_enemies(&mut s, enemies::CHARGER_WINDUP);
        assert!(matches!(s.enemies[0].brain, EnemyBrain::Charger { rushing: true, .. }));
    }

    #[test]
    fn test_sniper_holds_range_and_fires() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Sniper, Vec2::new(400.0, 0.0));
        let start = s.enemies[0].pos;
        update_enemies(&mut s, 0.1);
        assert_eq!(s.enemies[0].pos, start);
        assert!(s.enemy_projectiles.is_empty());

        update_enemies(&mut s, enemies::SNIPER_FIRE_INTERVAL);
        assert_eq!(s.enemy_projectiles.len(), 1);
        assert!(s.enemy_projectiles[0].vel.x < 0.0);
    }

    #[test]
    fn test_sniper_closes_in_when_far() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Sniper, Vec2::new(800.0, 0.0));
        let start = s.enemies[0].pos;
        update_enemies(&mut s, 0.1);
        assert!(s.enemies[0].pos.x < start.x);
    }

    #[test]
    fn test_ghost_walks_through_walls() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Ghost, Vec2::new(100.0, 0.0));
        let pos = s.enemies[0].pos;
        s.obstacles.push(Obstacle {
            id: 900,
            pos: pos - Vec2::splat(50.0),
            size: Vec2::splat(100.0),
            kind: ObstacleKind::Wall,
        });
        update_enemies(&mut s, 0.1);
        assert!(s.enemies[0].pos.x < pos.x);
        assert_eq!(s.obstacles.len(), 1);
    }

    #[test]
    fn test_walker_blocked_by_wall() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Basic, Vec2::new(100.0, 0.0));
        let pos = s.enemies[0].pos;
        s.obstacles.push(Obstacle {
            id: 900,
            pos: Vec2::new(pos.x - 12.0 - 20.0, pos.y - 200.0),
            size: Vec2::new(19.0, 400.0),
            kind: ObstacleKind::Wall,
        });
        update_enemies(&mut s, 0.1);
        assert_eq!(s.enemies[0].pos.x, pos.x);
    }

    #[test]
    fn test_boss_smashes_obstacles() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Goliath, Vec2::new(400.0, 0.0));
        let pos = s.enemies[0].pos;
        s.obstacles.push(Obstacle {
            id: 900,
            pos: pos - Vec2::new(100.0, 20.0),
            size: Vec2::splat(40.0),
            kind: ObstacleKind::Ruin,
        });
        update_enemies(&mut s, 0.1);
        assert!(s.obstacles.is_empty());
        assert!(s.events.contains(&GameEvent::ObstacleDestroyed { id: 900 }));
    }

    #[test]
    fn test_boss_enrages_at_half_hp() {
        for kind in [EnemyKind::Goliath, EnemyKind::Swarmer, EnemyKind::Titan] {
            let mut s = bare_state();
            add(&mut s, kind, Vec2::new(600.0, 0.0));
            let max = s.enemies[0].max_hp;
            s.enemies[0].hp = max * 0.5;
            assert!(!s.enemies[0].is_enraged());

            update_enemies(&mut s, 0.016);

            let e = &s.enemies[0];
            assert!(e.is_enraged(), "{:?}", kind);
            assert!(boss_timer(e) <= enemies::special_interval(kind, true));
            assert!(enemies::special_interval(kind, true) < enemies::special_interval(kind, false));
        }
    }

    #[test]
    fn test_boss_above_half_stays_calm() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Titan, Vec2::new(600.0, 0.0));
        let max = s.enemies[0].max_hp;
        s.enemies[0].hp = max * 0.5 + 1.0;
        update_enemies(&mut s, 0.016);
        assert!(!s.enemies[0].is_enraged());
        assert!((boss_timer(&s.enemies[0]) - (enemies::TITAN_RING - 0.016)).abs() < 1e-4);
    }

    #[test]
    fn test_goliath_charges_then_idles() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Goliath, Vec2::new(800.0, 0.0));
        update_enemies(&mut s, enemies::GOLIATH_IDLE);
        assert!(matches!(
            s.enemies[0].brain,
            EnemyBrain::Boss { mode: BossMode::Charge, .. }
        ));
        update_enemies(&mut s, enemies::GOLIATH_CHARGE_DURATION);
        assert!(matches!(
            s.enemies[0].brain,
            EnemyBrain::Boss { mode: BossMode::Idle, .. }
        ));
        assert_eq!(boss_timer(&s.enemies[0]), enemies::GOLIATH_IDLE);
    }

    #[test]
    fn test_swarmer_backs_off_and_summons() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Swarmer, Vec2::new(150.0, 0.0));
        let start = s.enemies[0].pos;
        update_enemies(&mut s, 0.1);
        assert!(s.enemies[0].pos.x > start.x);

        update_enemies(&mut s, enemies::SWARMER_SUMMON);
        assert_eq!(s.pending_spawns.len(), enemies::SWARMER_ADDS as usize);
        assert!(s.pending_spawns.iter().all(|e| e.kind == EnemyKind::Fast));
    }

    #[test]
    fn test_titan_ring_sizes() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Titan, Vec2::new(800.0, 0.0));
        update_enemies(&mut s, enemies::TITAN_RING);
        assert_eq!(s.enemy_projectiles.len(), enemies::TITAN_RING_COUNT as usize);
        let damage = s.enemies[0].damage * TITAN_BULLET_DAMAGE_MULT;
        assert!(s.enemy_projectiles.iter().all(|p| p.damage == damage));

        s.enemy_projectiles.clear();
        let max = s.enemies[0].max_hp;
        s.enemies[0].hp = max * 0.25;
        update_enemies(&mut s, enemies::TITAN_RING_ENRAGED);
        assert_eq!(
            s.enemy_projectiles.len(),
            enemies::TITAN_RING_COUNT_ENRAGED as usize
        );
    }

    #[test]
    fn test_pushback_decays() {
        let mut s = bare_state();
        add(&mut s, EnemyKind::Basic, Vec2::new(300.0, 0.0));
        s.enemies[0].pushback = Vec2::new(100.0, 0.0);
        update_enemies(&mut s, 0.05);
        assert!((s.enemies[0].pushback.x - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_strays_despawn_bosses_stay() {
        let mut s = bare_state();
        let far = Vec2::new(-WORLD_WIDTH, 0.0);
        add(&mut s, EnemyKind::Basic, far);
        add(&mut s, EnemyKind::Goliath, far);
        add(&mut s, EnemyKind::Basic, Vec2::new(1600.0, 0.0));
        s.enemies[2].age = enemies::ENEMY_MAX_AGE + 1.0;
        add(&mut s, EnemyKind::Basic, Vec2::new(300.0, 0.0));
        s.enemies[3].age = enemies::ENEMY_MAX_AGE + 1.0;
        update_enemies(&mut s, 0.016);
        let kinds: Vec<EnemyKind> = s.enemies.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EnemyKind::Goliath, EnemyKind::Basic]);
    }
}
