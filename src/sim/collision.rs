//! Movement and collision resolution
//!
//! Circles (player, enemies, projectiles) against axis-aligned obstacle rectangles,
//! circle-circle overlap for damage, and the shield-then-hp damage pipeline.

use glam::Vec2;

use super::enemies::{EXPLODER_DAMAGE_MULT, EnemyKind};
use super::state::{GameEvent, Obstacle, WorldState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Result of a circle-vs-rectangle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle
    pub point: Vec2,
    /// Direction from the contact point toward the circle center
    pub normal: Vec2,
    /// Penetration depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle vs AABB: clamp the center to the rectangle and compare distance to radius
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Obstacle) -> CollisionResult {
    let point = rect.clamp_point(center);
    let offset = center - point;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }
    let dist = dist_sq.sqrt();
    CollisionResult {
        hit: true,
        point,
        normal: offset.normalize_or_zero(),
        penetration: radius - dist,
    }
}

/// Whether a circle at `center` overlaps any obstacle
pub fn overlaps_any(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| circle_rect_collision(center, radius, o).hit)
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Outcome of an axis-separated move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Move a circle by `delta`, accepting each axis independently unless it
/// would overlap an obstacle (lets movers slide along walls)
pub fn move_circle(pos: Vec2, delta: Vec2, radius: f32, obstacles: &[Obstacle]) -> MoveResult {
    let mut result = MoveResult {
        pos,
        blocked_x: false,
        blocked_y: false,
    };

    if delta.x != 0.0 {
        let candidate = Vec2::new(pos.x + delta.x, pos.y);
        if overlaps_any(candidate, radius, obstacles) {
            result.blocked_x = true;
        } else {
            result.pos.x = candidate.x;
        }
    }

    if delta.y != 0.0 {
        let candidate = Vec2::new(result.pos.x, pos.y + delta.y);
        if overlaps_any(candidate, radius, obstacles) {
            result.blocked_y = true;
        } else {
            result.pos.y = candidate.y;
        }
    }

    result
}

/// Keep a circle fully inside the world
pub fn clamp_to_world(pos: Vec2, radius: f32) -> Vec2 {
    pos.clamp(
        Vec2::splat(radius),
        Vec2::new(WORLD_WIDTH - radius, WORLD_HEIGHT - radius),
    )
}

/// Whether a point is outside the world by more than `margin`
pub fn out_of_world(pos: Vec2, margin: f32) -> bool {
    pos.x < -margin
        || pos.y < -margin
        || pos.x > WORLD_WIDTH + margin
        || pos.y > WORLD_HEIGHT + margin
}

/// Damage the player through shield first, then hp.
///
/// Returns false (and does nothing) while the invulnerability window is open.
pub fn damage_player(state: &mut WorldState, amount: f32) -> bool {
    let player = &mut state.player;
    if player.invuln_timer > 0.0 || amount <= 0.0 {
        return false;
    }

    let absorbed = player.shield.min(amount);
    player.shield -= absorbed;
    let through = amount - absorbed;
    player.hp = (player.hp - through).clamp(0.0, player.max_hp);
    player.shield_regen_timer = player.shield_regen_delay;
    player.invuln_timer = INVULN_DURATION;
    let pos = player.pos;

    if absorbed > 0.0 {
        state.spawn_text(pos, "ABSORB", 0x3b82f6, 14.0);
    }
    if through > 0.0 {
        state.spawn_text(pos, format!("-{}", through.round()), 0xef4444, 20.0);
        state.play_sound(SoundCue::Hit, 1.0);
    }
    state.push_event(GameEvent::PlayerDamaged { amount: through, absorbed });
    state.spawn_explosion(pos, 0xef4444, 5);
    state.add_shake(15.0);
    true
}

/// Player-vs-enemy contact: damage the player, reflect thorns, detonate exploders
pub fn resolve_contacts(state: &mut WorldState) {
    for i in 0..state.enemies.len() {
        let (pos, radius, damage, kind, dead) = {
            let e = &state.enemies[i];
            (e.pos, e.radius, e.damage, e.kind, e.is_dead())
        };
        if dead || !circles_overlap(state.player.pos, state.player.radius, pos, radius) {
            continue;
        }

        if kind == EnemyKind::Exploder {
            // Detonates on touch; thorns never get a chance to pop it first
            damage_player(state, damage * EXPLODER_DAMAGE_MULT);
            state.enemies[i].hp = 0.0;
            state.spawn_explosion(pos, 0xe11d48, 20);
            state.play_sound(SoundCue::Explosion, 1.0);
            state.add_shake(20.0);
            continue;
        }

        if !damage_player(state, damage) {
            continue;
        }

        let thorns = state.player.thorns;
        if thorns > 0.0 {
            state.enemies[i].take_damage(thorns);
            state.spawn_text(pos, format!("{}", thorns.round()), 0xa8a29e, 14.0);
            state.spawn_explosion(pos, 0xa8a29e, 3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, ObstacleKind, RunConfig};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Obstacle {
        Obstacle {
            id: 1,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            kind: ObstacleKind::Wall,
        }
    }

    fn bare_state() -> WorldState {
        let mut state = WorldState::new(RunConfig::default());
        state.obstacles.clear();
        state
    }

    #[test]
    fn test_circle_rect_hit_and_miss() {
        let r = rect(100.0, 100.0, 50.0, 50.0);
        assert!(circle_rect_collision(Vec2::new(95.0, 120.0), 10.0, &r).hit);
        assert!(!circle_rect_collision(Vec2::new(80.0, 120.0), 10.0, &r).hit);
        let corner = circle_rect_collision(Vec2::new(95.0, 95.0), 10.0, &r);
        assert!(corner.hit);
        assert!(corner.normal.x < 0.0 && corner.normal.y < 0.0);
    }

    #[test]
    fn test_slide_along_wall() {
        let wall = rect(100.0, 0.0, 20.0, 500.0);
        let result = move_circle(Vec2::new(85.0, 200.0), Vec2::new(10.0, 10.0), 10.0, &[wall]);
        assert!(result.blocked_x);
        assert!(!result.blocked_y);
        assert_eq!(result.pos, Vec2::new(85.0, 210.0));
    }

    #[test]
    fn test_clamp_to_world() {
        let p = clamp_to_world(Vec2::new(-50.0, WORLD_HEIGHT + 50.0), 16.0);
        assert_eq!(p, Vec2::new(16.0, WORLD_HEIGHT - 16.0));
    }

    #[test]
    fn test_shield_absorbs_before_hp() {
        let mut state = bare_state();
        state.player.max_shield = 50.0;
        state.player.shield = 20.0;
        let hp = state.player.hp;
        assert!(damage_player(&mut state, 30.0));
        assert_eq!(state.player.shield, 0.0);
        assert_eq!(state.player.hp, hp - 10.0);
        assert_eq!(state.player.shield_regen_timer, SHIELD_REGEN_DELAY);
    }

    #[test]
    fn test_invulnerability_blocks_second_hit() {
        let mut state = bare_state();
        let hp = state.player.hp;
        assert!(damage_player(&mut state, 5.0));
        assert!(!damage_player(&mut state, 5.0));
        assert_eq!(state.player.hp, hp - 5.0);
    }

    #[test]
    fn test_contact_damage_then_thorns() {
        let mut state = bare_state();
        state.player.thorns = 30.0;
        let hp = state.player.hp;
        let id = state.next_entity_id();
        let pos = state.player.pos + Vec2::new(state.player.radius + 5.0, 0.0);
        let enemy = Enemy::from_table(id, EnemyKind::Basic, pos);
        let (enemy_damage, enemy_hp) = (enemy.damage, enemy.hp);
        state.enemies.push(enemy);

        resolve_contacts(&mut state);

        assert_eq!(state.player.hp, hp - enemy_damage);
        assert_eq!(state.enemies[0].hp, enemy_hp - 30.0);
        let damaged_at = state
            .events
            .iter()
            .position(|e| matches!(e, GameEvent::PlayerDamaged { .. }));
        assert!(damaged_at.is_some());
    }

    #[test]
    fn test_exploder_detonates_without_thorns() {
        let mut state = bare_state();
        state.player.thorns = 10_000.0;
        let hp = state.player.hp;
        let id = state.next_entity_id();
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        let enemy = Enemy::from_table(id, EnemyKind::Exploder, pos);
        let damage = enemy.damage;
        state.enemies.push(enemy);

        resolve_contacts(&mut state);

        assert!(state.enemies[0].is_dead());
        assert_eq!(state.player.hp, hp - damage * EXPLODER_DAMAGE_MULT);
    }
}
