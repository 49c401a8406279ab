//! Enemy, boss and supply-drop spawning; stage selection; obstacle layout

use glam::Vec2;

use super::collision::{circle_rect_collision, overlaps_any};
use super::enemies::{self, EnemyKind};
use super::rng::SimRng;
use super::state::{Enemy, GameEvent, LootKind, Obstacle, ObstacleKind, WorldState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Live enemy cap before the stage density multiplier
pub const MAX_ENEMIES: f32 = 150.0;
/// Distance outside the visible area new enemies appear at
pub const SPAWN_MARGIN: f32 = 60.0;
/// Attempts to find an obstacle-free spawn point
pub const SPAWN_RETRIES: u32 = 10;
/// Seconds between supply drops
pub const SUPPLY_DROP_INTERVAL: f32 = 20.0;

/// Seconds between ordinary spawns (never below 150 ms)
pub fn spawn_interval(difficulty: f32, kills: u32) -> f32 {
    let ms = 800.0 - difficulty * 100.0 - kills.min(2000) as f32 * 0.1;
    ms.max(150.0) / 1000.0
}

/// Live enemy cap for the current stage
pub fn enemy_cap(state: &WorldState) -> usize {
    (MAX_ENEMIES * state.stage().density_mult) as usize
}

/// Lay out obstacles: fixed count, no overlaps, clear of the start safe zone
pub fn generate_obstacles(rng: &mut SimRng, safe_center: Vec2, next_id: &mut u32) -> Vec<Obstacle> {
    const MARGIN: f32 = 100.0;
    const GAP: f32 = 40.0;
    const MAX_ATTEMPTS: u32 = 200;

    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(OBSTACLE_COUNT);
    let mut attempts = 0;
    while obstacles.len() < OBSTACLE_COUNT && attempts < MAX_ATTEMPTS * OBSTACLE_COUNT as u32 {
        attempts += 1;
        let size = Vec2::new(rng.range(80.0, 240.0), rng.range(80.0, 240.0));
        let pos = Vec2::new(
            rng.range(MARGIN, WORLD_WIDTH - MARGIN - size.x),
            rng.range(MARGIN, WORLD_HEIGHT - MARGIN - size.y),
        );
        let kind = if rng.chance(0.5) {
            ObstacleKind::Wall
        } else {
            ObstacleKind::Ruin
        };
        let candidate = Obstacle {
            id: 0,
            pos,
            size,
            kind,
        };

        if circle_rect_collision(safe_center, SAFE_ZONE_RADIUS, &candidate).hit {
            continue;
        }
        let overlaps = obstacles.iter().any(|o| {
            pos.x < o.pos.x + o.size.x + GAP
                && pos.x + size.x + GAP > o.pos.x
                && pos.y < o.pos.y + o.size.y + GAP
                && pos.y + size.y + GAP > o.pos.y
        });
        if overlaps {
            continue;
        }

        let id = *next_id;
        *next_id += 1;
        obstacles.push(Obstacle { id, ..candidate });
    }
    if obstacles.len() < OBSTACLE_COUNT {
        log::warn!(
            "Placed only {} of {} obstacles",
            obstacles.len(),
            OBSTACLE_COUNT
        );
    }
    obstacles
}

/// Point just outside a random edge of the visible area
fn edge_point(state: &mut WorldState) -> Vec2 {
    let cam = state.camera;
    let view = state.view_size;
    match state.rng.index(4) {
        0 => Vec2::new(cam.x + state.rng.range(0.0, view.x), cam.y - SPAWN_MARGIN),
        1 => Vec2::new(cam.x + view.x + SPAWN_MARGIN, cam.y + state.rng.range(0.0, view.y)),
        2 => Vec2::new(cam.x + state.rng.range(0.0, view.x), cam.y + view.y + SPAWN_MARGIN),
        _ => Vec2::new(cam.x - SPAWN_MARGIN, cam.y + state.rng.range(0.0, view.y)),
    }
}

/// Spawn point for an enemy, retried to avoid obstacles unless the type ignores them
pub fn spawn_position(state: &mut WorldState, kind: EnemyKind) -> Vec2 {
    let radius = kind.config().radius;
    let mut pos = edge_point(state);
    if kind.ignores_obstacles() {
        return pos;
    }
    for _ in 1..SPAWN_RETRIES {
        if !overlaps_any(pos, radius, &state.obstacles) {
            return pos;
        }
        pos = edge_point(state);
    }
    log::debug!("No clear spawn point for {:?} after {} tries", kind, SPAWN_RETRIES);
    pos
}

/// Create one ordinary enemy scaled to the current time
pub fn spawn_enemy(state: &mut WorldState) {
    let roll = state.rng.unit();
    let kind = enemies::pick_enemy_kind(roll, state.time);
    let pos = spawn_position(state, kind);
    let scaled = enemies::scale_enemy(kind, state.time);
    let id = state.next_entity_id();
    let mut enemy = Enemy::new(id, kind, pos, scaled.hp, scaled.damage, scaled.speed);
    enemy.xp_value = scaled.xp_value;
    state.enemies.push(enemy);
}

/// Ordinary spawn countdown
pub fn update_spawns(state: &mut WorldState, dt: f32) {
    state.spawn_timer = (state.spawn_timer - dt).max(0.0);
    if state.spawn_timer > 0.0 {
        return;
    }
    state.spawn_timer = spawn_interval(state.difficulty(), state.kills);
    if state.enemies.len() < enemy_cap(state) {
        spawn_enemy(state);
    }
}

/// Boss schedule: warn when the threshold passes, spawn after the lead time
pub fn update_bosses(state: &mut WorldState, dt: f32) {
    if let Some(remaining) = state.boss_warning {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            state.boss_warning = None;
            spawn_boss_wave(state);
        } else {
            state.boss_warning = Some(remaining);
        }
        return;
    }

    if state.time >= state.next_boss_time {
        let kind = state.stage().boss;
        let count = enemies::boss_wave_size(state.boss_waves);
        state.next_boss_time += enemies::BOSS_WAVE_INTERVAL;
        state.boss_warning = Some(enemies::BOSS_WARNING_LEAD);
        state.push_event(GameEvent::BossWarning { kind, count });
        state.play_sound(SoundCue::BossWarning, 1.0);
        let pos = state.player.pos;
        state.spawn_text(pos, "WARNING: BOSS APPROACHING", 0xef4444, 30.0);
        log::info!("Boss warning: {} x{} at {:.0}s", kind.name(), count, state.time);
    }
}

/// Ring of bosses around the player
pub fn spawn_boss_wave(state: &mut WorldState) {
    let kind = state.stage().boss;
    let count = enemies::boss_wave_size(state.boss_waves);
    let (hp, damage) = enemies::scale_boss(kind, state.time, state.kills);
    let speed = kind.config().base_speed;
    let start = state.rng.angle();
    for i in 0..count {
        let angle = start + i as f32 * std::f32::consts::TAU / count as f32;
        let pos = state.player.pos + crate::from_angle(angle) * enemies::BOSS_RING_RADIUS;
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, pos, hp, damage, speed));
        state.push_event(GameEvent::BossSpawned { kind });
    }
    state.boss_waves += 1;
    state.add_shake(30.0);
    log::info!("Boss wave {}: {} x{} (hp {:.0})", state.boss_waves, kind.name(), count, hp);
}

/// Stage follows cumulative kills
pub fn update_stage(state: &mut WorldState) {
    let stage = enemies::stage_for_kills(state.kills);
    if stage.index == state.stage_index {
        return;
    }
    state.stage_index = stage.index;
    state.push_event(GameEvent::StageChanged {
        index: stage.index,
        name: stage.name,
    });
    let pos = state.player.pos;
    state.spawn_text(pos, format!("ENTERING {}", stage.name), 0xffffff, 28.0);
    log::info!("Stage {}: {}", stage.index, stage.name);
}

/// Health pack and XP orb inside the visible area every few seconds
pub fn update_supply_drop(state: &mut WorldState, dt: f32) {
    state.supply_timer += dt;
    if state.supply_timer < SUPPLY_DROP_INTERVAL {
        return;
    }
    state.supply_timer = 0.0;
    for kind in [LootKind::HealthPack, LootKind::XpOrb] {
        let pos = state.camera
            + Vec2::new(
                state.rng.range(50.0, state.view_size.x - 50.0),
                state.rng.range(50.0, state.view_size.y - 50.0),
            );
        state.spawn_loot(pos, kind);
    }
    let pos = state.player.pos;
    state.spawn_text(pos, "SUPPLY DROP", 0xffffff, 20.0);
    state.push_event(GameEvent::SupplyDrop);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RunConfig;

    fn state() -> WorldState {
        WorldState::new(RunConfig {
            seed: 42,
            ..RunConfig::default()
        })
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert!((spawn_interval(1.0, 0) - 0.7).abs() < 1e-6);
        assert_eq!(spawn_interval(50.0, 5000), 0.15);
    }

    #[test]
    fn test_obstacles_clear_of_safe_zone() {
        let s = state();
        for o in &s.obstacles {
            assert!(!circle_rect_collision(s.player.pos, SAFE_ZONE_RADIUS, o).hit);
        }
    }

    #[test]
    fn test_spawned_enemy_outside_view() {
        let mut s = state();
        spawn_enemy(&mut s);
        let e = &s.enemies[0];
        let inside = e.pos.x > s.camera.x
            && e.pos.x < s.camera.x + s.view_size.x
            && e.pos.y > s.camera.y
            && e.pos.y < s.camera.y + s.view_size.y;
        assert!(!inside);
        assert_eq!(e.kind, EnemyKind::Basic);
    }

    #[test]
    fn test_spawn_blocked_at_cap() {
        let mut s = state();
        for _ in 0..enemy_cap(&s) {
            spawn_enemy(&mut s);
        }
        let before = s.enemies.len();
        s.spawn_timer = 0.0;
        update_spawns(&mut s, 0.016);
        assert_eq!(s.enemies.len(), before);
    }

    #[test]
    fn test_boss_warning_precedes_spawn() {
        let mut s = state();
        s.time = enemies::BOSS_FIRST_WAVE;
        update_bosses(&mut s, 0.016);
        assert!(s.enemies.is_empty());
        assert!(s
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BossWarning { kind: EnemyKind::Goliath, count: 1 })));
        assert_eq!(s.next_boss_time, enemies::BOSS_FIRST_WAVE + enemies::BOSS_WAVE_INTERVAL);

        update_bosses(&mut s, enemies::BOSS_WARNING_LEAD + 0.1);
        assert_eq!(s.enemies.len(), 1);
        assert!(s.enemies[0].is_boss());
        let d = s.enemies[0].pos.distance(s.player.pos);
        assert!((d - enemies::BOSS_RING_RADIUS).abs() < 0.5);
        assert_eq!(s.boss_waves, 1);
    }

    #[test]
    fn test_stage_change_event() {
        let mut s = state();
        s.kills = 400;
        update_stage(&mut s);
        assert_eq!(s.stage().name, "RUST SECTOR");
        assert!(s
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::StageChanged { index: 1, .. })));
    }

    #[test]
    fn test_supply_drop() {
        let mut s = state();
        update_supply_drop(&mut s, SUPPLY_DROP_INTERVAL);
        assert_eq!(s.loot.len(), 2);
        assert!(s.events.contains(&GameEvent::SupplyDrop));
    }
}
