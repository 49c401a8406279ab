//! Kills, experience, level-ups, upgrade application and loot pickup

use glam::Vec2;

use super::collision::circles_overlap;
use super::enemies::{self, EnemyKind};
use super::state::{
    Enemy, GameEvent, LOOT_MAGNET_SPEED, LootKind, RunPhase, WorldState, max_xp_for_level,
};
use super::stats;
use super::upgrades::{self, CHOICES_PER_LEVEL, UpgradeKind};
use super::weapons::WeaponId;
use crate::audio::SoundCue;
use crate::consts::MAX_WEAPONS;

/// Chance a non-boss kill drops loot instead of paying XP directly
pub const LOOT_DROP_CHANCE: f32 = 0.3;
/// Share of loot drops that are health packs
pub const HEALTH_DROP_CHANCE: f32 = 0.08;
/// Minions left behind by a splitter
pub const SPLITTER_CHILDREN: u32 = 2;

/// Remove dead enemies and apply their on-kill effects exactly once
pub fn reap_dead(state: &mut WorldState) {
    if !state.enemies.iter().any(Enemy::is_dead) {
        return;
    }
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut state.enemies).into_iter().partition(Enemy::is_dead);
    state.enemies = alive;
    for enemy in &dead {
        on_kill(state, enemy);
    }
}

/// Score, rewards and death effects for one kill
pub fn on_kill(state: &mut WorldState, enemy: &Enemy) {
    state.score += enemy.score_value as u64;
    state.kills += 1;
    state.push_event(GameEvent::EnemyKilled {
        kind: enemy.kind,
        pos: enemy.pos,
    });
    state.spawn_explosion(enemy.pos, enemy.color, 10);
    let pitch = state.rng.range(0.8, 1.2);
    state.play_sound(SoundCue::Explosion, pitch);

    if enemy.is_boss() {
        state.push_event(GameEvent::BossDefeated { kind: enemy.kind });
        state.spawn_text(enemy.pos, "BOSS DEFEATED", 0xfbbf24, 32.0);
        state.add_shake(30.0);
        log::info!("{} defeated at {:.0}s", enemy.kind.name(), state.time);
        grant_xp(state, enemy.xp_value as f32);
        return;
    }

    // Either a drop or direct XP, never both
    if state.rng.chance(LOOT_DROP_CHANCE) {
        let kind = if state.rng.chance(HEALTH_DROP_CHANCE) {
            LootKind::HealthPack
        } else {
            LootKind::XpOrb
        };
        state.spawn_loot(enemy.pos, kind);
    } else {
        grant_xp(state, enemy.xp_value as f32);
    }

    if enemy.kind == EnemyKind::Splitter {
        let kind = EnemyKind::Fast;
        let scaled = enemies::scale_enemy(kind, state.time);
        for k in 0..SPLITTER_CHILDREN {
            let side = if k == 0 { -1.0 } else { 1.0 };
            let pos = enemy.pos + Vec2::new(side * enemy.radius, 0.0);
            let id = state.next_entity_id();
            let mut child = Enemy::new(id, kind, pos, scaled.hp, scaled.damage, scaled.speed);
            child.xp_value = scaled.xp_value;
            state.pending_spawns.push(child);
        }
    }
}

/// Add experience, crossing as many level thresholds as it covers.
///
/// Raises one `LevelAvailable` per grant however many levels were gained.
pub fn grant_xp(state: &mut WorldState, amount: f32) {
    if amount <= 0.0 {
        return;
    }
    let player = &mut state.player;
    player.xp += amount;
    let mut gained = 0;
    while player.max_xp > 0.0 && player.xp >= player.max_xp {
        player.xp -= player.max_xp;
        player.level += 1;
        player.max_xp = max_xp_for_level(player.level);
        gained += 1;
    }
    if gained == 0 {
        return;
    }

    let level = state.player.level;
    state.pending_level_ups += gained;
    // Nothing advances until the host applies a choice
    if state.phase == RunPhase::Playing {
        state.phase = RunPhase::LevelUp;
    }
    if state.offered_upgrades.is_empty() {
        state.offered_upgrades =
            upgrades::roll_choices(&state.player, &mut state.rng, CHOICES_PER_LEVEL);
    }
    state.push_event(GameEvent::LevelAvailable { level });
    state.play_sound(SoundCue::LevelUp, 1.0);
    let pos = state.player.pos;
    state.spawn_text(pos, "LEVEL UP!", 0xfacc15, 28.0);
    log::info!("Level {} reached ({} pending)", level, state.pending_level_ups);
}

/// Apply one upgrade choice and resume when no level-ups remain
pub fn apply_upgrade(state: &mut WorldState, kind: UpgradeKind) {
    if state.phase == RunPhase::GameOver {
        log::warn!("Ignoring upgrade {} after game over", kind.as_str());
        return;
    }

    let count = state.player.upgrades.add(kind);
    if kind == UpgradeKind::WeaponSlot {
        grant_weapon(state);
    }
    stats::recalculate(&mut state.player);
    if kind == UpgradeKind::Shield {
        state.player.shield = state.player.max_shield;
    }

    state.push_event(GameEvent::UpgradeApplied { kind });
    state.play_sound(SoundCue::LevelUp, 1.5);
    log::info!("Upgrade {} (x{})", kind.as_str(), count);

    if state.pending_level_ups == 0 {
        return;
    }
    state.pending_level_ups -= 1;
    if state.pending_level_ups > 0 {
        state.offered_upgrades =
            upgrades::roll_choices(&state.player, &mut state.rng, CHOICES_PER_LEVEL);
        let level = state.player.level;
        state.push_event(GameEvent::LevelAvailable { level });
    } else {
        state.offered_upgrades.clear();
        if state.phase == RunPhase::LevelUp {
            state.phase = RunPhase::Playing;
        }
    }
}

/// New random unowned weapon, or a permanent damage bonus once the slots are full
fn grant_weapon(state: &mut WorldState) {
    let unowned: Vec<WeaponId> = WeaponId::ALL
        .iter()
        .copied()
        .filter(|w| !state.player.inventory.contains(w))
        .collect();
    let pos = state.player.pos;

    if state.player.inventory.len() < MAX_WEAPONS && !unowned.is_empty() {
        let weapon = unowned[state.rng.index(unowned.len())];
        state.player.inventory.push(weapon);
        state.push_event(GameEvent::WeaponGranted { weapon });
        state.spawn_text(pos, format!("NEW WEAPON: {}", weapon.name()), 0x22d3ee, 24.0);
        log::info!("Weapon granted: {}", weapon.as_str());
    } else {
        state.player.surplus_damage_stacks += 1;
        state.spawn_text(pos, "DAMAGE UP", 0xf97316, 24.0);
    }
}

/// Cycle to the next owned weapon; false when not playing or only one is owned
pub fn switch_active_weapon(state: &mut WorldState) -> bool {
    if state.phase != RunPhase::Playing {
        return false;
    }
    let len = state.player.inventory.len();
    if len <= 1 {
        log::warn!("Weapon switch ignored: only one weapon owned");
        return false;
    }
    state.player.active_weapon = (state.player.active_weapon + 1) % len;
    state.player.fire_timer = 0.0;
    stats::recalculate(&mut state.player);
    state.play_sound(SoundCue::Switch, 1.0);
    let weapon = state.player.weapon();
    let pos = state.player.pos;
    state.spawn_text(pos, weapon.name(), 0xffffff, 18.0);
    true
}

/// Magnet pull, pickup on contact, expiry
pub fn update_loot(state: &mut WorldState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let magnet = state.player.magnet_radius;
    let mut picked = Vec::new();

    state.loot.retain_mut(|l| {
        l.life -= dt;
        if l.life <= 0.0 {
            return false;
        }
        let dist = l.pos.distance(player_pos);
        if dist <= magnet && dist > 0.0 {
            l.pos += (player_pos - l.pos) / dist * (LOOT_MAGNET_SPEED * dt).min(dist);
        }
        if circles_overlap(l.pos, l.radius, player_pos, player_radius) {
            picked.push((l.kind, l.value));
            return false;
        }
        true
    });

    for (kind, value) in picked {
        match kind {
            LootKind::XpOrb => {
                state.play_sound(SoundCue::PickupXp, 1.0);
                grant_xp(state, value);
            }
            LootKind::HealthPack => {
                let player = &mut state.player;
                player.hp = (player.hp + value).min(player.max_hp);
                state.play_sound(SoundCue::PickupHealth, 1.0);
                state.spawn_text(player_pos, format!("+{}", value.round()), 0x22c55e, 20.0);
            }
        }
    }
}
