//! Host-facing game facade
//!
//! Owns the world, the latest input and the host. Each call that can change the world
//! drains its events afterwards and forwards them to the host in order.

use glam::Vec2;

use crate::highscores::ScoreEntry;
use crate::host::{Host, UiSummary, UiSyncThrottle};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, RunConfig, RunPhase, TickInput, WorldState};
use crate::sim::upgrades::UpgradeKind;
use crate::sim::weapons::WeaponId;
use crate::sim::{self, ability, progression};

pub struct Game<H: Host> {
    world: WorldState,
    input: TickInput,
    host: H,
    throttle: UiSyncThrottle,
}

impl<H: Host> Game<H> {
    /// Create a game and start its first run
    pub fn new(host: H, config: RunConfig) -> Self {
        let world = WorldState::new(config);
        log_run_start(&world);
        Self {
            input: fresh_input(&world),
            world,
            host,
            throttle: UiSyncThrottle::default(),
        }
    }

    pub fn with_settings(host: H, settings: &Settings, seed: u64, weapon: WeaponId) -> Self {
        let mut game = Self::new(host, settings.to_run_config(seed, weapon));
        game.throttle = UiSyncThrottle::new(settings.ui_sync_interval);
        game
    }

    /// Throw away the current run and start a fresh one
    pub fn start_run(&mut self, config: RunConfig) {
        self.world = WorldState::new(config);
        self.input = fresh_input(&self.world);
        self.throttle.force();
        log_run_start(&self.world);
    }

    /// Same settings, new seed and weapon
    pub fn restart(&mut self, seed: u64, weapon: WeaponId) {
        let config = RunConfig {
            seed,
            starting_weapon: weapon,
            ..self.world.config
        };
        self.start_run(config);
    }

    /// Advance one host frame, then notify the host
    pub fn tick(&mut self, elapsed_ms: f32) {
        sim::tick(&mut self.world, &self.input, elapsed_ms);
        self.dispatch_events();
        self.host.render(&self.world);

        let real_dt = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0) / 1000.0
        } else {
            0.0
        };
        if self.throttle.ready(real_dt) {
            let summary = UiSummary::from_world(&self.world);
            self.host.request_ui_sync(&summary);
        }
    }

    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    pub fn set_movement(&mut self, movement: Vec2) {
        self.input.movement = movement;
    }

    pub fn set_aim_target(&mut self, target: Vec2) {
        self.input.aim_target = target;
    }

    pub fn set_fire_held(&mut self, held: bool) {
        self.input.fire_held = held;
    }

    pub fn apply_upgrade(&mut self, kind: UpgradeKind) {
        progression::apply_upgrade(&mut self.world, kind);
        self.throttle.force();
        self.dispatch_events();
    }

    /// Apply an upgrade by its string id; unknown ids are ignored
    pub fn apply_upgrade_by_id(&mut self, id: &str) -> bool {
        match UpgradeKind::from_str(id) {
            Some(kind) => {
                self.apply_upgrade(kind);
                true
            }
            None => {
                log::warn!("Unknown upgrade id '{}'", id);
                false
            }
        }
    }

    pub fn switch_active_weapon(&mut self) -> bool {
        let switched = progression::switch_active_weapon(&mut self.world);
        self.dispatch_events();
        switched
    }

    pub fn trigger_ability(&mut self) -> bool {
        let fired = ability::trigger_ability(&mut self.world);
        self.dispatch_events();
        fired
    }

    /// Pause or resume; ignored during level-up and after game over
    pub fn set_paused(&mut self, paused: bool) {
        match (self.world.phase, paused) {
            (RunPhase::Playing, true) => self.world.phase = RunPhase::Paused,
            (RunPhase::Paused, false) => self.world.phase = RunPhase::Playing,
            _ => return,
        }
        log::debug!("Paused: {}", paused);
    }

    pub fn summary(&self) -> UiSummary {
        UiSummary::from_world(&self.world)
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn phase(&self) -> RunPhase {
        self.world.phase
    }

    pub fn upgrade_choices(&self) -> &[UpgradeKind] {
        &self.world.offered_upgrades
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn dispatch_events(&mut self) {
        for event in self.world.drain_events() {
            self.host.on_event(&event);
            match event {
                GameEvent::Sound { cue, pitch } => self.host.play_sound(cue, pitch),
                GameEvent::LevelAvailable { level } => {
                    self.host.on_level_available(level, &self.world.offered_upgrades);
                    self.throttle.force();
                }
                GameEvent::PlayerDied => {
                    let entry = ScoreEntry::from_world(&self.world);
                    self.host.persist_score_entry(&entry);
                    self.host.on_player_died(&entry);
                    self.throttle.force();
                }
                _ => {}
            }
        }
    }
}

/// Idle input aiming just ahead of the player
fn fresh_input(world: &WorldState) -> TickInput {
    TickInput {
        aim_target: world.player.pos + Vec2::X,
        ..TickInput::default()
    }
}

fn log_run_start(world: &WorldState) {
    log::info!(
        "Run started: seed {}, weapon {}, {} obstacles",
        world.config.seed,
        world.config.starting_weapon.as_str(),
        world.obstacles.len()
    );
}
