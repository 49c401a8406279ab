//! Neon Survivor headless runner
//!
//! Plays one seeded run with an autopilot standing in for the player, logs what happens
//! and records the result on a JSON leaderboard.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use glam::Vec2;

use neon_survivor::audio::{AudioMixer, SoundCue};
use neon_survivor::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use neon_survivor::highscores::format_time;
use neon_survivor::sim::{GameEvent, RunPhase, TickInput, UpgradeKind, WeaponId, WorldState};
use neon_survivor::{Game, HighScores, Host, InputMode, ScoreEntry, Settings, UiSummary};

/// Enemies within this distance push the autopilot away
const THREAT_RADIUS: f32 = 350.0;
/// Shockwave once this many enemies are inside its range
const ABILITY_CROWD: usize = 4;
/// Seconds between autopilot weapon swaps
const SWITCH_INTERVAL: f32 = 45.0;

#[derive(Parser)]
#[command(author, version, about = "Neon Survivor headless runner", long_about = None)]
struct Args {
    /// Run seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Starting weapon id
    #[arg(short, long, default_value = "standard")]
    weapon: String,

    /// Longest run to simulate, in seconds
    #[arg(long, default_value_t = 300.0)]
    seconds: f32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Leaderboard JSON file (created if missing)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Play with touch controls (forced auto-aim)
    #[arg(long, default_value_t = false)]
    touch: bool,
}

/// Host that logs instead of drawing
struct HeadlessHost {
    mixer: AudioMixer,
    scores: HighScores,
    voices: u64,
    silenced: u64,
}

impl HeadlessHost {
    fn new(mixer: AudioMixer, scores: HighScores) -> Self {
        Self {
            mixer,
            scores,
            voices: 0,
            silenced: 0,
        }
    }
}

impl Host for HeadlessHost {
    fn play_sound(&mut self, cue: SoundCue, pitch: f32) {
        match self.mixer.voice(cue, pitch) {
            Some(_) => self.voices += 1,
            None => self.silenced += 1,
        }
    }

    fn on_level_available(&mut self, level: u32, choices: &[UpgradeKind]) {
        let names: Vec<&str> = choices.iter().map(|c| c.name()).collect();
        log::info!("Level {} choices: {}", level, names.join(", "));
    }

    fn on_player_died(&mut self, entry: &ScoreEntry) {
        log::info!(
            "Player died after {} with {} kills",
            format_time(entry.time_alive),
            entry.kills
        );
    }

    fn persist_score_entry(&mut self, entry: &ScoreEntry) {
        match self.scores.add_entry(entry.clone()) {
            Some(rank) => log::info!("New high score #{}: {}", rank, entry.score),
            None => log::info!("Score {} did not make the leaderboard", entry.score),
        }
    }

    fn request_ui_sync(&mut self, summary: &UiSummary) {
        log::debug!(
            "[{}] {} hp {:.0}/{:.0} lvl {} score {} kills {}",
            format_time(summary.time_alive),
            summary.stage_name,
            summary.hp,
            summary.max_hp,
            summary.level,
            summary.score,
            summary.kills
        );
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound { .. } | GameEvent::EnemyKilled { .. } => {}
            GameEvent::PlayerDamaged { amount, absorbed } => {
                log::trace!("Hit for {:.1} ({:.1} absorbed)", amount, absorbed)
            }
            other => log::debug!("{:?}", other),
        }
    }
}

/// Steer away from nearby threats, collect loot when calm, aim at the closest enemy
fn autopilot(world: &WorldState) -> TickInput {
    let pos = world.player.pos;
    let mut push = Vec2::ZERO;
    let mut nearest: Option<(f32, Vec2)> = None;

    for e in &world.enemies {
        let offset = pos - e.pos;
        let dist = offset.length();
        if dist < THREAT_RADIUS && dist > 0.0 {
            push += offset / (dist * dist) * e.radius;
        }
        if nearest.is_none_or(|(d, _)| dist < d) {
            nearest = Some((dist, e.pos));
        }
    }
    for b in &world.enemy_projectiles {
        let offset = pos - b.pos;
        let dist = offset.length();
        if dist < THREAT_RADIUS * 0.5 && dist > 0.0 {
            push += offset / (dist * dist) * b.radius * 2.0;
        }
    }

    let center = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) * 0.5;
    let mut movement = push.normalize_or_zero();
    if push.length() < 0.05 {
        let loot = world
            .loot
            .iter()
            .min_by(|a, b| a.pos.distance(pos).total_cmp(&b.pos.distance(pos)));
        movement = match loot {
            Some(l) => (l.pos - pos).normalize_or_zero(),
            None => Vec2::ZERO,
        };
    }
    // Stay away from the walls
    movement += (center - pos) / WORLD_WIDTH;

    TickInput {
        movement: movement.clamp_length_max(1.0),
        aim_target: nearest.map(|(_, p)| p).unwrap_or(pos + Vec2::X),
        fire_held: true,
    }
}

fn pick_upgrade(choices: &[UpgradeKind]) -> Option<UpgradeKind> {
    choices
        .iter()
        .copied()
        .max_by_key(|c| (c.is_evolution(), c.rarity()))
}

fn crowd_size(world: &WorldState) -> usize {
    let p = &world.player;
    world
        .enemies
        .iter()
        .filter(|e| e.pos.distance(p.pos) <= p.ability_range + e.radius)
        .count()
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    match fs::read_to_string(path) {
        Ok(json) => match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                log::warn!("Invalid settings in {} ({}), using defaults", path.display(), e);
                Ok(Settings::default())
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No settings at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(e) => Err(e).with_context(|| format!("reading settings from {}", path.display())),
    }
}

fn load_scores(path: Option<&Path>) -> Result<HighScores> {
    let Some(path) = path else {
        return Ok(HighScores::new());
    };
    match fs::read_to_string(path) {
        Ok(json) => match HighScores::from_json(&json) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Err(e) => {
                log::warn!("Invalid leaderboard in {} ({}), starting fresh", path.display(), e);
                Ok(HighScores::new())
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No high scores found, starting fresh");
            Ok(HighScores::new())
        }
        Err(e) => Err(e).with_context(|| format!("reading leaderboard from {}", path.display())),
    }
}

fn save_scores(path: &Path, scores: &HighScores) -> Result<()> {
    let json = scores.to_json().context("serializing leaderboard")?;
    fs::write(path, json).with_context(|| format!("writing leaderboard to {}", path.display()))?;
    log::info!("High scores saved ({} entries)", scores.entries.len());
    Ok(())
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    ensure!(args.fps > 0.0 && args.fps.is_finite(), "--fps must be positive");
    ensure!(args.seconds >= 0.0, "--seconds must not be negative");
    let weapon = WeaponId::from_str(&args.weapon).with_context(|| {
        let known: Vec<&str> = WeaponId::ALL.iter().map(|w| w.as_str()).collect();
        format!("unknown weapon '{}' (expected one of: {})", args.weapon, known.join(", "))
    })?;

    let mut settings = load_settings(args.settings.as_deref())?;
    if args.touch {
        settings.input_mode = InputMode::Touch;
    }
    let scores = load_scores(args.scores.as_deref())?;
    let seed = args.seed.unwrap_or_else(time_seed);
    log::info!(
        "Neon Survivor (headless) seed {} weapon {} input {}",
        seed,
        weapon.as_str(),
        settings.input_mode.as_str()
    );

    let host = HeadlessHost::new(settings.mixer(), scores);
    let mut game = Game::with_settings(host, &settings, seed, weapon);

    let frame_ms = 1000.0 / args.fps;
    let frames = (args.seconds * args.fps).ceil() as u64;
    let mut next_switch = SWITCH_INTERVAL;

    for _ in 0..frames {
        match game.phase() {
            RunPhase::GameOver => break,
            RunPhase::LevelUp => {
                if let Some(choice) = pick_upgrade(game.upgrade_choices()) {
                    game.apply_upgrade(choice);
                }
                continue;
            }
            RunPhase::Paused => game.set_paused(false),
            RunPhase::Playing => {}
        }

        game.set_input(autopilot(game.world()));
        if crowd_size(game.world()) >= ABILITY_CROWD {
            game.trigger_ability();
        }
        if game.world().time >= next_switch {
            next_switch += SWITCH_INTERVAL;
            game.switch_active_weapon();
        }
        game.tick(frame_ms);
    }

    // Out of time before dying still counts as a finished run
    if game.phase() != RunPhase::GameOver {
        let entry = ScoreEntry::from_world(game.world());
        log::info!("Time limit reached at {}", format_time(entry.time_alive));
        game.host_mut().persist_score_entry(&entry);
    }

    let host = game.host();
    log::info!("Sound cues: {} played, {} silenced", host.voices, host.silenced);
    if let Some(path) = args.scores.as_deref() {
        save_scores(path, &host.scores)?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&game.summary()).context("serializing run summary")?
    );
    Ok(())
}
