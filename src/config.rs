/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// A file that parses but fails validation is rejected as a whole.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::entity::Cell;
use crate::error::ConfigError;
use crate::sim::schedule::{SchedulePhase, DEFAULT_TIMELINE};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub scoring: ScoringConfig,
    /// Global phase timeline; the last entry never expires.
    pub schedule: Vec<(SchedulePhase, Duration)>,
    pub map_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub clock: ClockKind,
    /// Explicit power-pellet cells; `None` means the corner heuristic.
    pub power_pellets: Option<Vec<Cell>>,
    pub log_file: PathBuf,
    /// Problems met while loading, logged once logging is up.
    pub notes: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub pursuer_cooldown: u32,       // ticks skipped between pursuer moves
    pub frightened_speed_mult: f64,  // cooldown multiplier while frightened
    pub frightened_for: Duration,
}

#[derive(Clone, Debug)]
pub struct ScoringConfig {
    pub pellet: u32,
    pub capture_bonus: u32,
    pub starting_lives: u32,
}

/// Which clock drives the scheduler and frightened timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockKind {
    /// Real elapsed time.
    Wall,
    /// Tick count × tick length; reproducible.
    Ticks,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    schedule: TomlSchedule,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_pursuer_cooldown")]
    pursuer_cooldown: u32,
    #[serde(default = "default_frightened_mult")]
    frightened_speed_mult: f64,
    #[serde(default = "default_frightened_secs")]
    frightened_secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_pellet")]
    pellet: u32,
    #[serde(default = "default_capture_bonus")]
    capture_bonus: u32,
    #[serde(default = "default_lives")]
    starting_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSchedule {
    #[serde(default = "default_phases")]
    phases: Vec<TomlPhase>,
}

#[derive(Deserialize, Debug)]
struct TomlPhase {
    phase: String,
    secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    map_file: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_clock")]
    clock: String,
    #[serde(default)]
    power_pellets: Option<Vec<[i32; 2]>>,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 83 }        // ~12 ticks per second
fn default_pursuer_cooldown() -> u32 { 1 }
fn default_frightened_mult() -> f64 { 2.0 } // frightened pursuers move at half rate
fn default_frightened_secs() -> f64 { 7.0 }
fn default_pellet() -> u32 { 10 }
fn default_capture_bonus() -> u32 { 200 }
fn default_lives() -> u32 { 3 }
fn default_clock() -> String { "wall".into() }
fn default_log_file() -> String { "mazechase.log".into() }

fn default_phases() -> Vec<TomlPhase> {
    DEFAULT_TIMELINE
        .iter()
        .map(|&(p, secs)| TomlPhase {
            phase: match p {
                SchedulePhase::Scatter => "scatter".into(),
                SchedulePhase::Chase => "chase".into(),
            },
            secs,
        })
        .collect()
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            pursuer_cooldown: default_pursuer_cooldown(),
            frightened_speed_mult: default_frightened_mult(),
            frightened_secs: default_frightened_secs(),
        }
    }
}

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring {
            pellet: default_pellet(),
            capture_bonus: default_capture_bonus(),
            starting_lives: default_lives(),
        }
    }
}

impl Default for TomlSchedule {
    fn default() -> Self {
        TomlSchedule { phases: default_phases() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            map_file: None,
            seed: None,
            clock: default_clock(),
            power_pellets: None,
            log_file: default_log_file(),
        }
    }
}

// ── Conversion & validation ──

fn validate(t: TomlConfig) -> Result<GameConfig, ConfigError> {
    if !(t.speed.frightened_speed_mult > 0.0 && t.speed.frightened_speed_mult.is_finite()) {
        return Err(ConfigError::InvalidValue {
            key: "speed.frightened_speed_mult",
            reason: format!("must be positive, got {}", t.speed.frightened_speed_mult),
        });
    }
    let frightened_for = secs_to_duration("speed.frightened_secs", t.speed.frightened_secs)?;
    if t.speed.tick_rate_ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: "speed.tick_rate_ms",
            reason: "must be at least 1".into(),
        });
    }

    if t.schedule.phases.is_empty() {
        return Err(ConfigError::EmptySchedule);
    }
    let mut schedule = Vec::with_capacity(t.schedule.phases.len());
    for entry in &t.schedule.phases {
        let phase = SchedulePhase::parse(&entry.phase).ok_or_else(|| ConfigError::InvalidValue {
            key: "schedule.phases.phase",
            reason: format!("unknown phase {:?}", entry.phase),
        })?;
        schedule.push((phase, secs_to_duration("schedule.phases.secs", entry.secs)?));
    }

    let clock = match t.general.clock.trim().to_ascii_lowercase().as_str() {
        "wall" => ClockKind::Wall,
        "ticks" => ClockKind::Ticks,
        other => {
            return Err(ConfigError::InvalidValue {
                key: "general.clock",
                reason: format!("expected \"wall\" or \"ticks\", got {other:?}"),
            })
        }
    };

    Ok(GameConfig {
        speed: SpeedConfig {
            tick_rate_ms: t.speed.tick_rate_ms,
            pursuer_cooldown: t.speed.pursuer_cooldown,
            frightened_speed_mult: t.speed.frightened_speed_mult,
            frightened_for,
        },
        scoring: ScoringConfig {
            pellet: t.scoring.pellet,
            capture_bonus: t.scoring.capture_bonus,
            starting_lives: t.scoring.starting_lives,
        },
        schedule,
        map_file: t.general.map_file.map(PathBuf::from),
        seed: t.general.seed,
        clock,
        power_pellets: t
            .general
            .power_pellets
            .map(|cells| cells.into_iter().map(|[x, y]| Cell::new(x, y)).collect()),
        log_file: PathBuf::from(t.general.log_file),
        notes: Vec::new(),
    })
}

/// Seconds from the file as a `Duration`. Negative, NaN and values too
/// large for `Duration` are rejected here so nothing converts later.
fn secs_to_duration(key: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
        key,
        reason: format!("{secs} is not a usable duration in seconds ({e})"),
    })
}

impl Default for GameConfig {
    fn default() -> Self {
        let speed = TomlSpeed::default();
        let scoring = TomlScoring::default();
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: speed.tick_rate_ms,
                pursuer_cooldown: speed.pursuer_cooldown,
                frightened_speed_mult: speed.frightened_speed_mult,
                frightened_for: Duration::from_secs_f64(speed.frightened_secs),
            },
            scoring: ScoringConfig {
                pellet: scoring.pellet,
                capture_bonus: scoring.capture_bonus,
                starting_lives: scoring.starting_lives,
            },
            schedule: crate::sim::schedule::default_timeline(),
            map_file: None,
            seed: None,
            clock: ClockKind::Wall,
            power_pellets: None,
            log_file: PathBuf::from(default_log_file()),
            notes: Vec::new(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Parse and validate a `config.toml` body.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: TomlConfig = toml::from_str(text)?;
        validate(raw)
    }

    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Never fails: any problem is recorded in `notes` and defaults are used.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut cfg = load_toml(&search_dirs);

        // A relative map path is looked up next to the config, then used as-is.
        if let Some(map) = cfg.map_file.take() {
            cfg.map_file = Some(resolve_relative(&map, &search_dirs));
        }
        cfg
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.speed.tick_rate_ms)
    }

    pub fn frightened_duration(&self) -> Duration {
        self.speed.frightened_for
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn resolve_relative(path: &Path, search_dirs: &[PathBuf]) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs
        .iter()
        .map(|d| d.join(path))
        .find(|p| p.is_file())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::from_toml_str(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        let mut cfg = GameConfig::default();
                        cfg.notes.push(format!("{}: {e}; using default settings", path.display()));
                        return cfg;
                    }
                },
                Err(e) => {
                    let mut cfg = GameConfig::default();
                    cfg.notes.push(format!("could not read {}: {e}", path.display()));
                    return cfg;
                }
            }
        }
    }
    GameConfig::default()
}
