/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use config::{ClockKind, GameConfig};
use error::LevelResult;
use sim::clock::{Clock, TickClock, WallClock};
use sim::event::GameEvent;
use sim::level::{self, LevelDef};
use sim::rng::SimRng;
use sim::step;
use sim::world::WorldState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    for note in &config.notes {
        tracing::warn!("{note}");
    }

    let level = match load_level(&config) {
        Ok(def) => def,
        Err(e) => {
            tracing::error!(error = %e, "map load failed");
            eprintln!("Map load failed: {e}");
            std::process::exit(1);
        }
    };

    let clock: Box<dyn Clock> = match config.clock {
        ClockKind::Wall => Box::new(WallClock::new()),
        ClockKind::Ticks => Box::new(TickClock::new(config.tick_duration())),
    };
    let rng = SimRng::from_option(config.seed);
    let mut world = WorldState::new(level, &config, clock, rng);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        tracing::error!(error = %e, "terminal init failed");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Final Score: {}", world.player.score);
}

/// Log to a file so output never lands on the game screen.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging(config: &GameConfig) {
    let file = match File::create(&config.log_file) {
        Ok(f) => f,
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn load_level(config: &GameConfig) -> LevelResult<LevelDef> {
    match &config.map_file {
        Some(path) => {
            let def = level::load_map_file(path)?;
            tracing::info!(path = %path.display(), name = %def.name, "map loaded");
            Ok(def)
        }
        None => Ok(level::builtin()),
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = config.tick_duration();

    loop {
        kb.drain_events();
        if kb.quit_requested() {
            break;
        }

        for &cmd in kb.commands() {
            match cmd {
                Command::Move(dir) => world.queue_move(dir),
                Command::AdvanceSchedule => {
                    world.force_advance_schedule();
                }
                Command::Restart => world.restart(),
                Command::Quit => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::step(world);
            log_events(world, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(world: &WorldState, events: &[GameEvent]) {
    let tick = world.tick;
    for ev in events {
        match ev {
            GameEvent::PelletEaten { at } => tracing::trace!(tick, ?at, "pellet"),
            GameEvent::PowerPelletEaten { at } => tracing::debug!(tick, ?at, "power pellet"),
            GameEvent::PursuerEaten { id, personality, bonus } => {
                tracing::info!(tick, id, personality = personality.name(), bonus, "pursuer eaten");
            }
            GameEvent::PlayerCaught { by, lives_left } => {
                tracing::info!(tick, by, lives_left, "player caught");
            }
            GameEvent::PhaseChanged { phase } => tracing::debug!(tick, ?phase, "phase"),
            GameEvent::PursuerRespawned { id } => tracing::trace!(tick, id, "respawned"),
            GameEvent::FrightenedStarted
            | GameEvent::FrightenedEnded
            | GameEvent::Won
            | GameEvent::Lost => tracing::trace!(tick, event = ?ev),
        }
    }
}
