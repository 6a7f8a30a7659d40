/// WorldState: the complete snapshot of a running session.
///
/// Everything the tick touches lives here and is passed explicitly to
/// `step`; there is no global state. The level text is retained so
/// `restart()` can rebuild the whole session from scratch.
///
/// ## Phases
///   Ready → Playing → Won | Lost
///
/// `Ready` waits for the first directional command. The session clock,
/// scheduler and frightened timer all start from zero at that moment.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::{GameConfig, ScoringConfig};
use crate::domain::ai::Tuning;
use crate::domain::entity::{Cell, MoveDir, Player, Pursuer};
use crate::domain::grid::Grid;
use super::clock::Clock;
use super::level::{self, LevelDef};
use super::rng::SimRng;
use super::schedule::{FrightenedTimer, ModeScheduler, SchedulePhase};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Ready,
    Playing,
    Won,
    Lost,
}

pub struct WorldState {
    // ── Level ──
    pub level: LevelDef,
    power_override: Option<Vec<Cell>>,
    pub grid: Grid,
    pub pellets: HashSet<Cell>,
    pub power_pellets: HashSet<Cell>,
    pub pellets_total: usize,

    // ── Entities ──
    pub player: Player,
    pub pursuers: Vec<Pursuer>,

    // ── Timers ──
    pub scheduler: ModeScheduler,
    /// Phase reported by the scheduler on the last tick.
    pub schedule_phase: SchedulePhase,
    pub frightened: FrightenedTimer,
    pub frightened_for: Duration,
    pub clock: Box<dyn Clock>,

    // ── Rules ──
    pub rng: SimRng,
    pub tuning: Tuning,
    pub scoring: ScoringConfig,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

// ── Construction ──

impl WorldState {
    pub fn new(def: LevelDef, config: &GameConfig, clock: Box<dyn Clock>, rng: SimRng) -> Self {
        let layout = level::build(&def, config.power_pellets.as_deref());
        let now = clock.now();
        let pellets_total = layout.pellets.len();

        WorldState {
            level: def,
            power_override: config.power_pellets.clone(),
            grid: layout.grid,
            pellets: layout.pellets,
            power_pellets: layout.power_pellets,
            pellets_total,
            player: Player::new(layout.player_start, config.scoring.starting_lives),
            pursuers: layout.pursuers,
            scheduler: ModeScheduler::new(config.schedule.clone(), now),
            schedule_phase: SchedulePhase::Scatter,
            frightened: FrightenedTimer::default(),
            frightened_for: config.frightened_duration(),
            clock,
            rng,
            tuning: Tuning {
                base_cooldown: config.speed.pursuer_cooldown,
                frightened_speed_mult: config.speed.frightened_speed_mult,
            },
            scoring: config.scoring.clone(),
            phase: Phase::Ready,
            tick: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    /// Throw away the current session and start over on the same level.
    /// Pellets, score, lives and all timers are restored.
    pub fn restart(&mut self) {
        let layout = level::build(&self.level, self.power_override.as_deref());
        self.grid = layout.grid;
        self.pellets_total = layout.pellets.len();
        self.pellets = layout.pellets;
        self.power_pellets = layout.power_pellets;
        self.player = Player::new(layout.player_start, self.scoring.starting_lives);
        self.pursuers = layout.pursuers;

        self.clock.restart();
        let now = self.clock.now();
        self.scheduler.reset(now);
        self.schedule_phase = SchedulePhase::Scatter;
        self.frightened.clear();

        self.phase = Phase::Ready;
        self.tick = 0;
        self.message.clear();
        self.message_timer = 0;
        tracing::info!(level = %self.level.name, "session restarted");
    }

    /// Leave `Ready`: timers start counting from here.
    fn begin(&mut self) {
        self.clock.restart();
        let now = self.clock.now();
        self.scheduler.reset(now);
        self.schedule_phase = self.scheduler.current_phase(now);
        self.frightened.clear();
        self.phase = Phase::Playing;
        tracing::info!(
            level = %self.level.name,
            pursuers = self.pursuers.len(),
            pellets = self.pellets.len(),
            "session started"
        );
    }
}

// ── Commands ──

impl WorldState {
    /// Queue a one-cell move. The desired cell only changes when the target
    /// (after horizontal wrap) is open. The first command starts the session.
    pub fn queue_move(&mut self, dir: MoveDir) {
        match self.phase {
            Phase::Ready => self.begin(),
            Phase::Playing => {}
            Phase::Won | Phase::Lost => return,
        }
        let (dx, dy) = dir.delta();
        let target = self.player.pos.offset(dx, dy);
        if self.grid.is_open(target) {
            self.player.desired = self.grid.wrap(target);
        }
    }

    /// Debug: jump the global schedule to its next entry. The change is
    /// picked up (and reported) by the next tick.
    pub fn force_advance_schedule(&mut self) -> SchedulePhase {
        let now = self.clock.now();
        let next = self.scheduler.force_advance(now);
        tracing::debug!(cursor = self.scheduler.cursor(), phase = ?next, "schedule force-advanced");
        next
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Queries ──

impl WorldState {
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// HUD mode text: the frightened override, else the scheduled phase.
    pub fn mode_label(&self) -> &'static str {
        if self.frightened.is_active() {
            "FRIGHTENED"
        } else {
            self.schedule_phase.mode().label()
        }
    }

    pub fn frightened_remaining(&self) -> Duration {
        self.frightened.remaining(self.now())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entity::Mode;
    use crate::sim::clock::ManualClock;

    /// Session on a string-diagram map with a shared manual clock and a
    /// fixed seed. Pursuer cooldown 0 so every tick is a move.
    pub(crate) fn world_from(rows: &[&str], clock: &ManualClock) -> WorldState {
        let def = LevelDef { name: "test".into(), rows: rows.iter().map(|s| s.to_string()).collect() };
        let mut cfg = GameConfig::default();
        cfg.speed.pursuer_cooldown = 0;
        WorldState::new(def, &cfg, Box::new(clock.clone()), SimRng::new(11))
    }

    const ROOM: [&str; 5] = [
        "#######",
        "#.....#",
        "..P...G",
        "#.....#",
        "#######",
    ];

    #[test]
    fn starts_ready_and_first_move_begins_play() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(30));
        let mut w = world_from(&ROOM, &clock);
        assert_eq!(w.phase, Phase::Ready);

        w.queue_move(MoveDir::Right);
        assert_eq!(w.phase, Phase::Playing);
        // Session time starts over when play begins.
        assert_eq!(w.now(), Duration::ZERO);
        assert_eq!(w.player.desired, Cell::new(3, 2));
    }

    #[test]
    fn move_into_wall_is_ignored() {
        let clock = ManualClock::new();
        let mut w = world_from(&ROOM, &clock);
        w.player.pos = Cell::new(1, 1);
        w.player.desired = w.player.pos;
        w.queue_move(MoveDir::Up);
        assert_eq!(w.player.desired, Cell::new(1, 1));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn move_wraps_across_open_edge() {
        let clock = ManualClock::new();
        let mut w = world_from(&ROOM, &clock);
        w.player.pos = Cell::new(0, 2);
        w.player.desired = w.player.pos;
        w.queue_move(MoveDir::Left);
        assert_eq!(w.player.desired, Cell::new(6, 2));
    }

    #[test]
    fn restart_rebuilds_everything() {
        let clock = ManualClock::new();
        let mut w = world_from(&ROOM, &clock);
        w.queue_move(MoveDir::Right);
        w.pellets.clear();
        w.player.score = 500;
        w.player.lives = 1;
        w.pursuers[0].pos = Cell::new(1, 1);
        w.pursuers[0].mode = Mode::Chase;
        w.phase = Phase::Lost;
        let now = w.now();
        w.frightened.start(now, Duration::from_secs(7));

        w.restart();
        assert_eq!(w.phase, Phase::Ready);
        assert_eq!(w.pellets.len(), w.pellets_total);
        assert_eq!(w.player.score, 0);
        assert_eq!(w.player.lives, 3);
        assert_eq!(w.player.pos, Cell::new(2, 2));
        assert_eq!(w.pursuers[0].pos, Cell::new(6, 2));
        assert_eq!(w.pursuers[0].mode, Mode::Scatter);
        assert!(!w.frightened.is_active());
        assert_eq!(w.tick, 0);
    }

    #[test]
    fn finished_session_ignores_moves() {
        let clock = ManualClock::new();
        let mut w = world_from(&ROOM, &clock);
        w.phase = Phase::Won;
        w.queue_move(MoveDir::Right);
        assert_eq!(w.player.desired, w.player.pos);
        assert_eq!(w.phase, Phase::Won);
    }

    #[test]
    fn mode_label_prefers_frightened() {
        let clock = ManualClock::new();
        let mut w = world_from(&ROOM, &clock);
        assert_eq!(w.mode_label(), "SCATTER");
        let now = w.now();
        w.frightened.start(now, Duration::from_secs(7));
        assert_eq!(w.mode_label(), "FRIGHTENED");
    }
}
