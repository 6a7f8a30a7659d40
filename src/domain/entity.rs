/// Entities: Cell, Player, Pursuer and the small enums they carry.
/// The pursuer state machine lives in `ai`; these types only hold state.

use std::collections::VecDeque;

/// A grid coordinate. Columns may conceptually wrap; see `Grid::wrap`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    /// Manhattan distance on unwrapped coordinates.
    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Directional command from the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

/// Per-pursuer behavior mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Scatter,
    Chase,
    Frightened,
    Eaten,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Scatter => "SCATTER",
            Mode::Chase => "CHASE",
            Mode::Frightened => "FRIGHTENED",
            Mode::Eaten => "EATEN",
        }
    }
}

/// Fixed pursuer identity; selects the chase-phase targeting heuristic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Personality {
    /// Heads straight for the player.
    Chaser,
    /// Aims four cells ahead of the player's travel direction.
    Ambusher,
    /// Reflects a point ahead of the player through the Chaser.
    Flanker,
    /// Chases from afar, retreats to its corner when close.
    Shy,
}

impl Personality {
    /// Roster order: the n-th spawn marker gets the n-th personality.
    pub const ROSTER: [Personality; 4] = [
        Personality::Chaser,
        Personality::Ambusher,
        Personality::Flanker,
        Personality::Shy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Personality::Chaser => "chaser",
            Personality::Ambusher => "ambusher",
            Personality::Flanker => "flanker",
            Personality::Shy => "shy",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub start: Cell,
    pub pos: Cell,
    /// Queued next cell; equals `pos` when no move is pending.
    pub desired: Cell,
    pub lives: u32,
    pub score: u32,
}

impl Player {
    pub fn new(start: Cell, lives: u32) -> Self {
        Player { start, pos: start, desired: start, lives, score: 0 }
    }

    /// Pending movement delta (desired minus current).
    pub fn move_delta(&self) -> (i32, i32) {
        (self.desired.x - self.pos.x, self.desired.y - self.pos.y)
    }

    /// Take the queued step, if any.
    pub fn advance(&mut self) {
        if self.pos != self.desired {
            self.pos = self.desired;
        }
    }

    /// Back to the spawn cell with nothing queued. Score and lives are kept.
    pub fn respawn(&mut self) {
        self.pos = self.start;
        self.desired = self.start;
    }
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: usize,
    pub personality: Personality,
    pub start: Cell,
    pub pos: Cell,
    pub corner: Cell,
    /// Cells still to traverse, next step first.
    pub path: VecDeque<Cell>,
    pub cached_target: Option<Cell>,
    pub recalc_counter: u32,
    pub mode: Mode,
    /// Set while heading home after capture; cleared only at `start`.
    pub eaten: bool,
    pub cooldown: u32,
}

impl Pursuer {
    pub fn new(id: usize, personality: Personality, start: Cell, corner: Cell) -> Self {
        Pursuer {
            id,
            personality,
            start,
            pos: start,
            corner,
            path: VecDeque::new(),
            cached_target: None,
            recalc_counter: 0,
            mode: Mode::Scatter,
            eaten: false,
            cooldown: 0,
        }
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.cached_target = None;
    }

    /// Full spawn-state reset (used after the player is caught).
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.clear_path();
        self.mode = Mode::Scatter;
        self.cooldown = 0;
        self.eaten = false;
        self.recalc_counter = 0;
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == Mode::Frightened && !self.eaten
    }
}
