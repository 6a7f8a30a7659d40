/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Read-only over `WorldState`; never mutates the session.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Cell, Mode, Personality, Pursuer};
use crate::domain::tile::Tile;
use crate::sim::world::{Phase, WorldState};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BASE_BG: Color = Color::Rgb { r: 10, g: 10, b: 20 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Differs from every real glyph; forces a full repaint.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Each maze cell = 2 terminal columns, so the maze looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_FG: Color = Color::Rgb { r: 40, g: 60, b: 200 };
const PELLET_FG: Color = Color::Rgb { r: 255, g: 220, b: 180 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 230, b: 0 };
const FRIGHTENED_FG: Color = Color::Rgb { r: 60, g: 90, b: 255 };
const EATEN_FG: Color = Color::Rgb { r: 200, g: 200, b: 200 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Glyph::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Glyph::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        self.compose_hud(world);
        self.compose_maze(world);
        self.compose_footer(world);
        self.compose_banner(world);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }
                if need_move {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
            }
            // Next row always needs an explicit move.
            need_move = true;
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState) {
        let mode = w.mode_label();
        let fright = if w.frightened.is_active() {
            format!(" {:.1}s", w.frightened_remaining().as_secs_f64())
        } else {
            String::new()
        };
        let hud = format!(
            " {}  Lives:{}  Score:{:<6}  Pellets:{}/{}  Mode:{}{} ",
            w.level.name,
            w.player.lives,
            w.player.score,
            w.pellets.len(),
            w.pellets_total,
            mode,
            fright,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_maze(&mut self, w: &WorldState) {
        for gy in 0..w.grid.height() {
            let row = MAP_ROW + gy;
            for gx in 0..w.grid.width() {
                let col = gx * CELL_W;
                if col + 1 >= self.front.width { break; }
                let cell = Cell::new(gx as i32, gy as i32);
                let (c0, c1, fg) = self.cell_glyphs(w, cell);
                self.front.set(col, row, Glyph::new(c0, fg, Glyph::BASE_BG));
                self.front.set(col + 1, row, Glyph::new(c1, fg, Glyph::BASE_BG));
            }
        }
    }

    /// Two-column look for one maze cell. Actors draw over pellets.
    fn cell_glyphs(&self, w: &WorldState, cell: Cell) -> (char, char, Color) {
        if let Some(g) = w.pursuers.iter().rev().find(|g| g.pos == cell) {
            return pursuer_glyphs(g, w.frightened_remaining().as_millis());
        }
        if w.player.pos == cell && w.phase != Phase::Lost {
            return ('(', ')', PLAYER_FG);
        }
        if w.grid.tile_at(cell) == Tile::Wall {
            return ('█', '█', WALL_FG);
        }
        if w.power_pellets.contains(&cell) {
            return ('●', ' ', PELLET_FG);
        }
        if w.pellets.contains(&cell) {
            return ('·', ' ', PELLET_FG);
        }
        (' ', ' ', Color::White)
    }

    fn compose_footer(&mut self, w: &WorldState) {
        let msg_row = MAP_ROW + w.grid.height() + 1;
        if !w.message.is_empty() && w.phase == Phase::Playing {
            let bg = Color::Rgb { r: 200, g: 180, b: 50 };
            self.front.fill_row(msg_row, bg);
            self.front.put_str(0, msg_row, &format!(" {} ", w.message), Color::Black, bg);
        }
        let help = " Arrows/WASD:Move  s:NextPhase  r:Restart  q:Quit";
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, Glyph::BASE_BG);
    }

    /// Centered status line over the maze for ready / win / loss.
    fn compose_banner(&mut self, w: &WorldState) {
        let text = match w.phase {
            Phase::Ready => "PRESS AN ARROW TO START",
            Phase::Won => "YOU WIN!  r: play again",
            Phase::Lost => "GAME OVER  r: try again",
            Phase::Playing => return,
        };
        let maze_w = w.grid.width() * CELL_W;
        let row = MAP_ROW + w.grid.height() / 2;
        let len = text.chars().count() + 2;
        let x = maze_w.saturating_sub(len) / 2;
        let bg = Color::Rgb { r: 60, g: 0, b: 0 };
        self.front.put_str(x, row, &format!(" {text} "), Color::Yellow, bg);
    }
}

fn pursuer_glyphs(g: &Pursuer, frightened_ms: u128) -> (char, char, Color) {
    match g.mode {
        Mode::Eaten => ('°', '°', EATEN_FG),
        Mode::Frightened => {
            // Flash during the last two seconds.
            let flash = frightened_ms < 2000 && (frightened_ms / 250) % 2 == 1;
            ('▟', '▙', if flash { Color::White } else { FRIGHTENED_FG })
        }
        Mode::Scatter | Mode::Chase => ('▟', '▙', personality_color(g.personality)),
    }
}

fn personality_color(p: Personality) -> Color {
    match p {
        Personality::Chaser => Color::Rgb { r: 255, g: 40, b: 40 },
        Personality::Ambusher => Color::Rgb { r: 255, g: 150, b: 220 },
        Personality::Flanker => Color::Rgb { r: 40, g: 230, b: 255 },
        Personality::Shy => Color::Rgb { r: 255, g: 170, b: 60 },
    }
}
