/// Level loading and setup.
///
/// ## Sources
///   1. `general.map_file` from config (plain text, one row per line)
///   2. Built-in 15×15 maze
///
/// ## File format:
///   Optional first line `# Level Name` (a `#` line containing a letter
///   other than the spawn markers), then map rows. Trailing blank lines
///   are dropped.
///
/// ## Tile legend:
///   '#' = Wall           '.' = Pellet
///   'P' = Player spawn   'G' = Pursuer spawn
///   anything else = open floor, no pellet
///
/// Width is the first row's length; other rows are space-padded or
/// truncated to it. Spawn markers become pellet floor.

use std::collections::HashSet;
use std::path::Path;

use crate::domain::entity::{Cell, Personality, Pursuer};
use crate::domain::grid::Grid;
use crate::domain::tile::Tile;
use crate::error::{LevelError, LevelResult};

/// At most this many pursuers are taken from the map.
pub const MAX_PURSUERS: usize = 4;

/// Raw level text (owned strings, loaded from file or built in).
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

/// Everything a session needs from a parsed level.
#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Grid,
    pub pellets: HashSet<Cell>,
    pub power_pellets: HashSet<Cell>,
    pub player_start: Cell,
    pub pursuers: Vec<Pursuer>,
}

// ══════════════════════════════════════════════════════════════
// Sources
// ══════════════════════════════════════════════════════════════

const BUILTIN_NAME: &str = "Classic 15x15";

const BUILTIN_MAP: [&str; 15] = [
    "###############",
    "#.............#",
    "#.###.###.###.#",
    "#.#...#.#...#.#",
    "#.#.#.#.#.#.#.#",
    "#.............#",
    "#.###.#G#.###.#",
    "#.#...GGG...#.#",
    "#.###.###.###.#",
    "#......P......#",
    "#.#.#.#.#.#.#.#",
    "#.#...#.#...#.#",
    "#.###.###.###.#",
    "#.............#",
    "###############",
];

pub fn builtin() -> LevelDef {
    LevelDef {
        name: BUILTIN_NAME.to_string(),
        rows: BUILTIN_MAP.iter().map(|s| s.to_string()).collect(),
    }
}

/// Read a map file from disk.
pub fn load_map_file(path: &Path) -> LevelResult<LevelDef> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Custom".to_string());
    parse_level_text(&content, &fallback)
}

/// Parse level text. `fallback_name` is used when there is no name line.
pub fn parse_level_text(content: &str, fallback_name: &str) -> LevelResult<LevelDef> {
    let mut name = String::new();
    let mut rows: Vec<String> = vec![];

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if rows.is_empty() && name.is_empty() && line.starts_with('#') && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            rows.push(line.to_string());
        }
    }

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }

    if name.is_empty() {
        name = fallback_name.to_string();
    }
    if rows.is_empty() || rows[0].is_empty() {
        return Err(LevelError::Empty(name));
    }

    Ok(LevelDef { name, rows })
}

/// `# Level Name` vs. `#.G.#` (map data). Spawn markers don't count.
fn is_name_line(line: &str) -> bool {
    line[1..].chars().any(|c| c.is_alphabetic() && c != 'P' && c != 'G')
}

// ══════════════════════════════════════════════════════════════
// Setup
// ══════════════════════════════════════════════════════════════

/// Turn level text into a playable layout.
///
/// `power_override` replaces the corner heuristic; cells without a pellet
/// are ignored either way.
pub fn build(def: &LevelDef, power_override: Option<&[Cell]>) -> Layout {
    let width = def.rows.first().map_or(0, |r| r.chars().count());
    let height = def.rows.len();

    let mut tiles = Vec::with_capacity(height);
    let mut pellets = HashSet::new();
    let mut player_start = None;
    let mut spawns: Vec<Cell> = vec![];

    for (y, row) in def.rows.iter().enumerate() {
        let chars = row.chars().chain(std::iter::repeat(' ')).take(width);
        let mut tile_row = Vec::with_capacity(width);
        for (x, ch) in chars.enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            tile_row.push(Tile::from_char(ch));
            match ch {
                '.' => {
                    pellets.insert(cell);
                }
                'P' => {
                    player_start = Some(cell);
                    pellets.insert(cell);
                }
                'G' => {
                    spawns.push(cell);
                    pellets.insert(cell);
                }
                _ => {}
            }
        }
        tiles.push(tile_row);
    }

    let grid = Grid::new(tiles);
    let w = width as i32;
    let h = height as i32;

    let player_start = player_start.unwrap_or_else(|| grid.center());

    if spawns.is_empty() {
        let mid = grid.center();
        spawns = vec![mid.offset(-1, 0), mid, mid.offset(1, 0)];
        tracing::warn!(level = %def.name, "no pursuer spawns in map, using default roster");
    } else if spawns.len() > MAX_PURSUERS {
        tracing::warn!(level = %def.name, found = spawns.len(), "extra pursuer spawns ignored");
    }

    let corners = scatter_corners(w, h);
    let pursuers = spawns
        .iter()
        .take(MAX_PURSUERS)
        .enumerate()
        .map(|(i, &pos)| Pursuer::new(i, Personality::ROSTER[i], pos, corners[i]))
        .collect();

    let power_candidates: Vec<Cell> = match power_override {
        Some(list) => list.to_vec(),
        None => vec![
            Cell::new(1, 1),
            Cell::new(w - 2, 1),
            Cell::new(1, h - 2),
            Cell::new(w - 2, h - 2),
        ],
    };
    let power_pellets = power_candidates.into_iter().filter(|c| pellets.contains(c)).collect();

    Layout { grid, pellets, power_pellets, player_start, pursuers }
}

/// Scatter corner for each roster slot.
fn scatter_corners(w: i32, h: i32) -> [Cell; MAX_PURSUERS] {
    [
        Cell::new(w - 2, 1),
        Cell::new(1, 1),
        Cell::new(w - 2, h - 2),
        Cell::new(1, h - 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(rows: &[&str]) -> LevelDef {
        LevelDef { name: "test".into(), rows: rows.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn builtin_level_setup() {
        let layout = build(&builtin(), None);
        assert_eq!(layout.grid.width(), 15);
        assert_eq!(layout.grid.height(), 15);
        assert_eq!(layout.player_start, Cell::new(7, 9));

        let spawns: Vec<(Personality, Cell, Cell)> =
            layout.pursuers.iter().map(|g| (g.personality, g.start, g.corner)).collect();
        assert_eq!(
            spawns,
            vec![
                (Personality::Chaser, Cell::new(7, 6), Cell::new(13, 1)),
                (Personality::Ambusher, Cell::new(6, 7), Cell::new(1, 1)),
                (Personality::Flanker, Cell::new(7, 7), Cell::new(13, 13)),
                (Personality::Shy, Cell::new(8, 7), Cell::new(1, 13)),
            ]
        );

        // Spawn markers leave pellets behind.
        assert!(layout.pellets.contains(&Cell::new(7, 9)));
        assert!(layout.pellets.contains(&Cell::new(7, 6)));
        assert!(!layout.pellets.contains(&Cell::new(0, 0)));

        let expected: HashSet<Cell> =
            [Cell::new(1, 1), Cell::new(13, 1), Cell::new(1, 13), Cell::new(13, 13)].into();
        assert_eq!(layout.power_pellets, expected);
        assert!(layout.power_pellets.is_subset(&layout.pellets));
    }

    #[test]
    fn rows_are_padded_and_truncated_to_first_row() {
        let layout = build(&def(&["#####", "#.", "#...###", "#####"]), None);
        assert_eq!(layout.grid.width(), 5);
        // Padding is open floor without a pellet.
        assert!(layout.grid.is_open(Cell::new(3, 1)));
        assert!(!layout.pellets.contains(&Cell::new(3, 1)));
        // Truncated: column 4 of row 2 is '#', the rest dropped.
        assert!(!layout.grid.is_open(Cell::new(4, 2)));
    }

    #[test]
    fn missing_markers_fall_back_to_center() {
        let layout = build(
            &def(&[
                "#######",
                "#.....#",
                "#.....#",
                "#.....#",
                "#######",
            ]),
            None,
        );
        assert_eq!(layout.player_start, Cell::new(3, 2));
        let starts: Vec<Cell> = layout.pursuers.iter().map(|g| g.start).collect();
        assert_eq!(starts, vec![Cell::new(2, 2), Cell::new(3, 2), Cell::new(4, 2)]);
        assert_eq!(layout.pursuers[2].personality, Personality::Flanker);
    }

    #[test]
    fn roster_is_capped_at_four() {
        let layout = build(&def(&["#######", "#GGGGG#", "#..P..#", "#######"]), None);
        assert_eq!(layout.pursuers.len(), MAX_PURSUERS);
        assert_eq!(layout.pursuers[3].start, Cell::new(4, 1));
        // The fifth marker still becomes a pellet.
        assert!(layout.pellets.contains(&Cell::new(5, 1)));
    }

    #[test]
    fn explicit_power_pellets_must_hold_a_pellet() {
        let overrides = [Cell::new(2, 2), Cell::new(0, 0), Cell::new(3, 2)];
        let layout = build(&def(&["#######", "#.G...#", "#. P..#", "#######"]), Some(&overrides));
        let expected: HashSet<Cell> = [Cell::new(3, 2)].into();
        assert_eq!(layout.power_pellets, expected);
    }

    #[test]
    fn parse_reads_name_line_and_trims_blank_tail() {
        let text = "# Tiny Room\n#####\n#P.G#\n#####\n\n\n";
        let def = parse_level_text(text, "fallback").unwrap();
        assert_eq!(def.name, "Tiny Room");
        assert_eq!(def.rows.len(), 3);
    }

    #[test]
    fn map_row_with_markers_is_not_a_name() {
        let def = parse_level_text("#PG#\n####\n", "fallback").unwrap();
        assert_eq!(def.name, "fallback");
        assert_eq!(def.rows[0], "#PG#");
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(parse_level_text("# Only A Name\n\n", "x"), Err(LevelError::Empty(_))));
        assert!(matches!(parse_level_text("", "x"), Err(LevelError::Empty(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_map_file(Path::new("/nonexistent/mazechase/level.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
