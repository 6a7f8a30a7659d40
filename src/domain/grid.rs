/// Maze topology: passability and wraparound adjacency.
///
/// The grid is toroidal in one axis only:
///   - Columns outside `[0, width)` wrap to the opposite edge.
///   - Rows outside `[0, height)` are never open.
///
/// Immutable after load; every query here is pure.

use super::entity::Cell;
use super::tile::Tile;

/// Neighbor probe order: right, left, down, up.
const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Debug)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build from row-major tiles. Rows must already share one width.
    pub fn new(tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, |r| r.len());
        Grid { tiles, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fold the column into `[0, width)`. Rows are left as-is.
    #[inline]
    pub fn wrap(&self, cell: Cell) -> Cell {
        if self.width == 0 {
            return cell;
        }
        Cell::new(cell.x.rem_euclid(self.width as i32), cell.y)
    }

    /// Tile at a cell after horizontal wrap; vertical out-of-bounds reads as wall.
    #[inline]
    pub fn tile_at(&self, cell: Cell) -> Tile {
        if cell.y < 0 || cell.y >= self.height as i32 || self.width == 0 {
            return Tile::Wall;
        }
        let c = self.wrap(cell);
        self.tiles[c.y as usize][c.x as usize]
    }

    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.tile_at(cell).is_passable()
    }

    /// Up to four open, axis-aligned neighbors, already wrapped.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRS.iter().filter_map(move |&(dx, dy)| {
            let n = cell.offset(dx, dy);
            if n.y < 0 || n.y >= self.height as i32 {
                return None;
            }
            let n = self.wrap(n);
            self.is_open(n).then_some(n)
        })
    }

    /// Clamp a cell into the grid rectangle (no wrap).
    pub fn clamp(&self, cell: Cell) -> Cell {
        let max_x = (self.width as i32 - 1).max(0);
        let max_y = (self.height as i32 - 1).max(0);
        Cell::new(cell.x.clamp(0, max_x), cell.y.clamp(0, max_y))
    }

    /// Shortest step count ignoring walls, taking the horizontal wrap into account.
    /// Never exceeds the true path length, so it is a safe A* heuristic.
    pub fn wrapped_distance(&self, a: Cell, b: Cell) -> i32 {
        let dx = (a.x - b.x).abs();
        let dx = if self.width > 0 { dx.min(self.width as i32 - dx).max(0) } else { dx };
        dx + (a.y - b.y).abs()
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width as i32 / 2, self.height as i32 / 2)
    }

    /// Every open cell, row-major.
    #[cfg(test)]
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, t)| {
                t.is_passable().then_some(Cell::new(x as i32, y as i32))
            })
        })
    }
}

#[cfg(test)]
pub(crate) fn grid_from(rows: &[&str]) -> Grid {
    let width = rows[0].chars().count();
    let tiles = rows
        .iter()
        .map(|r| {
            let mut row: Vec<Tile> = r.chars().map(Tile::from_char).collect();
            row.resize(width, Tile::Open);
            row
        })
        .collect();
    Grid::new(tiles)
}
