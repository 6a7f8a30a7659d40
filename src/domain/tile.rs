/// Tile types and their properties.
/// Pellets are not tiles: they live in the session's pellet sets,
/// so the grid stays immutable after load.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Open,
    Wall,
}

impl Tile {
    /// Can an entity occupy this tile?
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Map character for this tile kind. Anything that is not a wall is open.
    pub fn from_char(ch: char) -> Self {
        match ch {
            '#' => Tile::Wall,
            _ => Tile::Open,
        }
    }
}
