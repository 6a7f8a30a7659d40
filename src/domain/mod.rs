//! Pure game rules: maze topology, pathfinding, targeting and pursuer AI.
//! Nothing in here knows about clocks, terminals or config files.

pub mod ai;
pub mod entity;
pub mod grid;
pub mod path;
pub mod targeting;
pub mod tile;
