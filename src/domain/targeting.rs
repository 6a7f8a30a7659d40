/// Target selection: one pure function per personality, plus the
/// mode-wide overrides (scatter corner, frightened refuge, eaten home).
///
/// Dispatch is a `match` on `Personality`; nothing is looked up by name.
/// Roster lookups fall back to the player's cell when the wanted identity
/// is missing.

use super::entity::{Cell, Mode, Personality, Player, Pursuer};
use super::grid::Grid;

/// Ambusher looks this many moves ahead of the player.
const AMBUSH_LEAD: i32 = 4;
/// Flanker's pivot point lies this many moves ahead of the player.
const FLANK_LEAD: i32 = 2;
/// Shy chases only while farther than this (Manhattan).
pub const SHY_DISTANCE: i32 = 8;

/// Target for `pursuer` this tick, given its current mode.
pub fn resolve_target(pursuer: &Pursuer, player: &Player, roster: &[Pursuer], grid: &Grid) -> Cell {
    match pursuer.mode {
        Mode::Eaten => pursuer.start,
        Mode::Frightened => frightened_target(player, grid),
        Mode::Scatter => pursuer.corner,
        Mode::Chase => chase_target(pursuer.personality, player, roster, grid),
    }
}

/// Chase-phase heuristic for each identity.
pub fn chase_target(personality: Personality, player: &Player, roster: &[Pursuer], grid: &Grid) -> Cell {
    match personality {
        Personality::Chaser => target_chaser(player),
        Personality::Ambusher => target_ambusher(player, grid),
        Personality::Flanker => target_flanker(player, roster, grid),
        Personality::Shy => target_shy(player, roster),
    }
}

fn target_chaser(player: &Player) -> Cell {
    player.pos
}

fn target_ambusher(player: &Player, grid: &Grid) -> Cell {
    let (dx, dy) = player.move_delta();
    grid.clamp(player.pos.offset(AMBUSH_LEAD * dx, AMBUSH_LEAD * dy))
}

fn target_flanker(player: &Player, roster: &[Pursuer], grid: &Grid) -> Cell {
    let pivot = match roster.iter().find(|g| g.personality == Personality::Chaser) {
        Some(g) => g.pos,
        None => return player.pos,
    };
    let (dx, dy) = player.move_delta();
    let ahead = player.pos.offset(FLANK_LEAD * dx, FLANK_LEAD * dy);
    let vx = ahead.x - pivot.x;
    let vy = ahead.y - pivot.y;
    grid.clamp(pivot.offset(2 * vx, 2 * vy))
}

fn target_shy(player: &Player, roster: &[Pursuer]) -> Cell {
    match roster.iter().find(|g| g.personality == Personality::Shy) {
        Some(me) if me.pos.manhattan(player.pos) > SHY_DISTANCE => player.pos,
        Some(me) => me.corner,
        None => player.pos,
    }
}

/// The four refuge corners, in tie-break order.
pub fn refuge_corners(grid: &Grid) -> [Cell; 4] {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    [
        Cell::new(1, 1),
        Cell::new(w - 2, 1),
        Cell::new(1, h - 2),
        Cell::new(w - 2, h - 2),
    ]
}

/// Refuge corner farthest from the player. Ties go to the earlier corner.
pub fn frightened_target(player: &Player, grid: &Grid) -> Cell {
    let corners = refuge_corners(grid);
    let mut best = corners[0];
    let mut best_d = best.manhattan(player.pos);
    for &c in &corners[1..] {
        let d = c.manhattan(player.pos);
        if d > best_d {
            best = c;
            best_d = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::grid_from;

    fn open_grid(w: usize, h: usize) -> Grid {
        let row = ".".repeat(w);
        let rows: Vec<&str> = (0..h).map(|_| row.as_str()).collect();
        grid_from(&rows)
    }

    fn player_moving(pos: Cell, delta: (i32, i32)) -> Player {
        let mut p = Player::new(pos, 3);
        p.desired = pos.offset(delta.0, delta.1);
        p
    }

    fn pursuer(id: usize, personality: Personality, pos: Cell, corner: Cell) -> Pursuer {
        let mut g = Pursuer::new(id, personality, pos, corner);
        g.pos = pos;
        g
    }

    #[test]
    fn chaser_targets_player() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(3, 4), (0, 1));
        assert_eq!(chase_target(Personality::Chaser, &p, &[], &g), Cell::new(3, 4));
    }

    #[test]
    fn ambusher_leads_four_cells() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(5, 5), (1, 0));
        assert_eq!(chase_target(Personality::Ambusher, &p, &[], &g), Cell::new(9, 5));
    }

    #[test]
    fn ambusher_lead_is_clamped() {
        let g = open_grid(8, 8);
        let p = player_moving(Cell::new(5, 5), (1, 0));
        assert_eq!(chase_target(Personality::Ambusher, &p, &[], &g), Cell::new(7, 5));
        let p = player_moving(Cell::new(2, 1), (0, -1));
        assert_eq!(chase_target(Personality::Ambusher, &p, &[], &g), Cell::new(2, 0));
    }

    #[test]
    fn flanker_reflects_through_chaser() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(6, 6), (1, 0));
        let roster = [pursuer(0, Personality::Chaser, Cell::new(4, 6), Cell::new(13, 1))];
        // ahead = (8,6); A + 2*(ahead - A) = (4,6) + (8,0)
        assert_eq!(chase_target(Personality::Flanker, &p, &roster, &g), Cell::new(12, 6));
    }

    #[test]
    fn flanker_target_is_clamped() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(10, 6), (1, 0));
        let roster = [pursuer(0, Personality::Chaser, Cell::new(2, 6), Cell::new(13, 1))];
        assert_eq!(chase_target(Personality::Flanker, &p, &roster, &g), Cell::new(14, 6));
    }

    #[test]
    fn flanker_without_chaser_targets_player() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(6, 6), (1, 0));
        let roster = [pursuer(2, Personality::Flanker, Cell::new(1, 1), Cell::new(13, 13))];
        assert_eq!(chase_target(Personality::Flanker, &p, &roster, &g), Cell::new(6, 6));
    }

    #[test]
    fn shy_chases_from_afar_and_retreats_up_close() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(1, 1), (0, 0));
        let corner = Cell::new(1, 13);

        let far = [pursuer(3, Personality::Shy, Cell::new(13, 13), corner)];
        assert_eq!(chase_target(Personality::Shy, &p, &far, &g), Cell::new(1, 1));

        // Exactly at the threshold still counts as close.
        let near = [pursuer(3, Personality::Shy, Cell::new(5, 5), corner)];
        assert_eq!(chase_target(Personality::Shy, &p, &near, &g), corner);
    }

    #[test]
    fn shy_absent_from_roster_targets_player() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(4, 4), (0, 0));
        assert_eq!(chase_target(Personality::Shy, &p, &[], &g), Cell::new(4, 4));
    }

    #[test]
    fn frightened_flees_to_farthest_corner() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(2, 3), (0, 0));
        assert_eq!(frightened_target(&p, &g), Cell::new(13, 13));
        let p = player_moving(Cell::new(12, 12), (0, 0));
        assert_eq!(frightened_target(&p, &g), Cell::new(1, 1));
    }

    #[test]
    fn frightened_tie_goes_to_first_corner() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(7, 7), (0, 0));
        assert_eq!(frightened_target(&p, &g), Cell::new(1, 1));
    }

    #[test]
    fn mode_overrides_personality() {
        let g = open_grid(15, 15);
        let p = player_moving(Cell::new(7, 7), (0, 0));
        let mut me = pursuer(1, Personality::Ambusher, Cell::new(3, 3), Cell::new(1, 1));
        me.start = Cell::new(6, 7);

        me.mode = Mode::Scatter;
        assert_eq!(resolve_target(&me, &p, &[], &g), Cell::new(1, 1));
        me.mode = Mode::Eaten;
        assert_eq!(resolve_target(&me, &p, &[], &g), Cell::new(6, 7));
        me.mode = Mode::Frightened;
        assert_eq!(resolve_target(&me, &p, &[], &g), Cell::new(1, 1));
        me.mode = Mode::Chase;
        assert_eq!(resolve_target(&me, &p, &[], &g), Cell::new(7, 7));
    }
}
