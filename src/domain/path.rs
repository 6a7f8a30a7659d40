/// A* shortest-path search over the wraparound grid.
///
/// Uniform step cost 1. The heuristic is the wrap-aware Manhattan distance
/// (`Grid::wrapped_distance`), which is consistent, so the first time a cell
/// is popped its cost is final and each cell is expanded at most once.
///
/// An empty result means "no path": goal is a wall, goal is unreachable,
/// or start already equals goal. Callers treat all three the same way.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use super::entity::Cell;
use super::grid::Grid;

/// Cells from the first step after `start` through `goal` inclusive.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> VecDeque<Cell> {
    if !grid.is_open(goal) {
        return VecDeque::new();
    }
    let start = grid.wrap(start);
    let goal = grid.wrap(goal);

    // Min-heap on (f, insertion seq). The sequence number makes ties stable
    // and keeps `Cell` out of the comparison.
    let mut open: BinaryHeap<Reverse<(i32, u64, Cell)>> = BinaryHeap::new();
    let mut g_score: HashMap<Cell, i32> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    open.push(Reverse((grid.wrapped_distance(start, goal), seq, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }
        if !closed.insert(current) {
            continue;
        }
        let g = g_score[&current];

        for next in grid.neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&next).map_or(true, |&best| tentative < best) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                seq += 1;
                open.push(Reverse((tentative + grid.wrapped_distance(next, goal), seq, next)));
            }
        }
    }

    VecDeque::new()
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> VecDeque<Cell> {
    let mut path = VecDeque::new();
    let mut cur = goal;
    while cur != start {
        path.push_front(cur);
        match came_from.get(&cur) {
            Some(&prev) => cur = prev,
            None => return VecDeque::new(),
        }
    }
    path
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
