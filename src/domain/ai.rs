/// Pursuer AI: per-agent mode state machine and per-tick movement.
///
/// Modes:
///   1. **Scatter / Chase**: follow the global schedule.
///   2. **Frightened**: session-wide override after a power pellet.
///      Slower, re-plans less often, and deviates randomly.
///   3. **Eaten**: heading home at double speed; leaves this mode only
///      when standing on its start cell.
///
/// Movement is path-following: A* is re-run when the target changes,
/// the cached path runs out, or the cadence counter comes round.

use rand::seq::SliceRandom;
use rand::Rng;

use super::entity::{Cell, Mode, Player, Pursuer};
use super::grid::Grid;
use super::path;
use super::targeting;

/// Re-plan every N actions in Scatter / Chase / Eaten.
pub const RECALC_EVERY: u32 = 6;
/// Re-plan every N actions while Frightened.
pub const RECALC_EVERY_FRIGHTENED: u32 = 8;
/// Chance per action that a frightened pursuer ignores its path.
pub const FRIGHTENED_DEVIATION: f64 = 0.25;

/// Movement pacing knobs, copied out of the speed config.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Ticks skipped between moves in Scatter / Chase.
    pub base_cooldown: u32,
    /// Frightened cooldown multiplier (2.0 = half speed).
    pub frightened_speed_mult: f64,
}

impl Tuning {
    /// Cooldown applied after a move made in `mode`.
    /// Scaled cooldowns round half to even.
    pub fn cooldown_for(&self, mode: Mode) -> u32 {
        let base = self.base_cooldown as f64;
        match mode {
            Mode::Frightened => {
                let scaled = (base * self.frightened_speed_mult).round_ties_even();
                (scaled.max(0.0) as u32).max(1)
            }
            Mode::Eaten => (base * 0.5).round_ties_even() as u32,
            Mode::Scatter | Mode::Chase => self.base_cooldown,
        }
    }
}

// ── Mode refresh ──

/// Apply the global phase and frightened flag to one pursuer.
///
/// Returns `true` when an eaten pursuer has just reached home and
/// respawned into the scheduled phase.
pub fn refresh_mode(pursuer: &mut Pursuer, scheduled: Mode, frightened: bool) -> bool {
    if pursuer.eaten {
        if pursuer.pos == pursuer.start {
            pursuer.eaten = false;
            pursuer.clear_path();
            pursuer.recalc_counter = 0;
            pursuer.cooldown = 0;
            pursuer.mode = scheduled;
            return true;
        }
        pursuer.mode = Mode::Eaten;
        return false;
    }
    pursuer.mode = if frightened { Mode::Frightened } else { scheduled };
    false
}

/// Put a pursuer into Eaten after the player catches it while frightened.
pub fn mark_eaten(pursuer: &mut Pursuer) {
    pursuer.eaten = true;
    pursuer.mode = Mode::Eaten;
    pursuer.clear_path();
}

// ── Per-tick action ──

/// Run one tick for `roster[idx]`: cooldown, targeting, planning, one step.
pub fn act<R: Rng>(
    idx: usize,
    roster: &mut [Pursuer],
    player: &Player,
    grid: &Grid,
    tuning: &Tuning,
    rng: &mut R,
) {
    if roster[idx].cooldown > 0 {
        roster[idx].cooldown -= 1;
        return;
    }

    let target = targeting::resolve_target(&roster[idx], player, roster, grid);
    let g = &mut roster[idx];

    let cadence = if g.mode == Mode::Frightened { RECALC_EVERY_FRIGHTENED } else { RECALC_EVERY };
    let recompute = g.cached_target != Some(target)
        || g.path.is_empty()
        || g.recalc_counter % cadence == 0;

    if recompute {
        let path = path::find_path(grid, g.pos, target);
        tracing::trace!(id = g.id, mode = ?g.mode, ?target, len = path.len(), "re-planned");
        if path.is_empty() {
            g.path.clear();
            random_step(g, grid, rng);
        } else {
            g.path = path;
            g.cached_target = Some(target);
            follow_path(g, grid);
        }
    } else if g.mode == Mode::Frightened && rng.gen_bool(FRIGHTENED_DEVIATION) {
        // Off the cached route now; make the next action re-plan.
        g.path.clear();
        random_step(g, grid, rng);
    } else {
        follow_path(g, grid);
    }

    g.recalc_counter = g.recalc_counter.wrapping_add(1);
    g.cooldown = tuning.cooldown_for(g.mode);
}

fn follow_path(g: &mut Pursuer, grid: &Grid) {
    if let Some(next) = g.path.pop_front() {
        g.pos = grid.wrap(next);
    }
}

/// Step to a uniformly random open neighbor; stay put if there is none.
fn random_step<R: Rng>(g: &mut Pursuer, grid: &Grid, rng: &mut R) {
    let options: Vec<Cell> = grid.neighbors(g.pos).collect();
    if let Some(&next) = options.choose(rng) {
        g.pos = next;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
