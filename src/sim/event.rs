/// Events emitted during a simulation step.
/// The presentation layer consumes these for the status line and the log.

use crate::domain::entity::{Cell, Personality};
use super::schedule::SchedulePhase;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PelletEaten { at: Cell },
    PowerPelletEaten { at: Cell },
    FrightenedStarted,
    FrightenedEnded,
    PhaseChanged { phase: SchedulePhase },
    PursuerEaten { id: usize, personality: Personality, bonus: u32 },
    PursuerRespawned { id: usize },
    PlayerCaught { by: usize, lives_left: u32 },
    Won,
    Lost,
}
