/// The step function: advances the session by one tick.
///
/// Processing order:
///   1. Clock tick hook
///   2. Player takes its queued step
///   3. Pellet pickup (a power pellet starts frightened)
///   4. Win check (ends the tick)
///   5. Frightened expiry
///   6. Mode refresh from schedule + frightened flag (eaten respawn here)
///   7. Every pursuer acts
///   8. Collision sweep
///
/// Infallible: every state has a valid successor.

use std::time::Duration;

use crate::domain::ai;
use crate::domain::entity::Mode;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

/// Ticks a HUD message stays up.
const MESSAGE_TICKS: u32 = 24;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 { world.message.clear(); }
    }

    world.clock.on_tick();
    let now = world.clock.now();

    world.player.advance();
    resolve_pellets(world, now, &mut events);
    if resolve_win(world, &mut events) { return events; }
    resolve_frightened_expiry(world, now, &mut events);
    resolve_modes(world, now, &mut events);
    resolve_pursuers(world);
    resolve_collisions(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Pellets
// ══════════════════════════════════════════════════════════════

fn resolve_pellets(world: &mut WorldState, now: Duration, events: &mut Vec<GameEvent>) {
    let at = world.player.pos;
    if !world.pellets.remove(&at) { return; }

    world.player.score += world.scoring.pellet;
    events.push(GameEvent::PelletEaten { at });

    if world.power_pellets.remove(&at) {
        world.frightened.start(now, world.frightened_for);
        for g in world.pursuers.iter_mut().filter(|g| !g.eaten) {
            g.mode = Mode::Frightened;
        }
        events.push(GameEvent::PowerPelletEaten { at });
        events.push(GameEvent::FrightenedStarted);
        tracing::debug!(?at, secs = world.frightened_for.as_secs_f64(), "frightened started");
    }
}

fn resolve_win(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if !world.pellets.is_empty() { return false; }
    world.phase = Phase::Won;
    world.set_message("YOU WIN!", u32::MAX);
    events.push(GameEvent::Won);
    tracing::info!(score = world.player.score, ticks = world.tick, "session won");
    true
}

// ══════════════════════════════════════════════════════════════
// Timers and modes
// ══════════════════════════════════════════════════════════════

fn resolve_frightened_expiry(world: &mut WorldState, now: Duration, events: &mut Vec<GameEvent>) {
    if world.frightened.is_expired(now) {
        world.frightened.clear();
        events.push(GameEvent::FrightenedEnded);
        tracing::debug!("frightened ended");
    }
}

fn resolve_modes(world: &mut WorldState, now: Duration, events: &mut Vec<GameEvent>) {
    let phase = world.scheduler.current_phase(now);
    if phase != world.schedule_phase {
        world.schedule_phase = phase;
        events.push(GameEvent::PhaseChanged { phase });
        tracing::debug!(?phase, cursor = world.scheduler.cursor(), "phase changed");
    }

    let frightened = world.frightened.is_active();
    for g in world.pursuers.iter_mut() {
        if ai::refresh_mode(g, phase.mode(), frightened) {
            events.push(GameEvent::PursuerRespawned { id: g.id });
            tracing::debug!(id = g.id, "pursuer respawned");
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_pursuers(world: &mut WorldState) {
    for i in 0..world.pursuers.len() {
        ai::act(i, &mut world.pursuers, &world.player, &world.grid, &world.tuning, &mut world.rng);
    }
}

// ══════════════════════════════════════════════════════════════
// Collisions
// ══════════════════════════════════════════════════════════════

/// Frightened pursuers on the player's cell are eaten; the first live one
/// catches the player and ends the sweep.
fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let at = world.player.pos;
    for i in 0..world.pursuers.len() {
        if world.pursuers[i].pos != at { continue; }

        if world.pursuers[i].is_frightened() {
            let bonus = world.scoring.capture_bonus;
            world.player.score += bonus;
            let g = &mut world.pursuers[i];
            ai::mark_eaten(g);
            events.push(GameEvent::PursuerEaten { id: g.id, personality: g.personality, bonus });
            tracing::debug!(id = g.id, personality = g.personality.name(), bonus, "pursuer eaten");
            world.set_message(&format!("+{bonus}"), MESSAGE_TICKS);
        } else if !world.pursuers[i].eaten {
            catch_player(world, i, events);
            break;
        }
    }
}

fn catch_player(world: &mut WorldState, by: usize, events: &mut Vec<GameEvent>) {
    world.player.lives = world.player.lives.saturating_sub(1);
    let lives_left = world.player.lives;
    events.push(GameEvent::PlayerCaught { by: world.pursuers[by].id, lives_left });
    tracing::debug!(by = world.pursuers[by].id, lives_left, "player caught");

    if lives_left == 0 {
        world.phase = Phase::Lost;
        world.set_message("GAME OVER", u32::MAX);
        events.push(GameEvent::Lost);
        tracing::info!(score = world.player.score, ticks = world.tick, "session lost");
        return;
    }

    // Pellets stay as they are.
    world.player.respawn();
    for g in world.pursuers.iter_mut() {
        g.reset();
    }
    world.set_message(&format!("CAUGHT! {lives_left} left"), MESSAGE_TICKS);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
