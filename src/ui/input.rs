/// Input state tracker.
///
/// Drains pending terminal events once per frame and turns key presses into
/// session commands. Every Press or Repeat queues a command, so holding an
/// arrow key walks the player one cell per repeat.
///
/// Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

/// What a key press asks the session to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    /// Debug: jump the global schedule forward.
    AdvanceSchedule,
    Restart,
    Quit,
}

pub struct InputState {
    /// Commands decoded during the most recent `drain_events()` call.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(cmd) = command_for(key) {
                    self.commands.push(cmd);
                }
            }
        }
    }

    /// Commands from this frame, in arrival order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn quit_requested(&self) -> bool {
        self.commands.contains(&Command::Quit)
    }
}

/// Key → command mapping. Arrows and WASD move; `s` without Shift is the
/// schedule debug key, so WASD "down" is only the capital `S`.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let cmd = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(MoveDir::Up),
        KeyCode::Down | KeyCode::Char('S') => Command::Move(MoveDir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(MoveDir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Move(MoveDir::Right),
        KeyCode::Char('s') => Command::AdvanceSchedule,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_move() {
        assert_eq!(command_for(key(KeyCode::Left)), Some(Command::Move(MoveDir::Left)));
        assert_eq!(command_for(key(KeyCode::Char('w'))), Some(Command::Move(MoveDir::Up)));
        assert_eq!(command_for(key(KeyCode::Char('d'))), Some(Command::Move(MoveDir::Right)));
        assert_eq!(command_for(key(KeyCode::Char('S'))), Some(Command::Move(MoveDir::Down)));
        assert_eq!(command_for(key(KeyCode::Down)), Some(Command::Move(MoveDir::Down)));
    }

    #[test]
    fn meta_keys() {
        assert_eq!(command_for(key(KeyCode::Char('s'))), Some(Command::AdvanceSchedule));
        assert_eq!(command_for(key(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(command_for(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for(key(KeyCode::Char('c'))), None);
        assert_eq!(command_for(key(KeyCode::F(1))), None);
    }
}
