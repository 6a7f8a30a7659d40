/// Global phase timeline and the session-wide frightened timer.
///
/// Both are plain data driven by the session clock's `now()`; neither owns
/// a clock, so tests feed them whatever timestamps they like.

use std::time::Duration;

use crate::domain::entity::Mode;

/// A scheduled global phase. Frightened and Eaten never come from here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SchedulePhase {
    Scatter,
    Chase,
}

impl SchedulePhase {
    pub fn mode(self) -> Mode {
        match self {
            SchedulePhase::Scatter => Mode::Scatter,
            SchedulePhase::Chase => Mode::Chase,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scatter" => Some(SchedulePhase::Scatter),
            "chase" => Some(SchedulePhase::Chase),
            _ => None,
        }
    }
}

/// Default timeline, in seconds. The last entry never expires.
pub const DEFAULT_TIMELINE: [(SchedulePhase, f64); 6] = [
    (SchedulePhase::Scatter, 5.0),
    (SchedulePhase::Chase, 10.0),
    (SchedulePhase::Scatter, 5.0),
    (SchedulePhase::Chase, 10.0),
    (SchedulePhase::Scatter, 3.0),
    (SchedulePhase::Chase, 9999.0),
];

pub fn default_timeline() -> Vec<(SchedulePhase, Duration)> {
    DEFAULT_TIMELINE
        .iter()
        .map(|&(p, secs)| (p, Duration::from_secs_f64(secs)))
        .collect()
}

// ══════════════════════════════════════════════════════════════
// ModeScheduler
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ModeScheduler {
    entries: Vec<(SchedulePhase, Duration)>,
    cursor: usize,
    /// Exact scheduled start of the entry under the cursor.
    phase_start: Duration,
}

impl ModeScheduler {
    /// An empty timeline is replaced by the default one.
    pub fn new(entries: Vec<(SchedulePhase, Duration)>, now: Duration) -> Self {
        let entries = if entries.is_empty() { default_timeline() } else { entries };
        ModeScheduler { entries, cursor: 0, phase_start: now }
    }

    /// Advance past every elapsed entry and report the phase at the cursor.
    ///
    /// The next entry starts at the previous entry's scheduled end, never at
    /// `now`, so uneven query times cannot shift the timeline.
    pub fn current_phase(&mut self, now: Duration) -> SchedulePhase {
        let last = self.entries.len() - 1;
        while self.cursor < last {
            let end = self.phase_start + self.entries[self.cursor].1;
            if now < end {
                break;
            }
            self.phase_start = end;
            self.cursor += 1;
        }
        self.entries[self.cursor].0
    }

    /// Jump to the next entry immediately; it starts at `now`.
    pub fn force_advance(&mut self, now: Duration) -> SchedulePhase {
        self.cursor = (self.cursor + 1).min(self.entries.len() - 1);
        self.phase_start = now;
        self.entries[self.cursor].0
    }

    pub fn reset(&mut self, now: Duration) {
        self.cursor = 0;
        self.phase_start = now;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

// ══════════════════════════════════════════════════════════════
// FrightenedTimer
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default)]
pub struct FrightenedTimer {
    active: bool,
    expires_at: Duration,
}

impl FrightenedTimer {
    /// Start, or refresh if already running.
    pub fn start(&mut self, now: Duration, duration: Duration) {
        self.active = true;
        self.expires_at = now + duration;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once an active timer has reached its expiry.
    pub fn is_expired(&self, now: Duration) -> bool {
        self.active && now >= self.expires_at
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        if self.active {
            self.expires_at.saturating_sub(now)
        } else {
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn short_timeline() -> Vec<(SchedulePhase, Duration)> {
        vec![
            (SchedulePhase::Scatter, secs(2.0)),
            (SchedulePhase::Chase, secs(3.0)),
            (SchedulePhase::Scatter, secs(1.0)),
            (SchedulePhase::Chase, secs(1.0)),
        ]
    }

    #[test]
    fn walks_the_timeline() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        assert_eq!(s.current_phase(secs(0.0)), SchedulePhase::Scatter);
        assert_eq!(s.current_phase(secs(1.9)), SchedulePhase::Scatter);
        assert_eq!(s.current_phase(secs(2.0)), SchedulePhase::Chase);
        assert_eq!(s.current_phase(secs(4.9)), SchedulePhase::Chase);
        assert_eq!(s.current_phase(secs(5.0)), SchedulePhase::Scatter);
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn late_query_skips_several_entries() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        assert_eq!(s.current_phase(secs(5.5)), SchedulePhase::Scatter);
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn last_entry_is_unbounded() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        assert_eq!(s.current_phase(secs(10_000.0)), SchedulePhase::Chase);
        assert_eq!(s.cursor(), 3);
        assert_eq!(s.force_advance(secs(10_001.0)), SchedulePhase::Chase);
        assert_eq!(s.cursor(), 3);
    }

    #[test]
    fn uneven_queries_do_not_drift() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        // First boundary observed late, at 2.7s.
        assert_eq!(s.current_phase(secs(2.7)), SchedulePhase::Chase);
        // Chase still ends at exactly 5.0s, not 5.7s.
        assert_eq!(s.current_phase(secs(4.99)), SchedulePhase::Chase);
        assert_eq!(s.current_phase(secs(5.0)), SchedulePhase::Scatter);
    }

    #[test]
    fn force_advance_restarts_from_now() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        assert_eq!(s.force_advance(secs(0.5)), SchedulePhase::Chase);
        // Chase now runs 0.5s..3.5s.
        assert_eq!(s.current_phase(secs(3.4)), SchedulePhase::Chase);
        assert_eq!(s.current_phase(secs(3.5)), SchedulePhase::Scatter);
    }

    #[test]
    fn empty_timeline_uses_default() {
        let mut s = ModeScheduler::new(Vec::new(), Duration::ZERO);
        assert_eq!(s.current_phase(secs(5.0)), SchedulePhase::Chase);
        assert_eq!(s.current_phase(secs(33.0)), SchedulePhase::Chase);
        assert_eq!(s.cursor(), DEFAULT_TIMELINE.len() - 1);
    }

    #[test]
    fn reset_rewinds_cursor() {
        let mut s = ModeScheduler::new(short_timeline(), Duration::ZERO);
        s.current_phase(secs(6.0));
        s.reset(secs(6.0));
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.current_phase(secs(7.9)), SchedulePhase::Scatter);
    }

    #[test]
    fn frightened_timer_expiry_and_refresh() {
        let mut t = FrightenedTimer::default();
        assert!(!t.is_expired(secs(100.0)));
        t.start(secs(1.0), secs(7.0));
        assert!(t.is_active());
        assert!(!t.is_expired(secs(7.9)));
        assert_eq!(t.remaining(secs(5.0)), secs(3.0));

        t.start(secs(4.0), secs(7.0));
        assert!(!t.is_expired(secs(8.0)));
        assert!(t.is_expired(secs(11.0)));
        t.clear();
        assert!(!t.is_expired(secs(11.0)));
        assert_eq!(t.remaining(secs(11.0)), Duration::ZERO);
    }

    #[test]
    fn phase_names_parse() {
        assert_eq!(SchedulePhase::parse("Scatter"), Some(SchedulePhase::Scatter));
        assert_eq!(SchedulePhase::parse(" chase "), Some(SchedulePhase::Chase));
        assert_eq!(SchedulePhase::parse("frightened"), None);
        assert_eq!(SchedulePhase::Chase.mode(), Mode::Chase);
    }
}
