//! Focus timer implementation.
//!
//! The focus timer is a tick-driven state machine. It does not use internal
//! threads or wall-clock reads - the owner is responsible for calling `tick()`
//! once per second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> CountingDown -> CountingUp
//!   ^          |              |
//!   +---- pause/finish/reset -+
//! ```
//!
//! The countdown starts at [`FOCUS_TARGET_SECS`]. When a tick observes zero the
//! timer keeps running and counts up from 1, tracking overtime.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.start();
//! // Once per second:
//! timer.tick();
//! let done = timer.finish();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::policy::FOCUS_TARGET_SECS;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPhase {
    Idle,
    CountingDown,
    CountingUp,
}

/// Result of finishing a focus interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedFocus {
    /// Seconds worked: elapsed countdown, or overtime if the target was passed.
    pub worked_secs: u64,
    /// Whether the timer had switched to counting up.
    pub overflowed: bool,
}

impl CompletedFocus {
    /// Full time spent: the target plus overtime when the timer overflowed.
    pub fn total_secs(&self) -> u64 {
        if self.overflowed {
            FOCUS_TARGET_SECS.saturating_add(self.worked_secs)
        } else {
            self.worked_secs
        }
    }
}

/// Countdown/overflow work timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTimer {
    remaining_secs: u64,
    overflowing: bool,
    running: bool,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self {
            remaining_secs: FOCUS_TARGET_SECS,
            overflowing: false,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_overflowing(&self) -> bool {
        self.overflowing
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> FocusPhase {
        match (self.running, self.overflowing) {
            (false, _) => FocusPhase::Idle,
            (true, false) => FocusPhase::CountingDown,
            (true, true) => FocusPhase::CountingUp,
        }
    }

    /// Seconds that `finish()` would record right now.
    pub fn worked_secs(&self) -> u64 {
        if self.overflowing {
            self.remaining_secs
        } else {
            FOCUS_TARGET_SECS.saturating_sub(self.remaining_secs)
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the timer.
    ///
    /// Starting consumes one tick immediately: `remaining` drops by one before
    /// the first periodic tick arrives. This applies in both phases and
    /// saturates at zero.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.running = true;
        Some(Event::FocusStarted {
            remaining_secs: self.remaining_secs,
            overflowing: self.overflowing,
            at: Utc::now(),
        })
    }

    /// Pause keeps `remaining` and `overflowing`; it is not a finish.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::FocusPaused {
            remaining_secs: self.remaining_secs,
            overflowing: self.overflowing,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Call once per second while running.
    ///
    /// Returns `Some(Event::FocusOverflowed)` on the tick that observes zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs == 0 && !self.overflowing {
            self.overflowing = true;
            self.remaining_secs = 1;
            return Some(Event::FocusOverflowed { at: Utc::now() });
        }
        if self.overflowing {
            self.remaining_secs = self.remaining_secs.saturating_add(1);
        } else {
            self.remaining_secs -= 1;
        }
        None
    }

    /// Stop, report the worked duration and return to the initial state.
    pub fn finish(&mut self) -> CompletedFocus {
        let completed = CompletedFocus {
            worked_secs: self.worked_secs(),
            overflowed: self.overflowing,
        };
        self.restore();
        completed
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.restore();
        Some(Event::FocusReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restore(&mut self) {
        self.running = false;
        self.overflowing = false;
        self.remaining_secs = FOCUS_TARGET_SECS;
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}
