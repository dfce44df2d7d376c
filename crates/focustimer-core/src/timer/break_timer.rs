//! Rest countdown.
//!
//! Armed with a length computed from the finished focus interval, then
//! started and paused independently of the focus timer. The break ends (and
//! the timer deactivates) on the tick that brings `remaining` to zero.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakPhase {
    Inactive,
    ArmedPaused,
    ArmedRunning,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakTimer {
    remaining_secs: u64,
    active: bool,
    running: bool,
}

impl BreakTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> BreakPhase {
        match (self.active, self.running) {
            (false, _) => BreakPhase::Inactive,
            (true, false) => BreakPhase::ArmedPaused,
            (true, true) => BreakPhase::ArmedRunning,
        }
    }

    /// Arm (or re-arm) the break. Overwrites any break in progress.
    ///
    /// A zero-length break is over before it starts, so the timer stays inactive.
    pub fn arm(&mut self, break_secs: u64) -> Option<Event> {
        self.remaining_secs = break_secs;
        self.running = false;
        self.active = break_secs > 0;
        if !self.active {
            return None;
        }
        Some(Event::BreakArmed {
            break_secs,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if !self.active || self.running {
            return None;
        }
        self.running = true;
        Some(Event::BreakStarted {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.active || !self.running {
            return None;
        }
        self.running = false;
        Some(Event::BreakPaused {
            remaining_secs: self.remaining_secs,
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

    /// Call once per second while running. Returns `Some(Event::BreakEnded)`
    /// on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }
        self.running = false;
        self.active = false;
        Some(Event::BreakEnded { at: Utc::now() })
    }
}
