use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{BreakPhase, FocusPhase};

/// Every state change in the system produces an Event.
/// The consuming layer prints or mirrors them; nothing in the core reacts to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FocusStarted {
        remaining_secs: u64,
        overflowing: bool,
        at: DateTime<Utc>,
    },
    FocusPaused {
        remaining_secs: u64,
        overflowing: bool,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero and the timer switched to counting up.
    FocusOverflowed {
        at: DateTime<Utc>,
    },
    FocusFinished {
        session_id: String,
        worked_secs: u64,
        overflowed: bool,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    FocusReset {
        at: DateTime<Utc>,
    },
    BreakArmed {
        break_secs: u64,
        at: DateTime<Utc>,
    },
    BreakStarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    BreakPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    BreakEnded {
        at: DateTime<Utc>,
    },
    SessionDeleted {
        session_id: String,
        remaining_sessions: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        focus_phase: FocusPhase,
        remaining_secs: u64,
        running: bool,
        overflowing: bool,
        break_phase: BreakPhase,
        break_remaining_secs: u64,
        is_break_active: bool,
        sessions_today: usize,
        at: DateTime<Utc>,
    },
}
