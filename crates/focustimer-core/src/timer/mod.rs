mod break_timer;
mod focus;
mod policy;
mod scheduler;

pub use break_timer::{BreakPhase, BreakTimer};
pub use focus::{CompletedFocus, FocusPhase, FocusTimer};
pub use policy::{compute_break, DEFAULT_BREAK_SECS, FOCUS_TARGET_SECS};
pub use scheduler::{
    ManualScheduler, Scheduler, Tick, TickHandle, TickTarget, WallClockScheduler, TICK_INTERVAL,
};
