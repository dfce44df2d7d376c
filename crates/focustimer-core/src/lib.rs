//! # focustimer Core Library
//!
//! This library provides the core logic for the focustimer Pomodoro + flow-time
//! tracker. The CLI binary is a thin consuming layer over the same library.
//!
//! ## Architecture
//!
//! - **Focus timer**: counts down from 25 minutes, then keeps counting up to
//!   track overtime until the user finishes
//! - **Break timer**: rest countdown armed with a length derived from the
//!   finished focus interval
//! - **Break policy**: proportional break for short intervals, default break
//!   plus 10% of overtime for long ones
//! - **Scheduler**: periodic tick triggers with cancellation, driven manually
//!   in tests and by the wall clock interactively
//! - **Storage**: completed sessions grouped by day in one JSON blob, kept in
//!   an injected key-value store (SQLite or in-memory); TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: composition root owning both timers and the store
//! - [`FocusTimer`] / [`BreakTimer`]: tick-driven state machines
//! - [`compute_break`]: break-length policy
//! - [`SessionStore`]: per-day session persistence
//! - [`Config`]: application configuration management

pub mod clock;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use clock::{DayClock, FixedDayClock, LocalDayClock};
pub use display::format_clock;
pub use engine::{FinishedFocus, FocusEngine};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use storage::{Config, KeyValueStore, MemoryStore, Session, SessionStore, SqliteStore};
pub use timer::{
    compute_break, BreakPhase, BreakTimer, CompletedFocus, FocusPhase, FocusTimer,
    ManualScheduler, Scheduler, TickTarget, WallClockScheduler, DEFAULT_BREAK_SECS,
    FOCUS_TARGET_SECS,
};
