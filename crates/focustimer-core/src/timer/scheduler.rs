//! Periodic tick scheduling.
//!
//! Timers never read the clock themselves. The owner registers a periodic
//! trigger per running timer, cancels it whenever that timer stops, and drains
//! due ticks with [`Scheduler::poll_due`], dispatching each one to the timer
//! named by its [`TickTarget`].
//!
//! Two implementations are provided:
//!
//! - [`ManualScheduler`]: virtual time, advanced explicitly (tests, replays)
//! - [`WallClockScheduler`]: monotonic wall clock (interactive use)

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// One-second cadence used by both timers.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Which timer a periodic trigger drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickTarget {
    Focus,
    Break,
}

/// Cancellation handle returned by [`Scheduler::schedule_periodic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

/// A tick that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub handle: TickHandle,
    pub target: TickTarget,
}

pub trait Scheduler {
    /// Register a trigger firing every `interval`, first after one interval.
    fn schedule_periodic(&mut self, interval: Duration, target: TickTarget) -> TickHandle;

    /// Stop a trigger. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);

    /// Ticks that have come due since the last poll, in firing order.
    fn poll_due(&mut self) -> Vec<Tick>;

    /// Number of live triggers.
    fn pending(&self) -> usize;
}

/// Lets an engine borrow a scheduler that outlives it.
impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule_periodic(&mut self, interval: Duration, target: TickTarget) -> TickHandle {
        (**self).schedule_periodic(interval, target)
    }

    fn cancel(&mut self, handle: TickHandle) {
        (**self).cancel(handle)
    }

    fn poll_due(&mut self) -> Vec<Tick> {
        (**self).poll_due()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }
}

#[derive(Debug, Clone)]
struct Periodic {
    handle: TickHandle,
    target: TickTarget,
    interval: Duration,
    next_due: Duration,
}

/// Trigger bookkeeping shared by both schedulers, in offsets from an origin.
#[derive(Debug, Default, Clone)]
struct Timetable {
    next_id: u64,
    entries: Vec<Periodic>,
}

impl Timetable {
    fn insert(&mut self, now: Duration, interval: Duration, target: TickTarget) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        // A zero interval would fire unboundedly on every poll.
        let interval = interval.max(Duration::from_millis(1));
        self.entries.push(Periodic {
            handle,
            target,
            interval,
            next_due: now + interval,
        });
        handle
    }

    fn remove(&mut self, handle: TickHandle) {
        self.entries.retain(|p| p.handle != handle);
    }

    fn drain_until(&mut self, now: Duration) -> Vec<Tick> {
        let mut fired: Vec<(Duration, TickHandle, TickTarget)> = Vec::new();
        for entry in &mut self.entries {
            while entry.next_due <= now {
                fired.push((entry.next_due, entry.handle, entry.target));
                entry.next_due += entry.interval;
            }
        }
        fired.sort_by_key(|(at, handle, _)| (*at, *handle));
        fired
            .into_iter()
            .map(|(_, handle, target)| Tick { handle, target })
            .collect()
    }
}

/// Scheduler driven by an explicit virtual clock.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    now: Duration,
    table: Timetable,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the virtual clock forward. Ticks are collected on the next poll.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&mut self, interval: Duration, target: TickTarget) -> TickHandle {
        self.table.insert(self.now, interval, target)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.table.remove(handle);
    }

    fn poll_due(&mut self) -> Vec<Tick> {
        self.table.drain_until(self.now)
    }

    fn pending(&self) -> usize {
        self.table.entries.len()
    }
}

/// Scheduler driven by [`Instant`].
#[derive(Debug, Clone)]
pub struct WallClockScheduler {
    origin: Instant,
    table: Timetable,
}

impl WallClockScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            table: Timetable::default(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for WallClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for WallClockScheduler {
    fn schedule_periodic(&mut self, interval: Duration, target: TickTarget) -> TickHandle {
        let now = self.elapsed();
        self.table.insert(now, interval, target)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.table.remove(handle);
    }

    fn poll_due(&mut self) -> Vec<Tick> {
        let now = self.elapsed();
        self.table.drain_until(now)
    }

    fn pending(&self) -> usize {
        self.table.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_before_first_interval() {
        let mut sched = ManualScheduler::new();
        sched.schedule_periodic(TICK_INTERVAL, TickTarget::Focus);
        sched.advance(Duration::from_millis(999));
        assert!(sched.poll_due().is_empty());
        sched.advance(Duration::from_millis(1));
        assert_eq!(sched.poll_due().len(), 1);
    }

    #[test]
    fn fires_once_per_interval_elapsed() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule_periodic(TICK_INTERVAL, TickTarget::Break);
        sched.advance(Duration::from_secs(5));
        let ticks = sched.poll_due();
        assert_eq!(ticks.len(), 5);
        assert!(ticks.iter().all(|t| t.handle == handle && t.target == TickTarget::Break));
        assert!(sched.poll_due().is_empty());
    }

    #[test]
    fn cancelled_trigger_never_fires() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule_periodic(TICK_INTERVAL, TickTarget::Focus);
        sched.advance(Duration::from_secs(1));
        sched.cancel(handle);
        assert!(sched.poll_due().is_empty());
        assert_eq!(sched.pending(), 0);
        sched.cancel(handle);
    }

    #[test]
    fn interleaves_triggers_in_time_order() {
        let mut sched = ManualScheduler::new();
        sched.schedule_periodic(TICK_INTERVAL, TickTarget::Focus);
        sched.advance(Duration::from_millis(500));
        sched.schedule_periodic(TICK_INTERVAL, TickTarget::Break);
        sched.advance(Duration::from_secs(2));
        let targets: Vec<_> = sched.poll_due().into_iter().map(|t| t.target).collect();
        assert_eq!(
            targets,
            vec![
                TickTarget::Focus,
                TickTarget::Break,
                TickTarget::Focus,
                TickTarget::Break,
            ]
        );
    }

    #[test]
    fn wall_clock_starts_empty() {
        let mut sched = WallClockScheduler::new();
        sched.schedule_periodic(Duration::from_secs(3600), TickTarget::Focus);
        assert!(sched.poll_due().is_empty());
        assert_eq!(sched.pending(), 1);
    }
}
