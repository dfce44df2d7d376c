//! Focus engine: wires the timers, the scheduler and the session store.
//!
//! The engine owns one [`FocusTimer`] and one [`BreakTimer`], each with at
//! most one outstanding periodic trigger. Whenever a timer starts or stops the
//! engine cancels that timer's trigger before registering a new one, so a
//! stopped timer can never receive an orphaned tick.
//!
//! Finishing a focus interval records a [`Session`] for today, turns the total
//! time spent (target plus any overtime) into a break length with
//! [`compute_break`], and arms the break timer with it. The break timer never
//! looks at the focus timer.
//!
//! The engine does not block focus controls during a break. Consumers should
//! check [`FocusEngine::focus_controls_enabled`] before offering them.

use chrono::Utc;

use crate::clock::DayClock;
use crate::display::format_clock;
use crate::error::Result;
use crate::events::Event;
use crate::storage::{KeyValueStore, Session, SessionStore};
use crate::timer::{
    compute_break, BreakTimer, FocusTimer, Scheduler, TickHandle, TickTarget, TICK_INTERVAL,
};

/// What a finish produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedFocus {
    pub session: Session,
    pub break_secs: u64,
    /// Today's sessions after recording this one.
    pub sessions_today: Vec<Session>,
}

pub struct FocusEngine<S: Scheduler, K: KeyValueStore, C: DayClock> {
    focus: FocusTimer,
    rest: BreakTimer,
    scheduler: S,
    store: SessionStore<K>,
    clock: C,
    focus_tick: Option<TickHandle>,
    break_tick: Option<TickHandle>,
    auto_start_break: bool,
}

impl<S: Scheduler, K: KeyValueStore, C: DayClock> FocusEngine<S, K, C> {
    pub fn new(scheduler: S, store: SessionStore<K>, clock: C) -> Self {
        Self {
            focus: FocusTimer::new(),
            rest: BreakTimer::new(),
            scheduler,
            store,
            clock,
            focus_tick: None,
            break_tick: None,
            auto_start_break: false,
        }
    }

    /// Start the break countdown as soon as a finish arms it.
    pub fn with_auto_start_break(mut self, enabled: bool) -> Self {
        self.auto_start_break = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn focus(&self) -> &FocusTimer {
        &self.focus
    }

    pub fn rest(&self) -> &BreakTimer {
        &self.rest
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &SessionStore<K> {
        &self.store
    }

    pub fn today(&self) -> String {
        self.clock.today()
    }

    pub fn is_break_active(&self) -> bool {
        self.rest.is_active()
    }

    /// False while a break is in progress; focus start/finish should be hidden.
    pub fn focus_controls_enabled(&self) -> bool {
        !self.rest.is_active()
    }

    pub fn sessions_today(&self) -> Vec<Session> {
        self.store.list_for_day(&self.clock.today())
    }

    pub fn session_count_today(&self) -> usize {
        self.sessions_today().len()
    }

    /// Read-only state for anything mirroring the timers elsewhere.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            focus_phase: self.focus.phase(),
            remaining_secs: self.focus.remaining_secs(),
            running: self.focus.is_running(),
            overflowing: self.focus.is_overflowing(),
            break_phase: self.rest.phase(),
            break_remaining_secs: self.rest.remaining_secs(),
            is_break_active: self.rest.is_active(),
            sessions_today: self.session_count_today(),
            at: Utc::now(),
        }
    }

    // ── Focus commands ───────────────────────────────────────────────

    pub fn start_focus(&mut self) -> Option<Event> {
        let event = self.focus.start();
        self.sync_focus_trigger();
        event
    }

    pub fn pause_focus(&mut self) -> Option<Event> {
        let event = self.focus.pause();
        self.sync_focus_trigger();
        event
    }

    pub fn toggle_focus(&mut self) -> Option<Event> {
        let event = self.focus.toggle();
        self.sync_focus_trigger();
        event
    }

    /// Record the interval, compute the break and arm the break timer.
    ///
    /// # Errors
    /// Returns an error if the session cannot be persisted. The focus timer is
    /// reset and the break armed regardless.
    pub fn finish_focus(&mut self) -> Result<(FinishedFocus, Vec<Event>)> {
        let completed = self.focus.finish();
        self.sync_focus_trigger();

        let break_secs = compute_break(completed.total_secs());
        let mut events = Vec::new();
        events.extend(self.rest.arm(break_secs));
        if self.auto_start_break {
            events.extend(self.rest.start());
        }
        self.sync_break_trigger();

        let today = self.clock.today();
        let session = Session::from_completed(today.clone(), completed);
        let sessions_today = self.store.append(&today, session.clone())?;

        tracing::info!(
            "Session {} finished. Total time: {}",
            sessions_today.len(),
            format_clock(completed.total_secs())
        );

        events.insert(
            0,
            Event::FocusFinished {
                session_id: session.id.clone(),
                worked_secs: completed.worked_secs,
                overflowed: completed.overflowed,
                break_secs,
                at: Utc::now(),
            },
        );

        Ok((
            FinishedFocus {
                session,
                break_secs,
                sessions_today,
            },
            events,
        ))
    }

    pub fn reset_focus(&mut self) -> Option<Event> {
        let event = self.focus.reset();
        self.sync_focus_trigger();
        event
    }

    // ── Break commands ───────────────────────────────────────────────

    pub fn start_break(&mut self) -> Option<Event> {
        let event = self.rest.start();
        self.sync_break_trigger();
        event
    }

    pub fn pause_break(&mut self) -> Option<Event> {
        let event = self.rest.pause();
        self.sync_break_trigger();
        event
    }

    pub fn toggle_break(&mut self) -> Option<Event> {
        let event = self.rest.toggle();
        self.sync_break_trigger();
        event
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Delete one of today's sessions. Unknown ids are ignored.
    pub fn delete_session(&mut self, id: &str) -> Result<(Vec<Session>, Option<Event>)> {
        let today = self.clock.today();
        let before = self.store.count_for_day(&today);
        let remaining = self.store.remove(&today, id)?;
        let event = (remaining.len() < before).then(|| Event::SessionDeleted {
            session_id: id.to_string(),
            remaining_sessions: remaining.len(),
            at: Utc::now(),
        });
        Ok((remaining, event))
    }

    // ── Ticking ──────────────────────────────────────────────────────

    /// Dispatch every tick that has come due. Ticks from triggers that were
    /// cancelled earlier in the same batch are dropped.
    pub fn pump(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for tick in self.scheduler.poll_due() {
            match tick.target {
                TickTarget::Focus => {
                    if self.focus_tick != Some(tick.handle) {
                        continue;
                    }
                    events.extend(self.focus.tick());
                }
                TickTarget::Break => {
                    if self.break_tick != Some(tick.handle) {
                        continue;
                    }
                    if let Some(ended) = self.rest.tick() {
                        tracing::info!("break over");
                        events.push(ended);
                        self.sync_break_trigger();
                    }
                }
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sync_focus_trigger(&mut self) {
        if let Some(handle) = self.focus_tick.take() {
            self.scheduler.cancel(handle);
        }
        if self.focus.is_running() {
            self.focus_tick = Some(
                self.scheduler
                    .schedule_periodic(TICK_INTERVAL, TickTarget::Focus),
            );
        }
    }

    fn sync_break_trigger(&mut self) {
        if let Some(handle) = self.break_tick.take() {
            self.scheduler.cancel(handle);
        }
        if self.rest.is_running() {
            self.break_tick = Some(
                self.scheduler
                    .schedule_periodic(TICK_INTERVAL, TickTarget::Break),
            );
        }
    }
}

impl<S: Scheduler, K: KeyValueStore, C: DayClock> Drop for FocusEngine<S, K, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.focus_tick.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.break_tick.take() {
            self.scheduler.cancel(handle);
        }
    }
}
