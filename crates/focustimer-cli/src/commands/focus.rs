//! Interactive focus session.
//!
//! Reads one-letter commands from stdin while a wall-clock scheduler drives
//! the timers. Everything runs on a single current-thread task.

use std::time::Duration;

use clap::Subcommand;
use focustimer_core::{
    format_clock, Config, DayClock, Event, FocusEngine, KeyValueStore, LocalDayClock, Scheduler,
    WallClockScheduler, FOCUS_TARGET_SECS,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::open_store;

/// How often the scheduler is polled. Well under the one-second tick.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

const HELP: &str = "commands: s start/pause, f finish, r reset, b start/pause break, d <id> delete, l list, q quit";

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run an interactive session reading commands from stdin
    Run {
        /// Start breaks as soon as they are armed (overrides breaks.auto_start)
        #[arg(long)]
        auto_break: bool,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FocusAction::Run { auto_break } => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let engine = FocusEngine::new(WallClockScheduler::new(), store, LocalDayClock)
                .with_auto_start_break(auto_break || config.breaks.auto_start);
            let console = Console::new(engine, config.display.show_ids);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(session_loop(console));
            // A pending stdin read would otherwise hold the runtime open after `q`.
            runtime.shutdown_background();
            result?;
        }
    }
    Ok(())
}

async fn session_loop<S: Scheduler, K: KeyValueStore, C: DayClock>(
    mut console: Console<S, K, C>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("{HELP}");
    println!("{}", console.status_line());
    let mut last_status = String::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if console.handle_command(line.trim()) == Flow::Quit {
                    break;
                }
            }
            _ = ticker.tick() => {
                for event in console.engine.pump() {
                    if let Some(text) = describe(&event) {
                        println!("{text}");
                    }
                }
                if console.engine.focus().is_running() || console.engine.rest().is_running() {
                    let status = console.status_line();
                    if status != last_status {
                        println!("{status}");
                        last_status = status;
                    }
                }
            }
        }
    }

    tracing::debug!("interactive session closed");
    Ok(())
}

/// Engine plus the presentation state of one interactive session.
struct Console<S: Scheduler, K: KeyValueStore, C: DayClock> {
    engine: FocusEngine<S, K, C>,
    show_ids: bool,
    /// Refreshed from finish and delete results so polling never reads storage.
    sessions_today: usize,
}

impl<S: Scheduler, K: KeyValueStore, C: DayClock> Console<S, K, C> {
    fn new(engine: FocusEngine<S, K, C>, show_ids: bool) -> Self {
        let sessions_today = engine.session_count_today();
        Self {
            engine,
            show_ids,
            sessions_today,
        }
    }

    fn handle_command(&mut self, input: &str) -> Flow {
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };

        let focus_command = matches!(command, "s" | "f" | "r");
        if focus_command && !self.engine.focus_controls_enabled() {
            println!("Break in progress; use b to start or pause it");
            return Flow::Continue;
        }

        let event = match command {
            "" => None,
            "s" => self.engine.toggle_focus(),
            "r" => self.engine.reset_focus(),
            "f" => {
                match self.engine.finish_focus() {
                    Ok((finished, events)) => {
                        self.sessions_today = finished.sessions_today.len();
                        let index = self.sessions_today.saturating_sub(1);
                        println!("{}", finished.session.label(index));
                        for event in &events {
                            if let Some(text) = describe(event) {
                                println!("{text}");
                            }
                        }
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
                None
            }
            "b" => {
                if !self.engine.is_break_active() {
                    println!("No break armed");
                }
                self.engine.toggle_break()
            }
            "d" if arg.is_empty() => {
                println!("usage: d <session id>");
                None
            }
            "d" => match self.engine.delete_session(arg) {
                Ok((remaining, event)) => {
                    self.sessions_today = remaining.len();
                    if event.is_none() {
                        println!("Session not found: {arg}");
                    }
                    event
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    None
                }
            },
            "l" => {
                self.print_sessions();
                None
            }
            "q" => return Flow::Quit,
            _ => {
                println!("{HELP}");
                None
            }
        };

        if let Some(text) = event.as_ref().and_then(describe) {
            println!("{text}");
        }
        Flow::Continue
    }

    fn print_sessions(&mut self) {
        let sessions = self.engine.sessions_today();
        self.sessions_today = sessions.len();
        if sessions.is_empty() {
            println!("No sessions today");
            return;
        }
        for (i, session) in sessions.iter().enumerate() {
            if self.show_ids {
                println!("{}  [{}]", session.label(i), session.id);
            } else {
                println!("{}", session.label(i));
            }
        }
    }

    fn status_line(&self) -> String {
        let focus = self.engine.focus();
        let clock = if focus.is_overflowing() {
            format!(
                "{} + {}",
                format_clock(FOCUS_TARGET_SECS),
                format_clock(focus.remaining_secs())
            )
        } else {
            format_clock(focus.remaining_secs())
        };
        let mut line = format!("Focus {clock}");
        if self.engine.is_break_active() {
            line.push_str(&format!(
                " | Break {}",
                format_clock(self.engine.rest().remaining_secs())
            ));
        }
        line.push_str(&format!(" | Sessions today: {}", self.sessions_today));
        line
    }
}

fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::FocusStarted { remaining_secs, .. } => {
            format!("Focus started at {}", format_clock(*remaining_secs))
        }
        Event::FocusPaused { remaining_secs, .. } => {
            format!("Focus paused at {}", format_clock(*remaining_secs))
        }
        Event::FocusOverflowed { .. } => "Target reached, counting overtime".to_string(),
        Event::FocusFinished { break_secs, .. } => {
            format!("Break earned: {}", format_clock(*break_secs))
        }
        Event::FocusReset { .. } => "Focus reset".to_string(),
        Event::BreakArmed { break_secs, .. } => {
            format!("Break ready: {} (b to start)", format_clock(*break_secs))
        }
        Event::BreakStarted { remaining_secs, .. } => {
            format!("Break started: {}", format_clock(*remaining_secs))
        }
        Event::BreakPaused { remaining_secs, .. } => {
            format!("Break paused at {}", format_clock(*remaining_secs))
        }
        Event::BreakEnded { .. } => "Break over".to_string(),
        Event::SessionDeleted {
            session_id,
            remaining_sessions,
            ..
        } => format!("Session deleted: {session_id} ({remaining_sessions} left today)"),
        Event::StateSnapshot { .. } => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use focustimer_core::{
        FixedDayClock, ManualScheduler, MemoryStore, Session, SessionStore, StorageError,
        DEFAULT_BREAK_SECS,
    };

    /// Memory store that counts reads.
    struct CountingStore {
        inner: MemoryStore,
        reads: Rc<Cell<usize>>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }
    }

    fn console() -> (Console<ManualScheduler, CountingStore, FixedDayClock>, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let store = CountingStore {
            inner: MemoryStore::new(),
            reads: Rc::clone(&reads),
        };
        let engine = FocusEngine::new(
            ManualScheduler::new(),
            SessionStore::new(store),
            FixedDayClock::new("2026-10-16"),
        );
        (Console::new(engine, false), reads)
    }

    #[test]
    fn status_line_uses_cached_session_count() {
        let (mut console, reads) = console();
        console.handle_command("s");
        console.handle_command("f");
        assert!(console.status_line().ends_with("Sessions today: 1"));

        console.handle_command("s");
        let before = reads.get();
        for _ in 0..10 {
            console.engine.scheduler_mut().advance(Duration::from_secs(1));
            console.engine.pump();
            console.status_line();
        }
        assert_eq!(reads.get(), before);
        assert!(console.status_line().starts_with("Focus 24:49"));
    }

    #[test]
    fn delete_refreshes_cached_count() {
        let (mut console, _) = console();
        console.handle_command("s");
        console.handle_command("f");
        let id = console.engine.sessions_today()[0].id.clone();

        console.handle_command(&format!("d {id}"));
        assert!(console.status_line().ends_with("Sessions today: 0"));
        console.handle_command("d unknown");
        assert!(console.status_line().ends_with("Sessions today: 0"));
    }

    #[test]
    fn focus_commands_refused_during_break() {
        let (mut console, _) = console();
        console.handle_command("s");
        for _ in 0..599 {
            console.engine.scheduler_mut().advance(Duration::from_secs(1));
            console.engine.pump();
        }
        console.handle_command("f");
        assert!(console.engine.is_break_active());

        console.handle_command("s");
        assert!(!console.engine.focus().is_running());
        assert_eq!(console.handle_command("q"), Flow::Quit);
    }

    #[test]
    fn describe_skips_snapshots() {
        let snapshot = Event::StateSnapshot {
            focus_phase: focustimer_core::FocusPhase::Idle,
            remaining_secs: FOCUS_TARGET_SECS,
            running: false,
            overflowing: false,
            break_phase: focustimer_core::BreakPhase::Inactive,
            break_remaining_secs: 0,
            is_break_active: false,
            sessions_today: 0,
            at: chrono::Utc::now(),
        };
        assert!(describe(&snapshot).is_none());
    }

    #[test]
    fn describe_formats_break_clock() {
        let event = Event::BreakArmed {
            break_secs: DEFAULT_BREAK_SECS,
            at: chrono::Utc::now(),
        };
        assert_eq!(describe(&event).unwrap(), "Break ready: 5:00 (b to start)");
    }

    #[test]
    fn overtime_label_matches_status_format() {
        let session = Session::new("2026-10-16", 65, true);
        assert_eq!(session.label(0), "Session 1: 25:00 + 1:05");
    }
}
