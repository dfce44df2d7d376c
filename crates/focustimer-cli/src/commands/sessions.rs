use clap::Subcommand;
use focustimer_core::clock::parse_day_key;
use focustimer_core::{Config, DayClock, LocalDayClock};

use super::open_store;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List sessions recorded on a day
    List {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count sessions recorded on a day
    Count {
        /// Day to count (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a session by id
    Delete {
        /// Session ID
        id: String,
        /// Day the session was recorded on (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn resolve_day(date: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match date {
        Some(raw) => parse_day_key(&raw).ok_or_else(|| format!("invalid date: {raw}").into()),
        None => Ok(LocalDayClock.today()),
    }
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match action {
        SessionsAction::List { date, json } => {
            let day = resolve_day(date)?;
            let sessions = store.list_for_day(&day);
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No sessions on {day}");
            } else {
                for (i, session) in sessions.iter().enumerate() {
                    if config.display.show_ids {
                        println!("{}  [{}]", session.label(i), session.id);
                    } else {
                        println!("{}", session.label(i));
                    }
                }
            }
        }
        SessionsAction::Count { date } => {
            let day = resolve_day(date)?;
            println!("{}", store.count_for_day(&day));
        }
        SessionsAction::Delete { id, date } => {
            let day = resolve_day(date)?;
            let before = store.count_for_day(&day);
            let remaining = store.remove(&day, &id)?;
            if remaining.len() < before {
                println!("Session deleted: {id}");
            } else {
                println!("Session not found: {id}");
            }
        }
    }
    Ok(())
}
