//! Calendar-day keys.
//!
//! Sessions are bucketed by a `YYYY-MM-DD` key. The engine asks a [`DayClock`]
//! for today's key at the moment a session is recorded or listed.

use chrono::{Local, NaiveDate};

/// Format used for day bucket keys.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

pub trait DayClock {
    fn today(&self) -> String;
}

/// Today's date in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDayClock;

impl DayClock for LocalDayClock {
    fn today(&self) -> String {
        day_key(Local::now().date_naive())
    }
}

/// Always reports the same day.
#[derive(Debug, Clone)]
pub struct FixedDayClock(pub String);

impl FixedDayClock {
    pub fn new(day: impl Into<String>) -> Self {
        Self(day.into())
    }
}

impl DayClock for FixedDayClock {
    fn today(&self) -> String {
        self.0.clone()
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse and normalize a user-supplied day key.
pub fn parse_day_key(input: &str) -> Option<String> {
    NaiveDate::parse_from_str(input.trim(), DAY_KEY_FORMAT)
        .ok()
        .map(day_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_is_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(day_key(date), "2026-03-07");
    }

    #[test]
    fn parse_normalizes_and_rejects() {
        assert_eq!(parse_day_key(" 2026-03-07 ").as_deref(), Some("2026-03-07"));
        assert!(parse_day_key("07/03/2026").is_none());
    }

    #[test]
    fn local_clock_produces_parseable_key() {
        let today = LocalDayClock.today();
        assert_eq!(parse_day_key(&today), Some(today));
    }
}
