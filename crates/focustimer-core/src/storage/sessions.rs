//! Completed focus sessions, grouped by calendar day.
//!
//! The whole store is one JSON object kept under a single key:
//!
//! ```text
//! { "2026-10-16": [ { "id": "...", "date": "2026-10-16", "duration": 900, "isCountingUp": false } ] }
//! ```
//!
//! Reads are fail-open: a missing, unreadable or malformed blob is an empty
//! store. Every write rewrites the whole blob.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kv::KeyValueStore;
use crate::display::format_clock;
use crate::error::{CoreError, Result};
use crate::timer::{CompletedFocus, FOCUS_TARGET_SECS};

/// Key the sessions blob is stored under unless configured otherwise.
pub const DEFAULT_SESSIONS_KEY: &str = "pomodoroSessions";

/// Day key → sessions in completion order.
pub type DayBuckets = BTreeMap<String, Vec<Session>>;

/// One finished focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: String,
    /// Seconds worked; overtime only when `is_counting_up`.
    pub duration: u64,
    pub is_counting_up: bool,
}

impl Session {
    pub fn new(date: impl Into<String>, duration: u64, is_counting_up: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: date.into(),
            duration,
            is_counting_up,
        }
    }

    pub fn from_completed(date: impl Into<String>, completed: CompletedFocus) -> Self {
        Self::new(date, completed.worked_secs, completed.overflowed)
    }

    /// List line for the session at zero-based `index`, e.g.
    /// `Session 2: 25:00 + 3:05` for an overtime session.
    pub fn label(&self, index: usize) -> String {
        if self.is_counting_up {
            format!(
                "Session {}: {} + {}",
                index + 1,
                format_clock(FOCUS_TARGET_SECS),
                format_clock(self.duration)
            )
        } else {
            format!("Session {}: {}", index + 1, format_clock(self.duration))
        }
    }
}

/// Persists sessions through an injected key-value store.
#[derive(Debug)]
pub struct SessionStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_SESSIONS_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Read every day bucket. Never fails.
    pub fn load_all(&self) -> DayBuckets {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DayBuckets::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read sessions; treating as empty");
                return DayBuckets::new();
            }
        };
        match serde_json::from_str::<DayBuckets>(&raw) {
            Ok(buckets) => buckets,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "malformed sessions blob; treating as empty");
                DayBuckets::new()
            }
        }
    }

    pub fn list_for_day(&self, day: &str) -> Vec<Session> {
        self.load_all().remove(day).unwrap_or_default()
    }

    pub fn count_for_day(&self, day: &str) -> usize {
        self.list_for_day(day).len()
    }

    /// Append to the end of `day`'s bucket and persist. Returns the new bucket.
    ///
    /// # Errors
    /// Returns an error if the session belongs to another day or the write fails.
    pub fn append(&mut self, day: &str, session: Session) -> Result<Vec<Session>> {
        if session.date != day {
            return Err(CoreError::Custom(format!(
                "session {} is dated {}, cannot file it under {day}",
                session.id, session.date
            )));
        }
        let mut all = self.load_all();
        let bucket = all.entry(day.to_string()).or_default();
        bucket.push(session);
        let updated = bucket.clone();
        self.save_all(&all)?;
        tracing::debug!(day, count = updated.len(), "session appended");
        Ok(updated)
    }

    /// Drop the session with `id` from `day`'s bucket and persist.
    ///
    /// An unknown id leaves the store untouched and returns the bucket as is.
    pub fn remove(&mut self, day: &str, id: &str) -> Result<Vec<Session>> {
        let mut all = self.load_all();
        let bucket = all.entry(day.to_string()).or_default();
        let before = bucket.len();
        bucket.retain(|s| s.id != id);
        if bucket.len() == before {
            tracing::debug!(day, id, "no such session; nothing removed");
            return Ok(bucket.clone());
        }
        let updated = bucket.clone();
        self.save_all(&all)?;
        tracing::debug!(day, id, count = updated.len(), "session removed");
        Ok(updated)
    }

    fn save_all(&mut self, all: &DayBuckets) -> Result<()> {
        let json = serde_json::to_string(all)?;
        self.kv.set(&self.key, &json)?;
        Ok(())
    }
}
