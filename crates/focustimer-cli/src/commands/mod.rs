pub mod breaks;
pub mod config;
pub mod focus;
pub mod sessions;

use focustimer_core::{Config, SessionStore, SqliteStore};

/// Open the configured database with the configured sessions key.
pub fn open_store(config: &Config) -> Result<SessionStore<SqliteStore>, Box<dyn std::error::Error>> {
    let db = SqliteStore::open_at(&config.database_path()?)?;
    Ok(SessionStore::with_key(db, config.storage.sessions_key.clone()))
}
