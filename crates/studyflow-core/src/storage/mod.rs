mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, Stats, StudySession, Subject, WeekStats};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;

/// The narrow persistence capability the timer consumes: create one session
/// record, and finalize it on natural completion. Both calls are
/// fire-and-forget from the timer's perspective - it never retries and never
/// blocks the countdown on the outcome.
pub trait SessionStore {
    fn create_session(&self, session: &StudySession) -> Result<(), DatabaseError>;
    fn complete_session(&self, id: Uuid, end_time: DateTime<Utc>) -> Result<(), DatabaseError>;
}

/// Returns `~/.config/studyflow[-dev]/` based on STUDYFLOW_ENV.
///
/// Set STUDYFLOW_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyflow-dev")
    } else {
        base_dir.join("studyflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
