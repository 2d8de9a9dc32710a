//! SQLite-based session and subject storage.
//!
//! Provides persistent storage for:
//! - Study session records (created by the timer, finalized on completion)
//! - Subjects the user studies
//! - Weekly and all-time statistics
//! - Key-value store for application state

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{data_dir, SessionStore};
use crate::error::DatabaseError;

/// One timer run, as persisted.
///
/// Created with `completed = false` and no `end_time`; finalized once when the
/// timer reaches its terminal state. A cancelled run is never finalized and
/// keeps this initial shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub subject_id: String,
    pub subject_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub planned_minutes: u64,
    pub completed: bool,
}

/// A subject/course the user studies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Statistics for the current week (Monday-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekStats {
    pub week_start: NaiveDate,
    pub study_minutes: u64,
    pub sessions_completed: u64,
}

/// All-time statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub study_minutes: u64,
}

const DEFAULT_SUBJECTS: [(&str, &str, &str); 5] = [
    ("1", "Project Management", "#2563eb"),
    ("2", "Data Structures", "#059669"),
    ("3", "Computer Hardware", "#7c3aed"),
    ("4", "Calculus 2", "#dc2626"),
    ("5", "Organizational Leadership", "#ea580c"),
];

/// Start of the week (Monday) containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// SQLite database for session, subject, and statistics storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/studyflow/studyflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(DatabaseError::DataDir)?;
        let path = dir.join("studyflow.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id              TEXT PRIMARY KEY,
                    subject_id      TEXT NOT NULL,
                    subject_name    TEXT NOT NULL,
                    start_time      TEXT NOT NULL,
                    end_time        TEXT,
                    planned_minutes INTEGER NOT NULL,
                    completed       INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS subjects (
                    id    TEXT PRIMARY KEY,
                    name  TEXT NOT NULL,
                    color TEXT
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_end_time ON sessions(end_time);
                CREATE INDEX IF NOT EXISTS idx_sessions_completed ON sessions(completed);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        self.seed_subjects()?;
        Ok(())
    }

    /// Seed the original default subject set on first run.
    fn seed_subjects(&self) -> Result<(), DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        for (id, name, color) in DEFAULT_SUBJECTS {
            self.conn.execute(
                "INSERT INTO subjects (id, name, color) VALUES (?1, ?2, ?3)",
                params![id, name, color],
            )?;
        }
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Insert a freshly created session record.
    pub fn insert_session(&self, session: &StudySession) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, subject_id, subject_name, start_time, end_time,
                                   planned_minutes, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id.to_string(),
                session.subject_id,
                session.subject_name,
                session.start_time.to_rfc3339(),
                session.end_time.map(|t| t.to_rfc3339()),
                session.planned_minutes,
                session.completed,
            ],
        )?;
        Ok(())
    }

    /// Finalize a session: set `end_time` and mark it completed.
    pub fn finalize_session(
        &self,
        id: Uuid,
        end_time: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE sessions SET end_time = ?2, completed = 1 WHERE id = ?1",
            params![id.to_string(), end_time.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "session",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_session(&self, id: Uuid) -> Result<Option<StudySession>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, subject_name, start_time, end_time, planned_minutes, completed
             FROM sessions WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id.to_string()], session_from_row);
        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Recent sessions, newest first. Includes cancelled (never-finalized)
    /// records so they stay visible.
    pub fn list_sessions(&self, limit: usize) -> Result<Vec<StudySession>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, subject_name, start_time, end_time, planned_minutes, completed
             FROM sessions ORDER BY start_time DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], session_from_row)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    fn completed_sessions(&self) -> Result<Vec<StudySession>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, subject_name, start_time, end_time, planned_minutes, completed
             FROM sessions WHERE completed = 1 AND end_time IS NOT NULL",
        )?;
        let rows = stmt.query_map([], session_from_row)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// Stats for the week containing today.
    pub fn stats_week(&self) -> Result<WeekStats, DatabaseError> {
        self.stats_week_from(Utc::now().date_naive())
    }

    fn stats_week_from(&self, today: NaiveDate) -> Result<WeekStats, DatabaseError> {
        let week_start = week_start(today);
        let mut stats = WeekStats {
            week_start,
            study_minutes: 0,
            sessions_completed: 0,
        };
        for session in self.completed_sessions()? {
            let Some(end_time) = session.end_time else {
                continue;
            };
            if end_time.date_naive() < week_start {
                continue;
            }
            stats.sessions_completed += 1;
            stats.study_minutes += session_minutes(&session, end_time);
        }
        Ok(stats)
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let total_sessions: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        let mut stats = Stats {
            total_sessions,
            ..Stats::default()
        };
        for session in self.completed_sessions()? {
            let Some(end_time) = session.end_time else {
                continue;
            };
            stats.completed_sessions += 1;
            stats.study_minutes += session_minutes(&session, end_time);
        }
        Ok(stats)
    }

    // ── Subjects ─────────────────────────────────────────────────────

    pub fn list_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM subjects ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Subject {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
            })
        })?;
        let mut subjects = Vec::new();
        for row in rows {
            subjects.push(row?);
        }
        Ok(subjects)
    }

    pub fn get_subject(&self, id: &str) -> Result<Option<Subject>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM subjects WHERE id = ?1")?;
        let result = stmt.query_row(params![id], |row| {
            Ok(Subject {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
            })
        });
        match result {
            Ok(subject) => Ok(Some(subject)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn add_subject(&self, subject: &Subject) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO subjects (id, name, color) VALUES (?1, ?2, ?3)",
            params![subject.id, subject.name, subject.color],
        )?;
        Ok(())
    }

    pub fn remove_subject(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "subject",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn create_session(&self, session: &StudySession) -> Result<(), DatabaseError> {
        self.insert_session(session)
    }

    fn complete_session(&self, id: Uuid, end_time: DateTime<Utc>) -> Result<(), DatabaseError> {
        self.finalize_session(id, end_time)
    }
}

/// Actual session length in whole minutes, rounded.
fn session_minutes(session: &StudySession, end_time: DateTime<Utc>) -> u64 {
    let secs = (end_time - session.start_time).num_seconds().max(0);
    ((secs as f64) / 60.0).round() as u64
}

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudySession> {
    let id: String = row.get(0)?;
    let start: String = row.get(3)?;
    let end: Option<String> = row.get(4)?;
    Ok(StudySession {
        id: id
            .parse()
            .map_err(|e| conversion_failure(0, e))?,
        subject_id: row.get(1)?,
        subject_name: row.get(2)?,
        start_time: parse_rfc3339(&start).map_err(|e| conversion_failure(3, e))?,
        end_time: match end {
            Some(s) => Some(parse_rfc3339(&s).map_err(|e| conversion_failure(4, e))?),
            None => None,
        },
        planned_minutes: row.get(5)?,
        completed: row.get(6)?,
    })
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

fn conversion_failure(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}
