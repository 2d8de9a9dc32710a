//! # Studyflow Core Library
//!
//! Core business logic for the Studyflow study-session planner and timer.
//! All operations are available through a standalone CLI binary; any GUI is
//! expected to be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Planner**: a pure function that decomposes an available-time budget
//!   into an ordered sequence of focus and break blocks
//! - **Timer Engine**: a countdown state machine that requires the caller
//!   to invoke `tick()` once per second for progress
//! - **Storage**: SQLite-based session/subject storage and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`generate_plan`]: Build a session plan from a minutes budget
//! - [`SessionTimer`]: Core timer state machine
//! - [`Database`]: Session, subject, and statistics persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod planner;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use planner::{generate_plan, BlockKind, SessionPlan, TimeBlock};
pub use storage::{Config, Database, SessionStore, StudySession, Subject};
pub use timer::{format_m_ss, SessionTimer, TimerState};
