use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::planner::BlockKind;
use crate::timer::TimerState;

/// Every observable state change in the timer produces an Event.
/// Callers poll for events; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        block_index: usize,
        kind: BlockKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    /// The countdown exhausted a block and activated the next one.
    BlockStarted {
        block_index: usize,
        kind: BlockKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Caller-initiated cancel. The session record is left as created.
    TimerCancelled {
        block_index: usize,
        at: DateTime<Utc>,
    },
    /// The final block finished; the session record (if any) was finalized.
    SessionCompleted {
        session_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        block_index: usize,
        kind: BlockKind,
        block_label: String,
        seconds_left: u64,
        total_secs: u64,
        plan_progress_pct: f64,
        at: DateTime<Utc>,
    },
}
