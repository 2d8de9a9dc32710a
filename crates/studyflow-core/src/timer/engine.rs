//! Timer engine implementation.
//!
//! The session timer is a countdown state machine over the blocks of a
//! [`SessionPlan`]. It does not use internal threads or read the wall clock
//! for progress - the caller is responsible for calling `tick()` once per
//! second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Completed
//!           |  \
//!           |   cancel -> Idle
//! ```
//!
//! ## Session record lifecycle
//!
//! Exactly one session record is created per timer instance, at construction,
//! and only when the plan contains at least one focus block. The record is
//! finalized (`end_time`, `completed = true`) when the last block runs out.
//! Cancelling never touches the record: a cancelled run stays on disk exactly
//! as created. Store failures are logged and swallowed - losing a record must
//! not stop the countdown.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;
use crate::planner::{BlockKind, SessionPlan, TimeBlock};
use crate::storage::{SessionStore, StudySession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Format a second count as `M:SS` - minutes unpadded, seconds zero-padded.
pub fn format_m_ss(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Core timer engine.
///
/// Counts down through the plan's blocks in order. The engine is plain
/// serializable state; the persistence seam is passed in where a side effect
/// can occur, so a timer can be stored between invocations without dragging a
/// database handle along.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    plan: SessionPlan,
    state: TimerState,
    block_index: usize,
    /// Remaining seconds in the current block.
    seconds_left: u64,
    /// Id of the session record owned by this run, if one was created.
    session_id: Option<Uuid>,
    /// One-shot guard: the creation side effect fires at most once per run.
    #[serde(default)]
    session_created: bool,
}

impl SessionTimer {
    /// Create a new timer over `plan`, activating the first block.
    ///
    /// If the plan is non-empty and contains a focus block, the session
    /// record is created here - before any tick can fire. A plan without
    /// focus blocks never produces a record.
    pub fn new(plan: SessionPlan, store: &dyn SessionStore) -> Self {
        let seconds_left = plan.blocks.first().map(TimeBlock::duration_secs).unwrap_or(0);
        let mut timer = Self {
            plan,
            state: TimerState::Idle,
            block_index: 0,
            seconds_left,
            session_id: None,
            session_created: false,
        };
        timer.create_session_record(store);
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn block_index(&self) -> usize {
        self.block_index
    }

    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    pub fn current_block(&self) -> Option<&TimeBlock> {
        self.plan.blocks.get(self.block_index)
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn total_secs(&self) -> u64 {
        self.current_block().map(TimeBlock::duration_secs).unwrap_or(0)
    }

    /// 0.0 .. 1.0 progress within the current block.
    pub fn block_progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.seconds_left as f64 / total as f64)
    }

    /// 0.0 .. 100.0 progress across the entire plan.
    pub fn plan_progress_pct(&self) -> f64 {
        let total_min = self.plan.total_minutes() as f64;
        if total_min == 0.0 {
            return 0.0;
        }
        let completed_min = self.plan.cumulative_minutes(self.block_index) as f64;
        let current_min = self
            .current_block()
            .map(|b| b.duration_minutes as f64)
            .unwrap_or(0.0);
        let current_elapsed_min = current_min * self.block_progress();
        ((completed_min + current_elapsed_min) / total_min * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let block = self.current_block();
        Event::StateSnapshot {
            state: self.state,
            block_index: self.block_index,
            kind: block.map(|b| b.kind).unwrap_or(BlockKind::Focus),
            block_label: block.map(|b| b.label.clone()).unwrap_or_default(),
            seconds_left: self.seconds_left,
            total_secs: self.total_secs(),
            plan_progress_pct: self.plan_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                let block = self.current_block()?;
                let event = Event::TimerStarted {
                    block_index: self.block_index,
                    kind: block.kind,
                    duration_secs: self.seconds_left,
                    at: Utc::now(),
                };
                self.state = TimerState::Running;
                Some(event)
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    seconds_left: self.seconds_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    seconds_left: self.seconds_left,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Caller-initiated cancel: stop ticking and go back to `Idle`.
    ///
    /// The session record is deliberately NOT finalized - no `end_time`, and
    /// `completed` stays false.
    pub fn cancel(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::Idle;
                Some(Event::TimerCancelled {
                    block_index: self.block_index,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Back to the first block with a full countdown. Does not recreate the
    /// session record - creation is once per timer instance.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.block_index = 0;
        self.seconds_left = self
            .plan
            .blocks
            .first()
            .map(TimeBlock::duration_secs)
            .unwrap_or(0);
        Some(self.snapshot())
    }

    /// Advance the countdown by one second.
    ///
    /// Call once per wall-clock second while the timer runs. No-op unless
    /// `Running` with time left, so a stray tick can never drive the counter
    /// negative. Returns `Some(Event::BlockStarted)` on a block transition and
    /// `Some(Event::SessionCompleted)` when the last block runs out.
    pub fn tick(&mut self, store: &dyn SessionStore) -> Option<Event> {
        if self.state != TimerState::Running || self.seconds_left == 0 {
            return None;
        }
        self.seconds_left -= 1;
        if self.seconds_left > 0 {
            return None;
        }

        // Block exhausted: next block, or terminal state.
        if self.block_index + 1 < self.plan.blocks.len() {
            self.block_index += 1;
            let block = &self.plan.blocks[self.block_index];
            self.seconds_left = block.duration_secs();
            Some(Event::BlockStarted {
                block_index: self.block_index,
                kind: block.kind,
                duration_secs: block.duration_secs(),
                at: Utc::now(),
            })
        } else {
            self.state = TimerState::Completed;
            self.finalize_session_record(store);
            Some(Event::SessionCompleted {
                session_id: self.session_id,
                at: Utc::now(),
            })
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn create_session_record(&mut self, store: &dyn SessionStore) {
        if self.session_created || !self.plan.has_focus_block() {
            return;
        }
        let session = StudySession {
            id: Uuid::new_v4(),
            subject_id: self.plan.subject_id.clone(),
            subject_name: self.plan.subject_name.clone(),
            start_time: Utc::now(),
            end_time: None,
            planned_minutes: self.plan.total_focus_minutes,
            completed: false,
        };
        self.session_id = Some(session.id);
        self.session_created = true;
        if let Err(e) = store.create_session(&session) {
            log::warn!("session record not persisted: {e}");
        }
    }

    fn finalize_session_record(&self, store: &dyn SessionStore) {
        let Some(id) = self.session_id else {
            return;
        };
        if let Err(e) = store.complete_session(id, Utc::now()) {
            log::warn!("session record not finalized: {e}");
        }
    }
}
