//! Session plan generation.
//!
//! [`generate_plan`] converts a single available-minutes budget into an
//! ordered sequence of focus and break blocks. The function is pure and total:
//! a non-positive budget yields an empty plan, everything else is covered by
//! the fixed block policy below.

use serde::{Deserialize, Serialize};

/// Minimum length of a focus block in minutes.
///
/// A focus block is never shorter than this, even when less time remains in
/// the budget. The resulting overshoot is intentional fixed-floor behavior.
pub const FOCUS_MIN: u64 = 60;
/// Maximum length of a focus block in minutes.
pub const FOCUS_MAX: u64 = 90;
/// Short break length in minutes (truncated when less time remains).
pub const SHORT_BREAK: u64 = 15;
/// Long break length in minutes. Used at most once per plan.
pub const LONG_BREAK: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Focus,
    ShortBreak,
    LongBreak,
}

impl BlockKind {
    pub fn is_focus(self) -> bool {
        self == BlockKind::Focus
    }

    pub fn is_break(self) -> bool {
        !self.is_focus()
    }
}

/// A single scheduled unit within a session plan.
///
/// Blocks are created once by the planner and are immutable afterwards; the
/// timer only tracks its position within the sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    pub kind: BlockKind,
    /// Duration in minutes. Always positive.
    pub duration_minutes: u64,
    /// Human-readable description, derived from kind and duration.
    pub label: String,
}

impl TimeBlock {
    pub fn focus(duration_minutes: u64) -> Self {
        Self {
            kind: BlockKind::Focus,
            duration_minutes,
            label: format!("{duration_minutes} min focus"),
        }
    }

    pub fn short_break(duration_minutes: u64) -> Self {
        Self {
            kind: BlockKind::ShortBreak,
            duration_minutes,
            label: format!("{duration_minutes} min break"),
        }
    }

    pub fn long_break(duration_minutes: u64) -> Self {
        Self {
            kind: BlockKind::LongBreak,
            duration_minutes,
            label: format!("{duration_minutes} min long break"),
        }
    }

    /// Block duration in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self) -> u64 {
        self.duration_minutes.saturating_mul(60)
    }
}

/// A generated session plan: ordered blocks plus pass-through subject context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlan {
    pub subject_id: String,
    pub subject_name: String,
    /// Sum of all focus block durations. Because focus blocks are
    /// floor-clamped to [`FOCUS_MIN`], this can exceed the requested budget.
    pub total_focus_minutes: u64,
    /// Execution order is significant.
    pub blocks: Vec<TimeBlock>,
}

impl SessionPlan {
    pub fn total_minutes(&self) -> u64 {
        self.blocks.iter().map(|b| b.duration_minutes).sum()
    }

    pub fn focus_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.kind.is_focus()).count()
    }

    pub fn has_focus_block(&self) -> bool {
        self.blocks.iter().any(|b| b.kind.is_focus())
    }

    /// Cumulative minutes up to (but not including) `block_index`.
    pub fn cumulative_minutes(&self, block_index: usize) -> u64 {
        self.blocks
            .iter()
            .take(block_index)
            .map(|b| b.duration_minutes)
            .sum()
    }
}

/// Build a session plan: focus blocks (60-90 min) separated by short breaks,
/// with one long break when enough budget remains for it plus another full
/// focus block.
pub fn generate_plan(subject_id: &str, subject_name: &str, total_minutes: i64) -> SessionPlan {
    let mut blocks: Vec<TimeBlock> = Vec::new();
    let mut remaining = total_minutes;
    let mut used_long_break = false;

    while remaining > 0 {
        // Floor-clamped: a focus block may overshoot a small remainder.
        let focus_len = remaining.clamp(FOCUS_MIN as i64, FOCUS_MAX as i64) as u64;
        blocks.push(TimeBlock::focus(focus_len));
        remaining -= focus_len as i64;
        if remaining <= 0 {
            break;
        }

        let need_long_break =
            !used_long_break && remaining >= (LONG_BREAK + FOCUS_MIN) as i64;
        if need_long_break {
            blocks.push(TimeBlock::long_break(LONG_BREAK));
            remaining -= LONG_BREAK as i64;
            used_long_break = true;
        } else {
            let break_len = (SHORT_BREAK as i64).min(remaining) as u64;
            blocks.push(TimeBlock::short_break(break_len));
            remaining -= break_len as i64;
        }
    }

    let total_focus_minutes = blocks
        .iter()
        .filter(|b| b.kind.is_focus())
        .map(|b| b.duration_minutes)
        .sum();

    SessionPlan {
        subject_id: subject_id.to_string(),
        subject_name: subject_name.to_string(),
        total_focus_minutes,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(plan: &SessionPlan) -> Vec<BlockKind> {
        plan.blocks.iter().map(|b| b.kind).collect()
    }

    fn durations(plan: &SessionPlan) -> Vec<u64> {
        plan.blocks.iter().map(|b| b.duration_minutes).collect()
    }

    #[test]
    fn zero_and_negative_budgets_yield_empty_plans() {
        assert!(generate_plan("1", "Calculus 2", 0).blocks.is_empty());
        assert!(generate_plan("1", "Calculus 2", -30).blocks.is_empty());
        assert_eq!(generate_plan("1", "Calculus 2", 0).total_focus_minutes, 0);
    }

    #[test]
    fn small_budget_is_floor_clamped_to_one_focus_block() {
        let plan = generate_plan("2", "Data Structures", 25);
        assert_eq!(kinds(&plan), vec![BlockKind::Focus]);
        assert_eq!(durations(&plan), vec![60]);
        assert_eq!(plan.total_focus_minutes, 60);
    }

    #[test]
    fn budget_150_places_one_long_break() {
        // 150 -> focus 90, long break 20 (40 >= 35 at decision time),
        // then a floor-clamped focus 60.
        let plan = generate_plan("2", "Data Structures", 150);
        assert_eq!(
            kinds(&plan),
            vec![BlockKind::Focus, BlockKind::LongBreak, BlockKind::Focus]
        );
        assert_eq!(durations(&plan), vec![90, 20, 60]);
        assert_eq!(plan.total_focus_minutes, 150);
    }

    #[test]
    fn budget_100_ends_on_a_truncated_short_break() {
        let plan = generate_plan("3", "Computer Hardware", 100);
        assert_eq!(kinds(&plan), vec![BlockKind::Focus, BlockKind::ShortBreak]);
        assert_eq!(durations(&plan), vec![90, 10]);
        assert_eq!(plan.total_focus_minutes, 90);
    }

    #[test]
    fn exact_focus_budget_has_no_break() {
        let plan = generate_plan("1", "Project Management", 75);
        assert_eq!(kinds(&plan), vec![BlockKind::Focus]);
        assert_eq!(durations(&plan), vec![75]);
    }

    #[test]
    fn labels_are_derived_from_kind_and_duration() {
        let plan = generate_plan("2", "Data Structures", 150);
        let labels: Vec<&str> = plan.blocks.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["90 min focus", "20 min long break", "60 min focus"]);

        let plan = generate_plan("2", "Data Structures", 100);
        assert_eq!(plan.blocks[1].label, "10 min break");
    }

    #[test]
    fn subject_context_passes_through() {
        let plan = generate_plan("5", "Organizational Leadership", 60);
        assert_eq!(plan.subject_id, "5");
        assert_eq!(plan.subject_name, "Organizational Leadership");
    }

    proptest! {
        #[test]
        fn positive_budgets_start_with_focus(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            prop_assert!(!plan.blocks.is_empty());
            prop_assert_eq!(plan.blocks[0].kind, BlockKind::Focus);
        }

        #[test]
        fn focus_blocks_stay_within_policy_bounds(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            for block in plan.blocks.iter().filter(|b| b.kind.is_focus()) {
                prop_assert!((FOCUS_MIN..=FOCUS_MAX).contains(&block.duration_minutes));
            }
        }

        #[test]
        fn all_durations_are_positive(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            for block in &plan.blocks {
                prop_assert!(block.duration_minutes > 0);
            }
        }

        #[test]
        fn at_most_one_long_break(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            let long_breaks = plan
                .blocks
                .iter()
                .filter(|b| b.kind == BlockKind::LongBreak)
                .count();
            prop_assert!(long_breaks <= 1);
        }

        #[test]
        fn focus_and_breaks_alternate(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            for (i, block) in plan.blocks.iter().enumerate() {
                if i % 2 == 0 {
                    prop_assert!(block.kind.is_focus());
                } else {
                    prop_assert!(block.kind.is_break());
                }
            }
        }

        #[test]
        fn total_focus_minutes_matches_focus_sum(minutes in 1i64..100_000) {
            let plan = generate_plan("1", "Study", minutes);
            let sum: u64 = plan
                .blocks
                .iter()
                .filter(|b| b.kind.is_focus())
                .map(|b| b.duration_minutes)
                .sum();
            prop_assert_eq!(sum, plan.total_focus_minutes);
        }

        #[test]
        fn focus_total_covers_the_requested_budget(minutes in 1i64..100_000) {
            // Breaks never eat into focus time: the floor clamp guarantees the
            // focus total is at least the requested budget minus break time,
            // and never more than FOCUS_MIN - 1 over the budget.
            let plan = generate_plan("1", "Study", minutes);
            prop_assert!(plan.total_minutes() >= minutes as u64);
            prop_assert!(plan.total_minutes() < minutes as u64 + FOCUS_MIN);
        }
    }
}
