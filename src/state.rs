//! Run-wide bookkeeping: numbering, the plan, and the failure tally.

/// Exit status for a run with failed assertions.
pub const EXIT_FAILED: i32 = 1;
/// Exit status for a run that broke its plan.
pub const EXIT_PLAN_MISMATCH: i32 = 2;
/// Exit status after a bail-out.
pub const EXIT_BAILED: i32 = 255;

/// What the run has declared about its size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlanState {
    /// `plan` has not been called.
    #[default]
    Undeclared,
    /// `1..N` was printed up front.
    Count(usize),
    /// The count is printed by `done_testing`.
    Deferred,
    /// `1..0 # SKIP` was printed; nothing else runs.
    SkipAll(String),
}

impl PlanState {
    pub fn is_declared(&self) -> bool {
        !matches!(self, PlanState::Undeclared)
    }
}

/// The only state that outlives a single assertion call.
#[derive(Debug, Default)]
pub struct RunState {
    pub plan: PlanState,
    current: usize,
    failed: usize,
    plan_violations: usize,
    bailed: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter and returns the new number. Numbers start at 1.
    pub fn next_number(&mut self) -> usize {
        self.current += 1;
        self.current
    }

    /// Tallies an outcome. Failures inside a TODO region are not counted.
    pub fn record(&mut self, ok: bool, todo_active: bool) {
        if !ok && !todo_active {
            self.failed += 1;
        }
    }

    /// A usage error against the plan, settled at the end of the run.
    pub fn record_violation(&mut self) {
        self.plan_violations += 1;
    }

    pub fn mark_bailed(&mut self) {
        self.bailed = true;
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn plan_violations(&self) -> usize {
        self.plan_violations
    }

    pub fn bailed(&self) -> bool {
        self.bailed
    }

    /// Once bailed or skipped entirely, nothing further is emitted.
    pub fn is_closed(&self) -> bool {
        self.bailed || matches!(self.plan, PlanState::SkipAll(_))
    }

    pub fn planned(&self) -> Option<usize> {
        match self.plan {
            PlanState::Count(n) => Some(n),
            _ => None,
        }
    }

    /// True when a concrete plan disagrees with the number of tests run.
    pub fn plan_mismatch(&self) -> bool {
        self.planned().is_some_and(|n| n != self.current)
    }

    /// 0 on full success. Failures take precedence over plan problems.
    pub fn exit_code(&self) -> i32 {
        if self.bailed {
            EXIT_BAILED
        } else if matches!(self.plan, PlanState::SkipAll(_)) {
            0
        } else if self.failed > 0 {
            EXIT_FAILED
        } else if self.plan_mismatch() || self.plan_violations > 0 {
            EXIT_PLAN_MISMATCH
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(plan: PlanState, outcomes: &[bool]) -> RunState {
        let mut state = RunState::new();
        state.plan = plan;
        for &ok in outcomes {
            state.next_number();
            state.record(ok, false);
        }
        state
    }

    #[test]
    fn numbers_start_at_one_and_never_repeat() {
        let mut state = RunState::new();
        let numbers: Vec<usize> = (0..5).map(|_| state.next_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn matching_plan_with_passes_exits_zero() {
        for n in 0..6 {
            let state = run(PlanState::Count(n), &vec![true; n]);
            assert_eq!(state.exit_code(), 0, "plan of {}", n);
        }
    }

    #[test]
    fn too_few_or_too_many_is_a_failure() {
        assert_eq!(run(PlanState::Count(3), &[true, true]).exit_code(), EXIT_PLAN_MISMATCH);
        assert_eq!(
            run(PlanState::Count(1), &[true, true]).exit_code(),
            EXIT_PLAN_MISMATCH
        );
    }

    #[test]
    fn failures_win_over_mismatch() {
        assert_eq!(run(PlanState::Count(5), &[false]).exit_code(), EXIT_FAILED);
    }

    #[test]
    fn todo_failures_do_not_count() {
        let mut state = RunState::new();
        state.plan = PlanState::Count(1);
        state.next_number();
        state.record(false, true);
        assert_eq!(state.failed(), 0);
        assert_eq!(state.exit_code(), 0);
    }

    #[test]
    fn deferred_plan_never_mismatches() {
        assert_eq!(run(PlanState::Deferred, &[true; 4]).exit_code(), 0);
        assert_eq!(run(PlanState::Undeclared, &[true; 2]).exit_code(), 0);
    }

    #[test]
    fn violations_and_bail_out() {
        let mut state = run(PlanState::Deferred, &[true]);
        state.record_violation();
        assert_eq!(state.exit_code(), EXIT_PLAN_MISMATCH);

        state.mark_bailed();
        assert!(state.is_closed());
        assert_eq!(state.exit_code(), EXIT_BAILED);
    }
}
