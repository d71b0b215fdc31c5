//! Plan declaration, skip-all, bail-out, and the end-of-run summary.

use std::process::ExitCode;

use crate::errors::TapError;
use crate::format;
use crate::sink::{Channel, TapSink};
use crate::state::{PlanState, EXIT_BAILED};
use crate::tap::Tap;

/// What a run declares up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Exactly this many tests will run. Printed as `1..N` right away.
    Tests(usize),
    /// The count is printed by [`Tap::done_testing`].
    NoPlan,
    /// Nothing runs. Printed as `1..0 # SKIP reason`.
    SkipAll(String),
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl<S: TapSink> Tap<S> {
    /// Declares the plan. A second call, or a call after tests ran, is a
    /// usage error that fails the run at the end.
    pub fn plan(&mut self, plan: Plan) {
        if self.state.is_closed() {
            return;
        }
        if self.state.plan.is_declared() {
            self.plan_violation(TapError::PlanRedeclared);
            return;
        }
        if self.state.current() > 0 && !matches!(plan, Plan::NoPlan) {
            self.plan_violation(TapError::PlanAfterTests);
            return;
        }
        tracing::debug!(?plan, "plan declared");
        match plan {
            Plan::Tests(n) => {
                self.state.plan = PlanState::Count(n);
                self.emit(Channel::Output, &format::render_plan(n));
            }
            Plan::NoPlan => self.state.plan = PlanState::Deferred,
            Plan::SkipAll(reason) => self.skip_all(reason),
        }
    }

    /// Prints `1..0 # SKIP reason` and ends the run successfully.
    ///
    /// Skip-all is a plan: once a test has run or a count was declared it is
    /// refused as a plan violation, so earlier failures still fail the run.
    pub fn skip_all(&mut self, reason: impl Into<String>) {
        if self.state.is_closed() {
            return;
        }
        if self.state.current() > 0 {
            self.plan_violation(TapError::PlanAfterTests);
            return;
        }
        if self.state.planned().is_some() {
            self.plan_violation(TapError::PlanRedeclared);
            return;
        }
        let reason = reason.into();
        self.emit(Channel::Output, &format::render_skip_all(&reason));
        tracing::info!(%reason, "skipping all tests");
        self.state.plan = PlanState::SkipAll(reason);
        self.terminate(0);
    }

    /// Prints `Bail out! - reason` and ends the run with a failing status.
    /// Every later call on this run is a no-op.
    pub fn bail_out(&mut self, reason: impl AsRef<str>) {
        if self.state.is_closed() {
            return;
        }
        let reason = reason.as_ref();
        self.emit(Channel::Output, &format::render_bail(reason));
        tracing::warn!(%reason, "bailed out");
        self.state.mark_bailed();
        self.terminate(EXIT_BAILED);
    }

    /// Prints the deferred plan and the summary diagnostics, then returns
    /// the exit status: 0 when every planned test ran and none failed
    /// outside a TODO region.
    pub fn done_testing(&mut self) -> i32 {
        if self.state.is_closed() {
            return self.state.exit_code();
        }
        let ran = self.state.current();
        match self.state.plan.clone() {
            PlanState::Undeclared | PlanState::Deferred => {
                self.emit(Channel::Output, &format::render_plan(ran));
                self.state.plan = PlanState::Count(ran);
            }
            PlanState::Count(planned) if planned != ran => {
                self.diag(format!(
                    "Looks like you planned {} test{} but ran {}.",
                    planned,
                    plural(planned),
                    ran
                ));
            }
            _ => {}
        }
        let failed = self.state.failed();
        if failed > 0 {
            self.diag(format!(
                "Looks like you failed {} test{} of {} run.",
                failed,
                plural(failed),
                ran
            ));
        }
        self.flush();
        let code = self.state.exit_code();
        tracing::debug!(ran, failed, code, "run finished");
        code
    }

    /// [`Tap::done_testing`] as a value `main` can return.
    pub fn done_testing_exit_code(&mut self) -> ExitCode {
        let code = self.done_testing();
        ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
    }

    fn plan_violation(&mut self, error: TapError) {
        debug_assert!(error.is_usage());
        tracing::debug!(error = %error, "plan violation");
        self.state.record_violation();
        self.diag(error.to_string());
    }

    fn terminate(&mut self, code: i32) {
        self.flush();
        if self.config.exit_on_control {
            std::process::exit(code);
        }
    }
}
