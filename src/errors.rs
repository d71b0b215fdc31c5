//! tapline Error Handling
//!
//! Two families of error live here. Usage errors (bad operator tokens, a plan
//! declared twice, a byte buffer shorter than the compared length, a pattern
//! that does not compile) never escape the library: the assertion layer turns
//! them into a failing test line plus a diagnostic. Environment errors (fork,
//! wait, `/dev/null`) are fatal and end the run.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type for the crate.
#[derive(Debug, Error, Diagnostic)]
pub enum TapError {
    // Usage errors - reported as failing assertions
    #[error("unrecognized operator '{op}'")]
    #[diagnostic(
        code(tapline::usage::operator),
        help("supported operators are == != < <= > >= && ||")
    )]
    UnknownOperator { op: String },

    #[error("plan() called more than once")]
    #[diagnostic(code(tapline::usage::plan))]
    PlanRedeclared,

    #[error("plan() called after tests ran")]
    #[diagnostic(
        code(tapline::usage::plan),
        help("declare the plan before the first assertion, or use Plan::NoPlan")
    )]
    PlanAfterTests,

    #[error("buffer of {len} bytes is shorter than the compared length {n}")]
    #[diagnostic(code(tapline::usage::length))]
    ShortBuffer { len: usize, n: usize },

    #[error("integer operand {value} does not fit in i128")]
    #[diagnostic(code(tapline::usage::operand))]
    OperandRange { value: String },

    #[error("Could not compile regex '{pattern}'")]
    #[diagnostic(code(tapline::usage::regex))]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Environment errors - fatal
    #[error("fork error")]
    #[diagnostic(code(tapline::env::fork))]
    Fork(#[source] std::io::Error),

    #[error("waitpid error")]
    #[diagnostic(code(tapline::env::wait))]
    Wait(#[source] std::io::Error),

    #[error("could not redirect output to /dev/null")]
    #[diagnostic(code(tapline::env::devnull))]
    DevNull(#[source] std::io::Error),

    #[error("failed to write TAP output")]
    #[diagnostic(code(tapline::io))]
    Io(#[from] std::io::Error),
}

impl TapError {
    /// Usage errors count against the plan and are deferred to the final tally.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            TapError::UnknownOperator { .. }
                | TapError::PlanRedeclared
                | TapError::PlanAfterTests
                | TapError::ShortBuffer { .. }
                | TapError::OperandRange { .. }
                | TapError::BadPattern { .. }
        )
    }

    /// Environment errors terminate the run immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TapError::Fork(_) | TapError::Wait(_) | TapError::DevNull(_)
        )
    }
}

pub type TapResult<T> = Result<T, TapError>;

/// Prints a fatal environment error on stderr and exits with status 1.
///
/// Retrying a failed fork without addressing its cause is unsafe, so there
/// is no recovery path.
pub fn abort_on_fatal(error: TapError) -> ! {
    debug_assert!(error.is_fatal());
    tracing::error!(error = %error, "fatal environment error");
    eprintln!("{:?}", miette::Report::new(error));
    std::process::exit(1);
}
