//! tapline: write tests that speak the Test Anything Protocol.
//!
//! A [`Tap`] run prints a plan, numbered `ok`/`not ok` lines, `# ` diagnostics,
//! and finally derives an exit status from what happened. The assertion
//! macros capture the call site so failures point back at the test source.
//!
//! ```no_run
//! use tapline::{cmp_ok, fcmp_ok, is, ok, Plan, Tap};
//!
//! fn main() -> std::process::ExitCode {
//!     let mut tap = Tap::stdout();
//!     tap.plan(Plan::Tests(4));
//!     ok!(tap, 1 + 1 == 2, "addition");
//!     is!(tap, "abc", "abc", "strings");
//!     cmp_ok!(tap, 3, "<", 4);
//!     fcmp_ok!(tap, 1.0, "==", 1.05, "close enough");
//!     tap.done_testing_exit_code()
//! }
//! ```

#[macro_use]
mod macros;

pub mod assert;
pub mod config;
pub mod directive;
pub mod errors;
pub mod filter;
pub mod format;
pub mod isolate;
pub mod plan;
pub mod sink;
pub mod state;
pub mod tap;

pub use crate::assert::{CmpOp, IntOperand, MaybeBytes, MaybeStr, FCMP_DEFAULT_RANGE};
pub use crate::config::{ColorMode, TapConfig};
pub use crate::errors::{TapError, TapResult};
pub use crate::filter::{run_test, TestFilter};
pub use crate::format::{Directive, Location};
pub use crate::isolate::DeathOutcome;
pub use crate::plan::Plan;
pub use crate::sink::{CaptureSink, Channel, StdioSink, TapSink};
pub use crate::state::{PlanState, RunState};
pub use crate::tap::Tap;
