//! Death tests.
//!
//! `dies_ok` and `lives_ok` run a closure in a forked child with its stdout
//! and stderr pointed at `/dev/null`, wait for the child, and decide whether
//! it died. The child reports back only through its exit status: it calls
//! `_exit(CHILD_SURVIVED)` once the closure returns. Any other ending reads
//! as death, including a closure that calls `exit(0)` itself.
//!
//! Forking a process that has other threads running is only sound when the
//! child avoids locks those threads may hold. Call these from a
//! single-threaded test program.
//!
//! There is no timeout. A child that never exits blocks the run.

use crate::format::Location;
use crate::sink::TapSink;
use crate::tap::Tap;

/// Exit status a child uses when the closure returned normally.
pub const CHILD_SURVIVED: i32 = 213;

/// Exit status a child uses when the closure panicked.
pub const CHILD_PANICKED: i32 = 101;

/// What the caller expected and what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathOutcome {
    pub expected_death: bool,
    pub died: bool,
}

impl DeathOutcome {
    pub fn passed(&self) -> bool {
        self.expected_death == self.died
    }
}

impl<S: TapSink> Tap<S> {
    /// Passes when `code` terminates its process abnormally.
    pub fn dies_ok_at<F: FnOnce()>(
        &mut self,
        location: Location,
        code: F,
        description: impl AsRef<str>,
    ) -> bool {
        self.death_test(location, true, code, description)
    }

    /// Passes when `code` returns normally.
    pub fn lives_ok_at<F: FnOnce()>(
        &mut self,
        location: Location,
        code: F,
        description: impl AsRef<str>,
    ) -> bool {
        self.death_test(location, false, code, description)
    }

    #[cfg(unix)]
    fn death_test<F: FnOnce()>(
        &mut self,
        location: Location,
        expected_death: bool,
        code: F,
        description: impl AsRef<str>,
    ) -> bool {
        use std::io::Write;

        if self.state.is_closed() {
            return false;
        }
        // Anything still buffered would be written twice, once per process.
        self.flush();
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();

        let died = match unix::run_isolated(code) {
            Ok(died) => died,
            Err(e) => crate::errors::abort_on_fatal(e),
        };
        let outcome = DeathOutcome {
            expected_death,
            died,
        };
        tracing::debug!(?outcome, "death test classified");
        self.ok_at(location, outcome.passed(), description)
    }

    #[cfg(not(unix))]
    fn death_test<F: FnOnce()>(
        &mut self,
        _location: Location,
        _expected_death: bool,
        _code: F,
        _description: impl AsRef<str>,
    ) -> bool {
        let open = !self.state.is_closed();
        self.skip(1, "Death detection is not supported on this platform");
        open
    }
}

#[cfg(unix)]
mod unix {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::io::AsRawFd;
    use std::panic::{self, AssertUnwindSafe};

    use super::{CHILD_PANICKED, CHILD_SURVIVED};
    use crate::errors::{TapError, TapResult};

    /// Runs `code` in a child process. Returns whether the child died.
    pub(super) fn run_isolated<F: FnOnce()>(code: F) -> TapResult<bool> {
        let devnull = OpenOptions::new()
            .write(true)
            .open("/dev/null")
            .map_err(TapError::DevNull)?;

        // SAFETY: the child only redirects descriptors, runs `code`, and
        // leaves through `_exit`, never returning into the caller's frames.
        let pid = unsafe { libc::fork() };
        match pid {
            -1 => Err(TapError::Fork(io::Error::last_os_error())),
            0 => child(devnull.as_raw_fd(), code),
            pid => {
                drop(devnull);
                tracing::trace!(pid, "forked death-test child");
                wait(pid)
            }
        }
    }

    fn child<F: FnOnce()>(devnull: libc::c_int, code: F) -> ! {
        // SAFETY: plain descriptor syscalls on descriptors this process owns.
        unsafe {
            if libc::dup2(devnull, libc::STDOUT_FILENO) < 0 {
                libc::close(libc::STDOUT_FILENO);
            }
            if libc::dup2(devnull, libc::STDERR_FILENO) < 0 {
                libc::close(libc::STDERR_FILENO);
            }
        }
        let status = match panic::catch_unwind(AssertUnwindSafe(code)) {
            Ok(()) => CHILD_SURVIVED,
            Err(_) => CHILD_PANICKED,
        };
        // SAFETY: `_exit` skips atexit handlers and stdio flushing, both of
        // which belong to the parent.
        unsafe { libc::_exit(status) }
    }

    fn wait(pid: libc::pid_t) -> TapResult<bool> {
        let mut status: libc::c_int = 0;
        loop {
            // SAFETY: `status` is a valid out-pointer for the whole call.
            let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
            if rc == pid {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(TapError::Wait(err));
        }
        Ok(classify(status))
    }

    /// A child survived only if it reached the `CHILD_SURVIVED` exit.
    pub(super) fn classify(status: libc::c_int) -> bool {
        let survived =
            libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == CHILD_SURVIVED;
        tracing::trace!(
            status,
            exited = libc::WIFEXITED(status),
            signaled = libc::WIFSIGNALED(status),
            "death-test child finished"
        );
        !survived
    }
}
