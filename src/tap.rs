//! The run context.
//!
//! A [`Tap`] owns everything that outlives a single assertion: the run
//! state, the TODO region, the configuration, and the sink. Every
//! operation takes `&mut self`, so a run is driven from one thread.

use crate::config::TapConfig;
use crate::directive::TodoState;
use crate::errors::TapError;
use crate::format::{self, Location};
use crate::sink::{Channel, StdioSink, TapSink};
use crate::state::RunState;

#[derive(Debug)]
pub struct Tap<S: TapSink = StdioSink> {
    pub(crate) state: RunState,
    pub(crate) todo: TodoState,
    pub(crate) config: TapConfig,
    sink: S,
    write_failed: bool,
}

impl Tap<StdioSink> {
    /// A run on stdout/stderr configured from the environment.
    pub fn stdout() -> Self {
        let config = TapConfig::from_env();
        Tap::new(StdioSink::new(config.color), config)
    }
}

impl<S: TapSink> Tap<S> {
    pub fn new(sink: S, config: TapConfig) -> Self {
        Self {
            state: RunState::new(),
            todo: TodoState::default(),
            config,
            sink,
            write_failed: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Writes one line. A broken sink is logged once and otherwise ignored
    /// so a vanished harness cannot panic the program under test.
    pub(crate) fn emit(&mut self, channel: Channel, line: &str) {
        if let Err(e) = self.sink.write_line(channel, line).map_err(TapError::Io) {
            if !self.write_failed {
                tracing::warn!(error = ?e, "further sink errors suppressed");
                self.write_failed = true;
            }
        }
    }

    pub(crate) fn flush(&mut self) {
        if let Err(e) = self.sink.flush().map_err(TapError::Io) {
            if !self.write_failed {
                tracing::warn!(error = ?e, "further sink errors suppressed");
                self.write_failed = true;
            }
        }
    }

    /// True once a write or flush on the sink has failed.
    pub fn sink_failed(&self) -> bool {
        self.write_failed
    }

    /// Writes an out-of-band `# ` diagnostic. Never advances the counter.
    pub fn diag(&mut self, text: impl AsRef<str>) {
        if self.state.is_closed() {
            return;
        }
        for line in format::render_diag(text.as_ref()) {
            self.emit(Channel::Diagnostic, &line);
        }
    }

    /// The path every assertion ends in: number, tally, render, and the
    /// failure block when the outcome is false.
    pub fn ok_at(&mut self, location: Location, ok: bool, description: impl AsRef<str>) -> bool {
        if self.state.is_closed() {
            return false;
        }
        let description = description.as_ref();
        let directive = self.todo.directive();
        let number = self.state.next_number();
        self.state.record(ok, self.todo.is_active());

        let line = format::render_result(number, ok, description, directive.as_ref());
        self.emit(Channel::Output, &line);

        if !ok {
            let block = format::render_failure_diag(description, self.todo.is_active(), location);
            self.diag(block);
        }
        if let Some(planned) = self.state.planned().filter(|&n| number > n) {
            tracing::debug!(number, planned, "test ran past the declared plan");
        }
        ok
    }
}
