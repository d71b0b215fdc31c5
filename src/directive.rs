//! TODO regions and SKIP blocks.

use crate::format::{self, Directive};
use crate::sink::{Channel, TapSink};
use crate::tap::Tap;

/// The active TODO annotation, if any.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoState {
    reason: Option<String>,
}

impl TodoState {
    pub fn enter(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    pub fn exit(&mut self) {
        self.reason = None;
    }

    pub fn is_active(&self) -> bool {
        self.reason.is_some()
    }

    /// The directive to stamp on the next result line.
    pub fn directive(&self) -> Option<Directive> {
        self.reason.clone().map(Directive::Todo)
    }
}

impl<S: TapSink> Tap<S> {
    /// Opens a TODO region: failures until [`Tap::end_todo`] are printed with
    /// `# TODO reason` and left out of the final tally.
    pub fn todo(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::trace!(%reason, "todo region opened");
        self.todo.enter(reason);
    }

    pub fn end_todo(&mut self) {
        tracing::trace!("todo region closed");
        self.todo.exit();
    }

    /// Emits `count` passing lines marked `# SKIP reason` without running
    /// anything. The caller decides how many tests the skipped block holds.
    pub fn skip(&mut self, count: usize, reason: impl AsRef<str>) {
        if self.state.is_closed() {
            return;
        }
        let directive = Directive::Skip(reason.as_ref().to_string());
        for _ in 0..count {
            let number = self.state.next_number();
            let line = format::render_result(number, true, "", Some(&directive));
            self.emit(Channel::Output, &line);
        }
    }
}
