//! Renders individual TAP lines.
//!
//! Everything here is a pure function from values to text. Nothing in this
//! module knows about sequence numbers beyond the one it is handed, and none
//! of it touches the run state.

use std::fmt;

/// Annotation attached to a single result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Todo(String),
    Skip(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (keyword, reason) = match self {
            Directive::Todo(reason) => ("TODO", reason),
            Directive::Skip(reason) => ("SKIP", reason),
        };
        if reason.is_empty() {
            write!(f, "# {}", keyword)
        } else {
            write!(f, "# {} {}", keyword, reason)
        }
    }
}

/// Source position of an assertion call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}", self.file, self.line)
    }
}

// ============================================================================
// RESULT LINES
// ============================================================================

/// `ok 3 - description # TODO reason`
pub fn render_result(
    number: usize,
    ok: bool,
    description: &str,
    directive: Option<&Directive>,
) -> String {
    let mut line = String::with_capacity(16 + description.len());
    if !ok {
        line.push_str("not ");
    }
    line.push_str("ok ");
    line.push_str(&number.to_string());
    if !description.is_empty() {
        line.push_str(" - ");
        line.push_str(&escape_description(description));
    }
    if let Some(directive) = directive {
        line.push(' ');
        line.push_str(&directive.to_string());
    }
    line
}

/// Harnesses read an unescaped `#` as the start of a directive.
fn escape_description(description: &str) -> String {
    let flattened = description.replace('\n', " ");
    flattened.replace('#', "\\#")
}

// ============================================================================
// CONTROL LINES
// ============================================================================

pub fn render_plan(count: usize) -> String {
    format!("1..{}", count)
}

pub fn render_skip_all(reason: &str) -> String {
    if reason.is_empty() {
        "1..0 # SKIP".to_string()
    } else {
        format!("1..0 # SKIP {}", reason)
    }
}

pub fn render_bail(reason: &str) -> String {
    if reason.is_empty() {
        "Bail out!".to_string()
    } else {
        format!("Bail out! - {}", reason)
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Prefixes every line of `text` with `# ` so harnesses treat it as commentary.
pub fn render_diag(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec!["#".to_string()];
    }
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "#".to_string()
            } else {
                format!("# {}", line)
            }
        })
        .collect()
}

/// The two-line block printed after a failed assertion.
pub fn render_failure_diag(description: &str, todo: bool, location: Location) -> String {
    let mut text = String::from("  Failed ");
    if todo {
        text.push_str("(TODO) ");
    }
    text.push_str("test ");
    if !description.is_empty() {
        text.push_str(&format!("'{}'\n  ", description));
    }
    text.push_str(&format!("at {}.", location));
    text
}
