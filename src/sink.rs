//! Output sinks for TAP text.
//!
//! A sink has two channels. The primary channel carries the lines a harness
//! parses (plan, results, bail-out). The diagnostic channel carries `# `
//! commentary. On a terminal these are stdout and stderr.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use crate::config::ColorMode;

/// Which stream a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Output,
    Diagnostic,
}

/// A place to write one line of text.
pub trait TapSink {
    fn write_line(&mut self, channel: Channel, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// StdioSink
// ============================================================================

/// Writes the primary channel to stdout and diagnostics to stderr.
pub struct StdioSink {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl std::fmt::Debug for StdioSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioSink").finish_non_exhaustive()
    }
}

impl StdioSink {
    pub fn new(color: ColorMode) -> Self {
        Self {
            stdout: StandardStream::stdout(color.choice_for(atty::Stream::Stdout)),
            stderr: StandardStream::stderr(color.choice_for(atty::Stream::Stderr)),
        }
    }
}

impl Default for StdioSink {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl TapSink for StdioSink {
    fn write_line(&mut self, channel: Channel, line: &str) -> io::Result<()> {
        let stream = match channel {
            Channel::Output => &mut self.stdout,
            Channel::Diagnostic => &mut self.stderr,
        };
        match style_for(channel, line) {
            Some(spec) => {
                stream.set_color(&spec)?;
                write!(stream, "{}", line)?;
                stream.reset()?;
                writeln!(stream)?;
            }
            None => writeln!(stream, "{}", line)?,
        }
        // Keep both channels interleaved in call order.
        stream.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.stderr.flush()
    }
}

fn style_for(channel: Channel, line: &str) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match channel {
        Channel::Diagnostic => {
            spec.set_fg(Some(Color::Yellow));
        }
        Channel::Output if line.starts_with("not ok") => {
            spec.set_fg(Some(Color::Red));
        }
        Channel::Output if line.starts_with("ok") => {
            spec.set_fg(Some(Color::Green));
        }
        Channel::Output if line.starts_with("Bail out!") => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        Channel::Output => return None,
    }
    Some(spec)
}

// ============================================================================
// CaptureSink
// ============================================================================

/// Collects lines in memory, for tests or programmatic capture.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    pub lines: Vec<(Channel, String)>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary-channel lines only, in order.
    pub fn output(&self) -> Vec<&str> {
        self.channel(Channel::Output)
    }

    /// Diagnostic lines only, in order.
    pub fn diagnostics(&self) -> Vec<&str> {
        self.channel(Channel::Diagnostic)
    }

    fn channel(&self, wanted: Channel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(channel, _)| *channel == wanted)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl TapSink for CaptureSink {
    fn write_line(&mut self, channel: Channel, line: &str) -> io::Result<()> {
        self.lines.push((channel, line.to_string()));
        Ok(())
    }
}

impl<S: TapSink + ?Sized> TapSink for &mut S {
    fn write_line(&mut self, channel: Channel, line: &str) -> io::Result<()> {
        (**self).write_line(channel, line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
