//! Runtime configuration for a TAP run.

use std::str::FromStr;

use termcolor::ColorChoice;

/// When to color the output streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color a stream only when it is attached to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!("unknown color mode '{}'", other)),
        }
    }
}

impl ColorMode {
    /// Resolves the mode for one stream. Harnesses read TAP from a pipe, so
    /// `Auto` never colors redirected output.
    pub fn choice_for(self, stream: atty::Stream) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if atty::is(stream) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

/// Configuration for a [`crate::Tap`] run.
#[derive(Debug, Clone)]
pub struct TapConfig {
    pub color: ColorMode,
    /// Terminate the process on bail-out and skip-all. Library tests turn
    /// this off so a run can be inspected after it closes.
    pub exit_on_control: bool,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            exit_on_control: true,
        }
    }
}

impl TapConfig {
    /// Reads `NO_COLOR` and `TAPLINE_COLOR` (`auto`, `always`, `never`).
    /// `NO_COLOR` wins when both are set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("TAPLINE_COLOR") {
            match value.parse() {
                Ok(mode) => config.color = mode,
                Err(e) => tracing::warn!(%value, "ignoring TAPLINE_COLOR: {}", e),
            }
        }
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = ColorMode::Never;
        }
        config
    }

    /// Configuration for in-process inspection: no color, no process exit.
    pub fn captured() -> Self {
        Self {
            color: ColorMode::Never,
            exit_on_control: false,
        }
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }
}
