//! Shared helpers for driving the `tap_fixtures` binary.

#![allow(dead_code)]

use assert_cmd::Command;

/// A fixture invocation with color and logging turned off so stdout is
/// plain TAP.
pub fn fixtures(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("tap_fixtures").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").args(args);
    cmd
}

/// Runs the fixture binary and returns (stdout, stderr, exit code).
pub fn run(args: &[&str]) -> (String, String, i32) {
    let output = fixtures(args).output().unwrap();
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
        output.status.code().unwrap_or(-1),
    )
}

/// Joins lines with a trailing newline, the way the sink writes them.
pub fn lines(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub const FIXTURE_FILE: &str = "src/bin/tap_fixtures.rs";
