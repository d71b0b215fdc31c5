// Full-stream checks of the fixture binary: each routine is run alone (or
// selected by prefix) and its TAP output compared line for line.

mod common;

use common::{fixtures, lines, run, FIXTURE_FILE};
use predicates::str::contains;
use pretty_assertions::assert_eq;

#[test]
fn basic_ok_counts_the_failure() {
    let (stdout, stderr, code) = run(&["basic_ok"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - true is ok",
            "ok 2",
            "ok 3 - pass is ok",
            "not ok 4 - fail is not ok",
            "1..4",
        ])
    );
    assert!(stderr.contains("#   Failed test 'fail is not ok'"));
    assert!(stderr.contains(&format!("#   at {} line ", FIXTURE_FILE)));
    assert!(stderr.contains("# Looks like you failed 1 test of 4 run."));
    assert_eq!(code, 1);
}

#[test]
fn is_strings_reports_got_and_expected() {
    let (stdout, stderr, code) = run(&["is_strings"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - owned and borrowed",
            "ok 2 - both absent",
            "not ok 3 - different text",
            "ok 4 - present is not absent",
            "1..4",
        ])
    );
    assert!(stderr.contains("#          got: 'this'\n#     expected: 'that'\n"));
    assert_eq!(code, 1);
}

#[test]
fn cmp_ints_flags_unknown_operator() {
    let (stdout, stderr, code) = run(&["cmp_ints"]);
    assert_eq!(
        stdout,
        lines(&[
            "not ok 1 - 420 > 666",
            "ok 2 - 23 == 23",
            "not ok 3 - unknown operator",
            "1..3",
        ])
    );
    assert!(stderr.contains("#     420\n#         >\n#     666\n"));
    assert!(stderr.contains("# unrecognized operator '<>'"));
    assert_eq!(code, 1);
}

#[test]
fn fcmp_floats_default_and_explicit_range() {
    let (stdout, _, code) = run(&["fcmp_floats"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - within default range",
            "not ok 2 - outside default range",
            "ok 3 - within explicit range",
            "1..3",
        ])
    );
    assert_eq!(code, 1);
}

#[test]
fn cmp_mem_points_at_the_first_differing_byte() {
    let (stdout, stderr, _) = run(&["cmp_mem_bytes"]);
    assert_eq!(
        stdout,
        lines(&["not ok 1 - last byte differs", "ok 2 - empty buffers", "1..2"])
    );
    assert!(stderr.contains(
        "#     Difference starts at offset 4\n#          got: 0x05\n#     expected: 0x06\n"
    ));
}

#[cfg(unix)]
#[test]
fn like_patterns_and_bad_regex() {
    let (stdout, stderr, code) = run(&["like_patterns"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - matches pattern",
            "ok 2 - does not start with x",
            "not ok 3 - broken pattern",
            "1..3",
        ])
    );
    assert!(stderr.contains("# Could not compile regex '['"));
    assert_eq!(code, 1);
}

#[test]
fn todo_failures_do_not_fail_the_run() {
    let (stdout, stderr, code) = run(&["todo_region"]);
    assert_eq!(
        stdout,
        lines(&[
            "not ok 1 - masked failure # TODO not written yet",
            "ok 2 - unexpected pass # TODO not written yet",
            "ok 3 - outside the region",
            "1..3",
        ])
    );
    assert!(stderr.contains("#   Failed (TODO) test 'masked failure'"));
    assert!(!stderr.contains("Looks like you failed"));
    assert_eq!(code, 0);
}

#[test]
fn skip_block_never_runs_its_body() {
    let (stdout, _, code) = run(&["skip_block"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 # SKIP no network",
            "ok 2 # SKIP no network",
            "ok 3 - after the block",
            "1..3",
        ])
    );
    assert_eq!(code, 0);
}

#[test]
fn diag_goes_to_stderr_unnumbered() {
    let (stdout, stderr, code) = run(&["diag_lines"]);
    assert_eq!(stdout, lines(&["ok 1 - after diag", "1..1"]));
    assert_eq!(stderr, lines(&["# first line", "# second line"]));
    assert_eq!(code, 0);
}

#[cfg(unix)]
#[test]
fn death_tests_classify_each_child() {
    let (stdout, _, code) = run(&["death_detection"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - abort dies",
            "ok 2 - panic dies",
            "ok 3 - nonzero exit dies",
            "ok 4 - exit(0) dies",
            "ok 5 - arithmetic lives",
            "ok 6 - output is suppressed",
            "not ok 7 - expected death that lives",
            "not ok 8 - expected life that dies",
            "1..8",
        ])
    );
    assert!(!stdout.contains("swallowed"));
    assert_eq!(code, 1);
}

#[test]
fn exact_plan_passes() {
    let (stdout, _, code) = run(&["skip_block", "--plan", "3"]);
    assert!(stdout.starts_with("1..3\n"));
    assert!(!stdout.ends_with("1..3\n"));
    assert_eq!(code, 0);
}

#[test]
fn running_fewer_than_planned_fails() {
    let (stdout, stderr, code) = run(&["skip_block", "--plan", "5"]);
    assert!(stdout.starts_with("1..5\n"));
    assert!(stderr.contains("# Looks like you planned 5 tests but ran 3."));
    assert_eq!(code, 2);
}

#[test]
fn running_more_than_planned_fails() {
    let (_, stderr, code) = run(&["skip_block", "--plan", "1"]);
    assert!(stderr.contains("# Looks like you planned 1 test but ran 3."));
    assert_eq!(code, 2);
}

#[test]
fn bail_out_ends_the_run() {
    let (stdout, _, code) = run(&["skip_block", "--control", "bail"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 # SKIP no network",
            "ok 2 # SKIP no network",
            "ok 3 - after the block",
            "Bail out! - fixture requested bail-out",
        ])
    );
    assert_eq!(code, 255);
}

#[test]
fn skip_all_exits_successfully() {
    let (stdout, _, code) = run(&["no_such_routine", "--control", "skip-all"]);
    assert_eq!(stdout, lines(&["1..0 # SKIP fixture requested skip-all"]));
    assert_eq!(code, 0);
}

#[test]
fn skip_all_after_failures_does_not_hide_them() {
    let (stdout, stderr, code) = run(&["basic_ok", "--control", "skip-all"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 - true is ok",
            "ok 2",
            "ok 3 - pass is ok",
            "not ok 4 - fail is not ok",
            "1..4",
        ])
    );
    assert!(!stdout.contains("# SKIP"));
    assert!(stderr.contains("# plan() called after tests ran"));
    assert_eq!(code, 1);
}

#[test]
fn filter_selects_by_prefix() {
    let (stdout, _, _) = run(&["cmp"]);
    assert_eq!(
        stdout,
        lines(&[
            "not ok 1 - 420 > 666",
            "ok 2 - 23 == 23",
            "not ok 3 - unknown operator",
            "not ok 4 - last byte differs",
            "ok 5 - empty buffers",
            "1..5",
        ])
    );
}

#[test]
fn several_filters_union_their_selections() {
    let (stdout, _, code) = run(&["skip", "diag"]);
    assert_eq!(
        stdout,
        lines(&[
            "ok 1 # SKIP no network",
            "ok 2 # SKIP no network",
            "ok 3 - after the block",
            "ok 4 - after diag",
            "1..4",
        ])
    );
    assert_eq!(code, 0);
}

#[test]
fn no_match_runs_nothing() {
    let (stdout, _, code) = run(&["zzz"]);
    assert_eq!(stdout, lines(&["1..0"]));
    assert_eq!(code, 0);
}

#[test]
fn list_prints_routine_names() {
    fixtures(&["--list"])
        .assert()
        .success()
        .stdout(contains("basic_ok\n"))
        .stdout(contains("death_detection\n"));
}
