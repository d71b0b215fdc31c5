// Whole-run properties checked in-process against a capturing sink.

use pretty_assertions::assert_eq;
use tapline::state::{EXIT_BAILED, EXIT_FAILED, EXIT_PLAN_MISMATCH};
use tapline::{
    cmp_mem, cmp_ok, fcmp_ok, is, isnt, ok, CaptureSink, Plan, Tap, TapConfig,
};

fn captured() -> Tap<CaptureSink> {
    Tap::new(CaptureSink::new(), TapConfig::captured())
}

/// The number in an `ok N` / `not ok N` line.
fn number_of(line: &str) -> usize {
    let rest = line.strip_prefix("not ").unwrap_or(line);
    let rest = rest.strip_prefix("ok ").unwrap();
    rest.split(' ').next().unwrap().parse().unwrap()
}

#[test]
fn exact_plan_of_passing_tests_exits_zero() {
    for n in 0..8 {
        let mut tap = captured();
        tap.plan(Plan::Tests(n));
        for i in 0..n {
            ok!(tap, true, "test {}", i);
        }
        assert_eq!(tap.done_testing(), 0, "plan of {}", n);
    }
}

#[test]
fn wrong_count_fails_even_when_everything_passes() {
    for n in 1..6 {
        for ran in [n - 1, n + 1] {
            let mut tap = captured();
            tap.plan(Plan::Tests(n));
            for _ in 0..ran {
                ok!(tap, true);
            }
            assert_eq!(tap.done_testing(), EXIT_PLAN_MISMATCH, "planned {} ran {}", n, ran);
        }
    }
}

#[test]
fn numbering_is_contiguous_across_every_kind_of_line() {
    let mut tap = captured();
    ok!(tap, true);
    tap.skip(2, "later");
    tap.todo("flaky");
    ok!(tap, false);
    tap.end_todo();
    is!(tap, "a", "b");
    tap.diag("not a test");
    cmp_ok!(tap, 1, "??", 2);
    fcmp_ok!(tap, 0.5, "<", 0.6);
    cmp_mem!(tap, [1u8], [1u8], 1);
    isnt!(tap, "a", "b");
    tap.skip(1, "");
    tap.done_testing();

    let numbers: Vec<usize> = tap
        .sink()
        .output()
        .iter()
        .filter(|line| line.starts_with("ok") || line.starts_with("not ok"))
        .map(|line| number_of(line))
        .collect();
    assert_eq!(numbers, (1..=numbers.len()).collect::<Vec<_>>());
    assert_eq!(numbers.len(), 10);
    assert_eq!(tap.sink().output().last().copied(), Some("1..10"));
}

#[test]
fn todo_masks_only_inside_the_region() {
    let mut inside = captured();
    inside.plan(Plan::Tests(1));
    inside.todo("known bug");
    ok!(inside, false, "broken");
    inside.end_todo();
    assert_eq!(inside.done_testing(), 0);
    assert_eq!(inside.sink().output()[1], "not ok 1 - broken # TODO known bug");

    let mut outside = captured();
    outside.plan(Plan::Tests(1));
    ok!(outside, false, "broken");
    assert_eq!(outside.done_testing(), EXIT_FAILED);
}

#[test]
fn fcmp_examples() {
    let mut tap = captured();
    assert!(fcmp_ok!(tap, 1.0, "==", 1.05));
    assert!(!fcmp_ok!(tap, 1.0, "==", 1.2));
    assert!(fcmp_ok!(tap, range = 0.3, 1.0, "==", 1.2));
}

#[test]
fn cmp_mem_examples() {
    let mut tap = captured();
    assert!(!cmp_mem!(tap, *b"abcde", *b"abcdf", 5));
    assert!(cmp_mem!(tap, [0u8; 0], [0u8; 0], 0));
}

#[test]
fn nothing_is_processed_after_bail_out() {
    let mut tap = captured();
    tap.plan(Plan::Tests(10));
    ok!(tap, true);
    tap.bail_out("cannot continue");
    let before = tap.sink().lines.len();

    assert!(!ok!(tap, true));
    tap.skip(3, "");
    tap.diag("ignored");
    tap.plan(Plan::Tests(1));

    assert_eq!(tap.sink().lines.len(), before);
    assert_eq!(tap.state().current(), 1);
    assert_eq!(tap.done_testing(), EXIT_BAILED);
}
