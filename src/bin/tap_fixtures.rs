//! TAP fixture program: runs named scenarios and prints their TAP stream.
//!
//! Usage: `cargo run --bin tap_fixtures [FILTER]... [--plan N] [--control bail|skip-all]`

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tapline::{
    cmp_mem, cmp_ok, dies_ok, fail, fcmp_ok, is, isnt, like, lives_ok, ok, pass, run_tests,
    skip_if, unlike, ColorMode, Plan, StdioSink, Tap, TapConfig, TestFilter,
};

/// Runs tapline fixture routines and prints their TAP output.
#[derive(Debug, Parser)]
#[command(name = "tap_fixtures", version)]
struct FixtureArgs {
    /// Run only routines whose name starts with one of these prefixes.
    filters: Vec<String>,

    /// Declare a plan of N tests up front instead of printing it at the end.
    #[arg(long, value_name = "N")]
    plan: Option<usize>,

    /// Run a run-ending scenario after the selected routines.
    #[arg(long, value_enum)]
    control: Option<Control>,

    /// When to color output. Defaults to TAPLINE_COLOR / NO_COLOR, then auto.
    #[arg(long)]
    color: Option<ColorMode>,

    /// Print the routine names and exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Control {
    Bail,
    SkipAll,
}

const ROUTINES: &[&str] = &[
    "basic_ok",
    "is_strings",
    "cmp_ints",
    "fcmp_floats",
    "cmp_mem_bytes",
    "like_patterns",
    "todo_region",
    "skip_block",
    "diag_lines",
    "death_detection",
];

type Run = Tap<StdioSink>;

fn basic_ok(tap: &mut Run) {
    ok!(tap, true, "true is ok");
    ok!(tap, 2 > 1);
    pass!(tap, "pass is ok");
    fail!(tap, "fail is not ok");
}

fn is_strings(tap: &mut Run) {
    let greeting = String::from("hello");
    let missing: Option<&str> = None;
    is!(tap, greeting, "hello", "owned and borrowed");
    is!(tap, missing, None::<&str>, "both absent");
    is!(tap, "this", "that", "different text");
    isnt!(tap, greeting, missing, "present is not absent");
}

fn cmp_ints(tap: &mut Run) {
    cmp_ok!(tap, 420, ">", 666, "420 > 666");
    cmp_ok!(tap, 23, "==", 23, "23 == 23");
    cmp_ok!(tap, 1, "<>", 2, "unknown operator");
}

fn fcmp_floats(tap: &mut Run) {
    fcmp_ok!(tap, 1.0, "==", 1.05, "within default range");
    fcmp_ok!(tap, 1.0, "==", 1.2, "outside default range");
    fcmp_ok!(tap, range = 0.3, 1.0, "==", 1.2, "within explicit range");
}

fn cmp_mem_bytes(tap: &mut Run) {
    let a = [1u8, 2, 3, 4, 5];
    let b = [1u8, 2, 3, 4, 6];
    cmp_mem!(tap, a, b, 5, "last byte differs");
    cmp_mem!(tap, [0u8; 0], [0u8; 0], 0, "empty buffers");
}

fn like_patterns(tap: &mut Run) {
    like!(tap, "stranger", "^s.r.*r$", "matches pattern");
    unlike!(tap, "stranger", "^x", "does not start with x");
    like!(tap, "abc", "[", "broken pattern");
}

fn todo_region(tap: &mut Run) {
    tap.todo("not written yet");
    ok!(tap, false, "masked failure");
    ok!(tap, true, "unexpected pass");
    tap.end_todo();
    ok!(tap, true, "outside the region");
}

fn skip_block(tap: &mut Run) {
    let have_network = false;
    skip_if!(tap, !have_network, 2, "no network", {
        ok!(tap, false, "fetch");
        ok!(tap, false, "upload");
    });
    ok!(tap, true, "after the block");
}

fn diag_lines(tap: &mut Run) {
    tap.diag("first line\nsecond line");
    ok!(tap, true, "after diag");
}

fn death_detection(tap: &mut Run) {
    dies_ok!(tap, { std::process::abort(); }, "abort dies");
    dies_ok!(tap, { panic!("boom"); }, "panic dies");
    dies_ok!(tap, { std::process::exit(3); }, "nonzero exit dies");
    dies_ok!(tap, { std::process::exit(0); }, "exit(0) dies");
    lives_ok!(tap, { let _ = 1 + 1; }, "arithmetic lives");
    lives_ok!(tap, { println!("swallowed"); }, "output is suppressed");
    dies_ok!(tap, { let _ = 2 * 2; }, "expected death that lives");
    lives_ok!(tap, { std::process::abort(); }, "expected life that dies");
}

fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = FixtureArgs::parse();

    if args.list {
        for name in ROUTINES {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let mut config = TapConfig::from_env();
    if let Some(color) = args.color {
        config = config.with_color(color);
    }
    let mut tap = Tap::new(StdioSink::new(config.color), config);
    match args.plan {
        Some(n) => tap.plan(Plan::Tests(n)),
        None => tap.plan(Plan::NoPlan),
    }

    let filter = TestFilter::new(args.filters);
    run_tests!(filter, tap;
        basic_ok,
        is_strings,
        cmp_ints,
        fcmp_floats,
        cmp_mem_bytes,
        like_patterns,
        todo_region,
        skip_block,
        diag_lines,
        death_detection,
    );

    match args.control {
        Some(Control::Bail) => tap.bail_out("fixture requested bail-out"),
        Some(Control::SkipAll) => tap.skip_all("fixture requested skip-all"),
        None => {}
    }

    tap.done_testing_exit_code()
}
