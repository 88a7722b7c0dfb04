//! Simulator Unit Tests.
//!
//! End-to-end replays through `Simulator`: construction errors, in-memory and
//! on-disk traces, and the resulting report counters.

use std::io::Write;

use cachesim_core::Simulator;
use cachesim_core::common::{ConfigError, SimError, TraceError};
use cachesim_core::config::Config;
use cachesim_core::sim::open_trace;
use cachesim_core::stats::LevelStats;
use tempfile::NamedTempFile;

use crate::common::harness::{TestContext, init_tracing};

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file.flush().expect("flush");
    file
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn invalid_config_is_rejected_before_building() {
    let err = Simulator::new(Config::from_params(32, 1000, 2, 0, 0, 0, 0)).expect_err("invalid");
    assert!(matches!(
        err,
        SimError::Config(ConfigError::UnevenSets { level: "L1", .. })
    ));
}

#[test]
fn fresh_simulator_reports_zeros() {
    let ctx = TestContext::new([32, 1024, 2, 8192, 4, 0, 0]);
    let report = ctx.sim.report();
    assert_eq!(ctx.sim.requests(), 0);
    assert_eq!(report.levels.len(), 2);
    assert_eq!(report.memory_traffic, 0);
    assert_eq!(report.level_stats(0).accesses(), 0);
    assert!(report.level_stats(0).miss_rate().abs() < f64::EPSILON);
}

// ══════════════════════════════════════════════════════════
// 2. Replay
// ══════════════════════════════════════════════════════════

#[test]
fn in_memory_trace_updates_counters() {
    let mut ctx = TestContext::new([16, 32, 2, 0, 0, 0, 0]);
    ctx.run("r 0\nr 10\nr 0\nw 20\n");

    assert_eq!(ctx.sim.requests(), 4);
    let l1 = ctx.stats(0);
    assert_eq!((l1.reads, l1.read_misses, l1.writes, l1.write_misses), (3, 2, 1, 1));
    assert_eq!(ctx.set_contents(0, 0), vec![(2, true), (0, false)]);
    // Single level: memory traffic is L1's misses and write-backs.
    assert_eq!(ctx.sim.report().memory_traffic, 3);
}

#[test]
fn file_trace_matches_in_memory_replay() {
    init_tracing();
    let trace = "w 0\nr 10\nr 0\nw 1f4\nr 3e8\n";
    let file = trace_file(trace);

    let mut from_file = Simulator::new(Config::from_params(16, 16, 1, 64, 2, 1, 2)).expect("valid");
    from_file.run_trace(file.path()).expect("replay");

    let mut from_text = TestContext::new([16, 16, 1, 64, 2, 1, 2]);
    from_text.run(trace);

    assert_eq!(from_file.report(), from_text.sim.report());
    assert_eq!(from_file.requests(), 5);
}

#[test]
fn empty_trace_file_reports_zeros() {
    let file = trace_file("");
    let mut sim = Simulator::new(Config::from_params(32, 1024, 2, 8192, 4, 2, 4)).expect("valid");
    sim.run_trace(file.path()).expect("replay");

    let report = sim.report();
    assert_eq!(sim.requests(), 0);
    for level in &report.levels {
        assert_eq!(level.stats, LevelStats::default(), "{}", level.name);
    }
    assert_eq!(report.memory_traffic, 0);
    let text = report.to_string();
    assert!(text.contains("e. L1 miss rate:               0.0000\n"));
    assert!(text.contains("n. L2 miss rate:               0.0000\n"));
    assert!(!text.contains("NaN"));
}

#[test]
fn replay_of_opened_trace_matches_run_trace() {
    let file = trace_file("r 0\nw 40\nr 80\nr 0\n");
    let config = Config::from_params(16, 64, 2, 0, 0, 1, 2);

    let mut opened = Simulator::new(config).expect("valid");
    opened.replay(open_trace(file.path()).expect("open")).expect("replay");

    let mut by_path = Simulator::new(config).expect("valid");
    by_path.run_trace(file.path()).expect("replay");

    assert_eq!(opened.report(), by_path.report());
    assert_eq!(opened.requests(), 4);
}

#[test]
fn malformed_line_stops_replay_after_preceding_requests() {
    let file = trace_file("r 0\nr 40\nwrite 80\nr c0\n");
    let mut sim = Simulator::new(Config::default()).expect("valid");
    let err = sim.run_trace(file.path()).expect_err("malformed");

    assert!(matches!(
        err,
        SimError::Trace(TraceError::InvalidAddress { line: 3, .. })
    ));
    assert_eq!(sim.requests(), 2);
}

#[test]
fn missing_trace_file_is_an_io_error() {
    let mut sim = Simulator::new(Config::default()).expect("valid");
    let err = sim
        .run_trace(std::path::Path::new("/nonexistent/trace.txt"))
        .expect_err("missing");
    assert!(matches!(err, SimError::Io { .. }));
    assert_eq!(sim.requests(), 0);
}

#[test]
fn l2_miss_rate_uses_demand_reads_only() {
    let mut ctx = TestContext::new([16, 16, 1, 64, 2, 0, 0]);
    ctx.run("w 0\nr 10\nr 0\n");
    let report = ctx.sim.report();
    let l2 = report.level_stats(1);
    assert_eq!((l2.reads, l2.read_misses, l2.writes), (3, 2, 1));
    assert!((l2.read_miss_rate() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.memory_traffic, 2);
}
