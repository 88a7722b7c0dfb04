//! Statistics and Report Unit Tests.
//!
//! Verifies derived metrics and the exact text layout of the final report
//! (contents, stream buffers, measurements a through q), plus the JSON form.

use cachesim_core::stats::LevelStats;
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn derived_metrics() {
    let stats = LevelStats {
        reads: 8,
        read_misses: 2,
        writes: 2,
        write_misses: 1,
        write_backs: 1,
        prefetches: 0,
    };
    assert_eq!(stats.accesses(), 10);
    assert_eq!(stats.misses(), 3);
    assert!((stats.miss_rate() - 0.3).abs() < 1e-12);
    assert!((stats.read_miss_rate() - 0.25).abs() < 1e-12);
    assert_eq!(stats.memory_traffic(), 4);
}

/// L1: 1 set x 1 way; L2: 2 sets x 2 ways; 16-byte blocks; no prefetch.
#[test]
fn two_level_report_layout() {
    let mut ctx = TestContext::new([16, 16, 1, 64, 2, 0, 0]);
    ctx.run("w 0\nr 10\nr 0\n");

    // Each way renders as the tag followed by a four-column dirty field.
    let expected = concat!(
        "===== L1 contents =====\n",
        "set      0:   0    \n",
        "\n",
        "===== L2 contents =====\n",
        "set      0:   0 D  0    \n",
        "set      1:   0    0    \n",
        "\n",
        "===== Measurements =====\n",
        "a. L1 reads:                   2\n",
        "b. L1 read misses:             2\n",
        "c. L1 writes:                  1\n",
        "d. L1 write misses:            1\n",
        "e. L1 miss rate:               1.0000\n",
        "f. L1 writebacks:              1\n",
        "g. L1 prefetches:              0\n",
        "h. L2 reads (demand):          3\n",
        "i. L2 read misses (demand):    2\n",
        "j. L2 reads (prefetch):        0\n",
        "k. L2 read misses (prefetch):  0\n",
        "l. L2 writes:                  1\n",
        "m. L2 write misses:            0\n",
        "n. L2 miss rate:               0.6667\n",
        "o. L2 writebacks:              0\n",
        "p. L2 prefetches:              0\n",
        "q. memory traffic:             2\n",
    );
    assert_eq!(ctx.sim.report().to_string(), expected);
}

/// L1: 16 sets x 1 way, 16-byte blocks, one stream of depth 4.
#[test]
fn stream_buffer_section_follows_contents() {
    let mut ctx = TestContext::new([16, 256, 1, 0, 0, 1, 4]);
    ctx.run("r 80\nr 60\nr 80\n");

    let text = ctx.sim.report().to_string();
    assert!(text.contains("===== Stream Buffer(s) contents =====\n 9  a  b  c \n\n===== Measurements"));
    assert!(text.contains("set      6:   0    \n"));
    assert!(text.contains("g. L1 prefetches:              10\n"));
    assert!(text.contains("n. L2 miss rate:               0.0000\n"));
    assert!(text.ends_with("q. memory traffic:             12\n"));
}

#[test]
fn empty_trace_reports_zero_rates() {
    let ctx = TestContext::new([32, 1024, 2, 0, 0, 0, 0]);
    let text = ctx.sim.report().to_string();
    assert!(text.contains("e. L1 miss rate:               0.0000\n"));
    assert!(!text.contains("Stream Buffer"));
    assert!(!text.contains("L2 contents"));
}

#[test]
fn json_report_carries_config_and_levels() {
    let mut ctx = TestContext::new([16, 256, 1, 0, 0, 1, 4]);
    ctx.run("r 50\n");
    let json: serde_json::Value =
        serde_json::from_str(&ctx.sim.report().to_json().expect("serializable")).expect("json");

    assert_eq!(json["config"]["prefetch"]["depth"], 4);
    assert_eq!(json["levels"][0]["name"], "L1");
    assert_eq!(json["levels"][0]["stats"]["read_misses"], 1);
    assert_eq!(json["levels"][0]["stats"]["prefetches"], 4);
    assert_eq!(json["levels"][0]["stream_buffers"][0], serde_json::json!([6, 7, 8, 9]));
    assert_eq!(json["memory_traffic"], 5);
}
