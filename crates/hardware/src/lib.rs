//! Trace-driven cache hierarchy simulator library.
//!
//! This crate replays memory read/write traces through a one- or two-level
//! write-back, write-allocate cache hierarchy:
//! 1. **Core:** Set-associative levels with exact LRU replacement, dirty-block write-back, and L1→L2→memory propagation.
//! 2. **Prefetch:** Stream buffer pools attached to the last level, with their four cache/buffer hit scenarios.
//! 3. **Simulation:** Configuration, trace loading, and request replay.
//! 4. **Statistics:** Per-level counters, final contents snapshots, and the text / JSON report.

/// Common types (address decoding, access types, errors).
pub mod common;
/// Simulator configuration (defaults, geometry structures, validation).
pub mod config;
/// Cache hierarchy engine (levels, tag stores, stream buffers).
pub mod core;
/// Trace loading and replay.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; build with `Config::from_params` or deserialize from JSON.
pub use crate::config::Config;
/// Cache hierarchy; holds L1, the optional L2, and the prefetcher.
pub use crate::core::Hierarchy;
/// Trace replay driver; construct with `Simulator::new`.
pub use crate::sim::Simulator;
