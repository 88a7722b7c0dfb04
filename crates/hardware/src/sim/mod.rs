//! Trace replay.
//!
//! Provides the trace loader and the simulator that owns a hierarchy and
//! replays requests through it.

/// Trace parsing and file access.
pub mod loader;

/// Simulator driving a hierarchy with trace entries.
pub mod simulator;

pub use loader::{TraceEntry, TraceReader, open_trace, parse_line, parse_trace};
pub use simulator::Simulator;
