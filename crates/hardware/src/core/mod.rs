//! Cache hierarchy core.
//!
//! This module contains the simulation engine: the functional units a cache
//! level is built from, and the hierarchy that chains levels above memory.

/// L1 / L2 chain backed by main memory.
pub mod hierarchy;

/// Functional units (cache levels, tag stores, stream buffers).
pub mod units;

pub use self::hierarchy::Hierarchy;
