//! Error definitions.
//!
//! This module defines the failures the simulator reports to its caller. It provides:
//! 1. **Configuration Errors:** Cache geometries the hierarchy cannot be built from.
//! 2. **Trace Errors:** Malformed trace lines, with 1-based line numbers.
//! 3. **Top-level Errors:** `SimError`, wrapping the above plus trace file I/O.
//!
//! Violated internal invariants (duplicate tags in a set, broken LRU ranks) are
//! not represented here; they are defects and trip debug assertions instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid cache or prefetcher geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The block size is zero or not a power of two.
    #[error("block size must be a nonzero power of two, got {0}")]
    BlockSize(u32),

    /// A level was configured with zero ways.
    #[error("{level} associativity must be nonzero")]
    ZeroAssociativity {
        /// Level name (`L1` or `L2`).
        level: &'static str,
    },

    /// The level size does not split evenly into `ways * block_size` sets.
    #[error("{level} size {size} is not a multiple of {ways} ways x {block_size} byte blocks")]
    UnevenSets {
        /// Level name (`L1` or `L2`).
        level: &'static str,
        /// Configured size in bytes.
        size: u32,
        /// Configured associativity.
        ways: u32,
        /// Configured block size in bytes.
        block_size: u32,
    },

    /// The derived set count is zero or not a power of two.
    #[error("{level} set count must be a nonzero power of two, got {sets}")]
    SetCount {
        /// Level name (`L1` or `L2`).
        level: &'static str,
        /// Derived number of sets.
        sets: u32,
    },
}

/// Malformed trace input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The operation character is neither `r` nor `w`.
    #[error("line {line}: unknown request type {op}")]
    UnknownOperation {
        /// 1-based line number.
        line: usize,
        /// The offending operation character.
        op: char,
    },

    /// The line has an operation but no address.
    #[error("line {line}: missing address")]
    MissingAddress {
        /// 1-based line number.
        line: usize,
    },

    /// The address is not a 32-bit hexadecimal number.
    #[error("line {line}: invalid address {text:?}")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The text that failed to parse.
        text: String,
    },
}

/// Top-level simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Malformed trace line.
    #[error("malformed trace: {0}")]
    Trace(#[from] TraceError),

    /// The trace file could not be opened or read.
    #[error("unable to read trace file {}: {source}", .path.display())]
    Io {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for simulator results.
pub type Result<T, E = SimError> = std::result::Result<T, E>;
