//! Memory Access Types.
//!
//! This module defines the classification of requests replayed through the hierarchy.
//! These types are used for the following:
//! 1. **Trace Decoding:** Mapping the `r` / `w` operation characters of a trace line.
//! 2. **Request Dispatch:** Selecting the read or write path of a cache level.
//! 3. **Statistics Tracking:** Charging the matching access and miss counters.

use std::fmt;

/// Type of memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Demand read of a block.
    ///
    /// Misses fetch the block from the next level.
    Read,

    /// Demand write to a block.
    ///
    /// Write-allocate: a miss first fetches the block from the next level with
    /// a read, then the local copy is marked dirty.
    Write,
}

impl AccessType {
    /// Maps a trace operation character (`r` or `w`) to an access type.
    pub const fn from_op(op: char) -> Option<Self> {
        match op {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// Trace operation character for this access type.
    pub const fn op(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }

    /// Returns `true` for writes.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
