//! Functional units of the memory hierarchy.
//!
//! This module contains the building blocks a cache level is composed of:
//! the set-associative tag store with its LRU bookkeeping, and the stream
//! buffer prefetcher.

/// Cache level, tag store and LRU rank tables.
pub mod cache;

/// Hardware prefetcher implementations (stream buffers).
pub mod prefetch;
