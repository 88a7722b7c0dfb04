//! Hardware prefetcher implementations.
//!
//! This module contains the stream buffer prefetcher a cache level can
//! consult on every demand request.

/// Stream buffer prefetcher (pool of sequential block predictors).
pub mod stream;

pub use self::stream::{PrefetchOutcome, StreamBufferPool, StreamScenario};
