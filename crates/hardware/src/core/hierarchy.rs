//! Cache hierarchy.
//!
//! Owns the configured levels in a fixed array, L1 first. A level reaches the
//! one below it only through the slice of levels that follow it, so `next` is
//! never an owning or cyclic reference; the empty slice past the last level
//! stands for main memory.

use tracing::info;

use crate::common::AccessType;
use crate::config::Config;
use crate::core::units::cache::CacheLevel;
use crate::stats::LevelReport;

/// One- or two-level cache hierarchy backed by main memory.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
}

impl Hierarchy {
    /// Builds the hierarchy described by `config`.
    ///
    /// L2 is created only when both its size and associativity are nonzero.
    /// The stream buffer prefetcher, when enabled, attaches to the deepest
    /// configured level. `config` must already be validated.
    pub fn new(config: &Config) -> Self {
        let block_size = config.block_size;
        let mut levels = vec![CacheLevel::new(
            "L1",
            config.l1.num_sets(block_size),
            config.l1.ways,
            block_size,
        )];
        if config.l2.enabled() {
            levels.push(CacheLevel::new(
                "L2",
                config.l2.num_sets(block_size),
                config.l2.ways,
                block_size,
            ));
        }
        let mut hierarchy = Self::from_levels(levels);
        if config.prefetch.enabled() {
            let last = config.prefetch_level();
            hierarchy.levels[last]
                .attach_stream_buffers(config.prefetch.streams, config.prefetch.depth);
        }
        info!(
            levels = hierarchy.levels.len(),
            block_size,
            prefetch_streams = config.prefetch.streams,
            prefetch_depth = config.prefetch.depth,
            "built cache hierarchy"
        );
        hierarchy
    }

    /// Wraps pre-built levels, L1 first.
    ///
    /// # Panics
    ///
    /// Panics if `levels` is empty; a hierarchy always has an L1.
    pub fn from_levels(levels: Vec<CacheLevel>) -> Self {
        assert!(!levels.is_empty(), "a cache hierarchy needs at least one level");
        Self { levels }
    }

    /// Sends a request of `kind` for `addr` into L1.
    pub fn access(&mut self, kind: AccessType, addr: u32) {
        if let Some((l1, lower)) = self.levels.split_first_mut() {
            l1.access(kind, addr, lower);
        }
    }

    /// Sends a read of `addr` into L1.
    pub fn read(&mut self, addr: u32) {
        self.access(AccessType::Read, addr);
    }

    /// Sends a write of `addr` into L1.
    pub fn write(&mut self, addr: u32) {
        self.access(AccessType::Write, addr);
    }

    /// Configured levels, L1 first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Level `n` (0 = L1), if configured.
    pub fn level(&self, n: usize) -> Option<&CacheLevel> {
        self.levels.get(n)
    }

    /// Mutable access to level `n`, e.g. to attach a stream buffer pool to a
    /// level other than the deepest one.
    pub fn level_mut(&mut self, n: usize) -> Option<&mut CacheLevel> {
        self.levels.get_mut(n)
    }

    /// The last level, which talks to memory.
    pub fn last_level(&self) -> &CacheLevel {
        let last = self.levels.len() - 1;
        &self.levels[last]
    }

    /// Per-level results, L1 first.
    pub fn reports(&self) -> Vec<LevelReport> {
        self.levels.iter().map(CacheLevel::report).collect()
    }
}
