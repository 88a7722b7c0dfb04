//! Set-Associative Cache Level.
//!
//! This module implements one level of a write-back, write-allocate cache
//! hierarchy. A level composes a [`SetAssocStore`] with an optional
//! [`StreamBufferPool`], counts its own traffic, and forwards misses and
//! dirty evictions to whatever sits below it through the [`Downstream`]
//! trait.

/// Exact LRU rank tables shared by sets and stream pools.
pub mod lru;

/// Set-associative tag store.
pub mod store;

pub use self::store::SetAssocStore;

use tracing::trace;

use crate::common::{AccessType, DecodedAddr};
use crate::core::units::prefetch::{StreamBufferPool, StreamScenario};
use crate::stats::{LevelReport, LevelStats};

/// Receiver of requests a cache level forwards below itself.
///
/// Implemented by the remaining levels of a hierarchy (`[CacheLevel]`, where
/// the first element is the next level) and by [`Memory`].
pub trait Downstream {
    /// Demand read (block fetch) of `addr`.
    fn read(&mut self, addr: u32);

    /// Write-back of the block at `addr`.
    fn write(&mut self, addr: u32);
}

/// Main memory: absorbs every request and never misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Memory;

impl Downstream for Memory {
    fn read(&mut self, addr: u32) {
        trace!(addr, "read served by memory");
    }

    fn write(&mut self, addr: u32) {
        trace!(addr, "write-back absorbed by memory");
    }
}

impl Downstream for [CacheLevel] {
    fn read(&mut self, addr: u32) {
        match self.split_first_mut() {
            Some((next, rest)) => next.read(addr, rest),
            None => Memory.read(addr),
        }
    }

    fn write(&mut self, addr: u32) {
        match self.split_first_mut() {
            Some((next, rest)) => next.write(addr, rest),
            None => Memory.write(addr),
        }
    }
}

/// One level of the cache hierarchy.
#[derive(Debug, Clone)]
pub struct CacheLevel {
    name: &'static str,
    store: SetAssocStore,
    prefetcher: Option<StreamBufferPool>,
    stats: LevelStats,
}

impl CacheLevel {
    /// Creates an empty level without a prefetcher.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in logs and reports (`L1`, `L2`).
    /// * `num_sets` - Number of sets (power of two).
    /// * `ways` - Associativity.
    /// * `block_size` - Block size in bytes (power of two).
    pub fn new(name: &'static str, num_sets: u32, ways: u32, block_size: u32) -> Self {
        Self {
            name,
            store: SetAssocStore::new(num_sets, ways, block_size),
            prefetcher: None,
            stats: LevelStats::default(),
        }
    }

    /// Attaches `streams` stream buffers of `depth` blocks to this level.
    ///
    /// Does nothing if a pool is already attached or either argument is zero.
    pub fn attach_stream_buffers(&mut self, streams: u32, depth: u32) {
        if self.prefetcher.is_none() && streams != 0 && depth != 0 {
            self.prefetcher = Some(StreamBufferPool::new(streams, depth));
        }
    }

    /// Level label.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Counters accumulated so far.
    #[inline]
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// Tag store.
    #[inline]
    pub const fn store(&self) -> &SetAssocStore {
        &self.store
    }

    /// Attached stream buffer pool, if any.
    #[inline]
    pub const fn prefetcher(&self) -> Option<&StreamBufferPool> {
        self.prefetcher.as_ref()
    }

    /// Returns `true` if a block containing `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        let DecodedAddr { index, tag, .. } = self.store.decoder().decode(addr);
        self.store.lookup(index, tag).is_some()
    }

    /// Services a demand read of `addr`.
    pub fn read<D: Downstream + ?Sized>(&mut self, addr: u32, next: &mut D) {
        self.access(AccessType::Read, addr, next);
    }

    /// Services a demand write to `addr`.
    pub fn write<D: Downstream + ?Sized>(&mut self, addr: u32, next: &mut D) {
        self.access(AccessType::Write, addr, next);
    }

    /// Services one request end to end.
    ///
    /// On a miss the order is always: make space (possibly writing back a
    /// dirty victim to `next`), fetch from `next` unless a stream buffer
    /// supplies the block, install, promote. Write misses fetch with a read.
    pub fn access<D: Downstream + ?Sized>(&mut self, kind: AccessType, addr: u32, next: &mut D) {
        let DecodedAddr { index, tag, .. } = self.store.decoder().decode(addr);
        let cache_hit = self.store.lookup(index, tag).is_some();

        let mut scenario = None;
        if let Some(pool) = self.prefetcher.as_mut() {
            let block = self.store.decoder().block_tag(addr);
            let outcome = pool.observe(block, cache_hit);
            self.stats.prefetches += outcome.prefetched;
            scenario = Some(outcome.scenario);
        }
        trace!(level = self.name, %kind, addr, index, tag, cache_hit, ?scenario, "request");

        if !cache_hit {
            let supplied = scenario.is_some_and(StreamScenario::supplies_block);
            if !supplied {
                self.stats.record_miss(kind);
            }
            if let Some(victim) = self.store.make_space(index) {
                self.stats.write_backs += 1;
                next.write(victim);
            }
            if !supplied {
                next.read(addr);
            }
            self.store.install(index, tag);
        }
        self.store.update_lru(index, tag);
        if kind.is_write() {
            self.store.mark_dirty(index, tag);
        }
        self.stats.record_access(kind);
    }

    /// Counters plus final cache and stream buffer contents.
    pub fn report(&self) -> LevelReport {
        LevelReport {
            name: self.name.to_owned(),
            stats: self.stats,
            contents: self.store.snapshot(),
            stream_buffers: self.prefetcher.as_ref().map(StreamBufferPool::snapshot),
        }
    }
}
