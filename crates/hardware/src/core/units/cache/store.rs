//! Set-associative tag store.
//!
//! Holds the valid / dirty / tag metadata of every way of every set in one
//! flat arena, with exact LRU ranks kept in a parallel [`LruRanks`] table.
//! The store only manages metadata; propagating requests to the next level is
//! the owning [`CacheLevel`](super::CacheLevel)'s job.

use tracing::debug;

use super::lru::LruRanks;
use crate::common::AddressDecoder;
use crate::stats::{BlockSnapshot, SetSnapshot};

/// Cache line entry containing tag, validity, and dirty bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CacheLine {
    tag: u32,
    valid: bool,
    dirty: bool,
}

/// Tag store of one cache level.
#[derive(Debug, Clone)]
pub struct SetAssocStore {
    decoder: AddressDecoder,
    lines: Vec<CacheLine>,
    lru: LruRanks,
    num_sets: usize,
    ways: usize,
}

impl SetAssocStore {
    /// Creates an empty store of `num_sets` sets with `ways` ways of `block_size`-byte blocks.
    ///
    /// Every line starts invalid and clean, with way `i` of each set at LRU rank `i`.
    pub fn new(num_sets: u32, ways: u32, block_size: u32) -> Self {
        let num_sets_usize = num_sets as usize;
        let ways_usize = ways as usize;
        Self {
            decoder: AddressDecoder::new(block_size, num_sets),
            lines: vec![CacheLine::default(); num_sets_usize * ways_usize],
            lru: LruRanks::new(num_sets_usize, ways_usize),
            num_sets: num_sets_usize,
            ways: ways_usize,
        }
    }

    /// Address decoder for this store's geometry.
    #[inline]
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Way of set `index` holding a valid copy of `tag`, if any.
    pub fn lookup(&self, index: usize, tag: u32) -> Option<usize> {
        self.set(index)
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Makes the way holding `tag` the most recently used way of set `index`.
    ///
    /// No-op when `tag` is absent or already MRU.
    pub fn update_lru(&mut self, index: usize, tag: u32) {
        if let Some(way) = self.lookup(index, tag) {
            self.lru.promote(index, way);
            debug_assert!(
                self.lru.is_permutation(index),
                "LRU ranks of set {index} are no longer a permutation"
            );
        }
    }

    /// Makes room in set `index` for an incoming block.
    ///
    /// Nothing happens while the set still has an invalid way. Otherwise the
    /// least recently used way is the victim; if it is dirty its dirty bit is
    /// cleared and the byte address of the block is returned so the caller can
    /// write it back. The victim keeps its tag until [`install`](Self::install)
    /// overwrites it.
    pub fn make_space(&mut self, index: usize) -> Option<u32> {
        if self.set(index).iter().any(|line| !line.valid) {
            return None;
        }
        let way = self.lru.least_recent(index);
        let slot = index * self.ways + way;
        let victim = &mut self.lines[slot];
        if !victim.dirty {
            debug!(set = index, way, tag = victim.tag, "evicting clean block");
            return None;
        }
        victim.dirty = false;
        let addr = self.decoder.block_addr(victim.tag, index);
        debug!(set = index, way, tag = victim.tag, addr, "evicting dirty block");
        Some(addr)
    }

    /// Installs `tag` into set `index` as a valid, clean block.
    ///
    /// Fills the lowest-index invalid way, or else overwrites the least
    /// recently used way. The caller must not install a tag that is already
    /// present in the set.
    pub fn install(&mut self, index: usize, tag: u32) {
        debug_assert!(
            self.lookup(index, tag).is_none(),
            "tag {tag:#x} already resident in set {index}"
        );
        let way = self
            .set(index)
            .iter()
            .position(|line| !line.valid)
            .unwrap_or_else(|| self.lru.least_recent(index));
        self.lines[index * self.ways + way] = CacheLine {
            tag,
            valid: true,
            dirty: false,
        };
    }

    /// Sets the dirty bit of the block holding `tag` in set `index`.
    pub fn mark_dirty(&mut self, index: usize, tag: u32) {
        if let Some(way) = self.lookup(index, tag) {
            self.lines[index * self.ways + way].dirty = true;
        }
    }

    /// Returns `true` if `tag` is resident and dirty in set `index`.
    pub fn is_dirty(&self, index: usize, tag: u32) -> bool {
        self.lookup(index, tag)
            .is_some_and(|way| self.set(index)[way].dirty)
    }

    /// Current LRU rank of `way` in set `index`.
    pub fn rank(&self, index: usize, way: usize) -> u32 {
        self.lru.rank(index, way)
    }

    /// Ranks of the valid ways of set `index`, in way order.
    pub fn valid_ranks(&self, index: usize) -> Vec<u32> {
        self.set(index)
            .iter()
            .enumerate()
            .filter(|(_, line)| line.valid)
            .map(|(way, _)| self.lru.rank(index, way))
            .collect()
    }

    /// Way that would be evicted from a full set `index`.
    pub fn victim_way(&self, index: usize) -> usize {
        self.lru.least_recent(index)
    }

    /// Snapshot of every set with its ways ordered MRU to LRU.
    pub fn snapshot(&self) -> Vec<SetSnapshot> {
        (0..self.num_sets)
            .map(|index| {
                let set = self.set(index);
                SetSnapshot {
                    index,
                    blocks: self
                        .lru
                        .mru_order(index)
                        .into_iter()
                        .map(|way| BlockSnapshot {
                            tag: set[way].tag,
                            valid: set[way].valid,
                            dirty: set[way].dirty,
                        })
                        .collect(),
                }
            })
            .collect()
    }

    #[inline]
    fn set(&self, index: usize) -> &[CacheLine] {
        let base = index * self.ways;
        &self.lines[base..base + self.ways]
    }
}
