//! Stream Buffer Prefetcher.
//!
//! A pool of N stream buffers, each holding the next M sequential block tags
//! expected after some base block. The pool works on block tags (the address
//! shifted right by the block-offset bits, with no set indexing) and keeps its
//! own exact LRU ranking among streams.
//!
//! On every demand request the owning cache level reports whether the cache
//! hit; the pool combines that with its own lookup into one of four
//! [`StreamScenario`]s:
//!
//! | Cache | Buffer | Scenario | Pool action |
//! |-------|--------|----------|-------------|
//! | miss  | miss   | [`NewStream`](StreamScenario::NewStream) | refill the LRU stream |
//! | miss  | hit    | [`BufferHit`](StreamScenario::BufferHit) | advance the matching stream |
//! | hit   | miss   | [`Idle`](StreamScenario::Idle) | nothing |
//! | hit   | hit    | [`Synced`](StreamScenario::Synced) | advance the matching stream |

use tracing::{debug, trace};

use crate::core::units::cache::lru::LruRanks;

/// Outcome of presenting one demand request to the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamScenario {
    /// Cache miss, buffer miss: a fresh stream was started.
    NewStream,
    /// Cache miss, buffer hit: the buffer supplies the block.
    BufferHit,
    /// Cache hit, buffer miss: the pool is untouched.
    Idle,
    /// Cache hit, buffer hit: the stream is advanced to stay ahead of demand.
    Synced,
}

impl StreamScenario {
    /// Returns `true` when the buffer supplies the block instead of the next level.
    #[inline]
    pub const fn supplies_block(self) -> bool {
        matches!(self, Self::BufferHit)
    }
}

/// Result of [`StreamBufferPool::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefetchOutcome {
    /// Which of the four cache/buffer scenarios applied.
    pub scenario: StreamScenario,
    /// Blocks charged to the prefetch counter by this request.
    pub prefetched: u64,
}

/// One stream buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Stream {
    /// Set once the stream has been filled.
    valid: bool,
    /// Predicted tags `base + 1 ..= base + M`; all zero before the first fill.
    tags: Vec<u32>,
}

/// Pool of stream buffers attached to one cache level.
#[derive(Debug, Clone)]
pub struct StreamBufferPool {
    streams: Vec<Stream>,
    lru: LruRanks,
    depth: usize,
}

impl StreamBufferPool {
    /// Creates `streams` empty stream buffers of `depth` blocks each.
    ///
    /// Stream `i` starts at LRU rank `i`.
    pub fn new(streams: u32, depth: u32) -> Self {
        debug_assert!(streams > 0 && depth > 0, "empty stream buffer pool");
        let depth = depth as usize;
        Self {
            streams: vec![
                Stream {
                    valid: false,
                    tags: vec![0; depth],
                };
                streams as usize
            ],
            lru: LruRanks::new(1, streams as usize),
            depth,
        }
    }

    /// Number of streams (`PREF_N`).
    #[inline]
    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }

    /// Blocks per stream (`PREF_M`).
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Classifies a request for `block` and updates the pool accordingly.
    ///
    /// # Arguments
    ///
    /// * `block` - Block tag of the request.
    /// * `cache_hit` - Whether the owning cache already holds the block.
    pub fn observe(&mut self, block: u32, cache_hit: bool) -> PrefetchOutcome {
        let (scenario, prefetched) = match (cache_hit, self.check_hit(block)) {
            (false, None) => (StreamScenario::NewStream, self.fill_lru_stream(block)),
            (false, Some(stream)) => (StreamScenario::BufferHit, self.advance_stream(stream, block)),
            (true, Some(stream)) => (StreamScenario::Synced, self.advance_stream(stream, block)),
            (true, None) => (StreamScenario::Idle, 0),
        };
        trace!(block, ?scenario, prefetched, "stream buffer lookup");
        PrefetchOutcome {
            scenario,
            prefetched,
        }
    }

    /// Most recently used stream containing `block`, if any.
    ///
    /// Streams that were never filled hold all-zero tags and therefore match
    /// block 0.
    pub fn check_hit(&self, block: u32) -> Option<usize> {
        self.streams
            .iter()
            .enumerate()
            .filter(|(_, stream)| stream.tags.contains(&block))
            .min_by_key(|&(i, _)| self.lru.rank(0, i))
            .map(|(i, _)| i)
    }

    /// Starts a new stream after `block` in the least recently used stream buffer.
    ///
    /// Charges `M` prefetched blocks and returns that charge.
    pub fn fill_lru_stream(&mut self, block: u32) -> u64 {
        let victim = self.lru.least_recent(0);
        debug!(stream = victim, base = block, "starting new prefetch stream");
        self.refill(victim, block);
        self.depth as u64
    }

    /// Slides stream `stream` forward so it starts right after `block`.
    ///
    /// A stream that was already valid is charged the 1-based position of
    /// `block` in its old window; one that was never filled is charged the full
    /// depth. Returns the charge.
    pub fn advance_stream(&mut self, stream: usize, block: u32) -> u64 {
        let current = &self.streams[stream];
        let charged = if current.valid {
            current
                .tags
                .iter()
                .position(|&tag| tag == block)
                .map_or(0, |pos| pos as u64 + 1)
        } else {
            self.depth as u64
        };
        trace!(stream, base = block, charged, "advancing prefetch stream");
        self.refill(stream, block);
        charged
    }

    /// Makes `stream` the most recently used stream.
    pub fn touch_stream(&mut self, stream: usize) {
        self.lru.promote(0, stream);
        debug_assert!(self.lru.is_permutation(0), "stream LRU ranks corrupted");
    }

    /// LRU rank of `stream` (0 is MRU).
    pub fn rank(&self, stream: usize) -> u32 {
        self.lru.rank(0, stream)
    }

    /// Returns `true` once `stream` has been filled.
    pub fn is_valid(&self, stream: usize) -> bool {
        self.streams[stream].valid
    }

    /// Predicted tags of `stream`, oldest prediction first.
    pub fn tags(&self, stream: usize) -> &[u32] {
        &self.streams[stream].tags
    }

    /// Predicted tags of every stream, ordered MRU to LRU.
    pub fn snapshot(&self) -> Vec<Vec<u32>> {
        self.lru
            .mru_order(0)
            .into_iter()
            .map(|i| self.streams[i].tags.clone())
            .collect()
    }

    /// Overwrites `stream` with `block + 1 ..= block + M`, marks it valid and promotes it.
    fn refill(&mut self, stream: usize, block: u32) {
        let target = &mut self.streams[stream];
        for (offset, tag) in (1u32..).zip(target.tags.iter_mut()) {
            *tag = block.wrapping_add(offset);
        }
        target.valid = true;
        self.touch_stream(stream);
    }
}
