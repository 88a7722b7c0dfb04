//! Simulation statistics collection and reporting.
//!
//! This module tracks and presents the results of a trace replay. It provides:
//! 1. **Per-level counters:** Reads, writes, their misses, write-backs and prefetched blocks.
//! 2. **Derived metrics:** Miss rates and total memory traffic.
//! 3. **Snapshots:** Final cache contents (MRU to LRU per set) and stream buffer contents.
//! 4. **Report:** The reference text layout via `Display`, or JSON via `serde`.

use std::fmt;

use serde::Serialize;

use crate::common::AccessType;
use crate::config::Config;

/// Counters owned by one cache level.
///
/// All counters only ever increase during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read requests serviced.
    pub reads: u64,
    /// Read requests that missed (and were not supplied by a stream buffer).
    pub read_misses: u64,
    /// Write requests serviced.
    pub writes: u64,
    /// Write requests that missed (and were not supplied by a stream buffer).
    pub write_misses: u64,
    /// Dirty blocks evicted and written to the next level.
    pub write_backs: u64,
    /// Blocks charged to the stream buffer prefetcher.
    pub prefetches: u64,
}

impl LevelStats {
    /// Counts one serviced request of `kind`.
    pub(crate) const fn record_access(&mut self, kind: AccessType) {
        match kind {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    /// Counts one demand miss of `kind`.
    pub(crate) const fn record_miss(&mut self, kind: AccessType) {
        match kind {
            AccessType::Read => self.read_misses += 1,
            AccessType::Write => self.write_misses += 1,
        }
    }

    /// Total requests serviced.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Total demand misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// `(read misses + write misses) / (reads + writes)`, or 0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses(), self.accesses())
    }

    /// `read misses / reads`, or 0 with no reads.
    pub fn read_miss_rate(&self) -> f64 {
        ratio(self.read_misses, self.reads)
    }

    /// Blocks moved between this level and the one below it.
    pub const fn memory_traffic(&self) -> u64 {
        self.read_misses + self.write_misses + self.write_backs + self.prefetches
    }
}

/// `num / den`, or 0 when `den` is 0.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// One way of a set in a contents snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
    /// Stored tag.
    pub tag: u32,
    /// Whether the way holds a block.
    pub valid: bool,
    /// Whether the block is dirty.
    pub dirty: bool,
}

/// One set in a contents snapshot, ways ordered MRU to LRU.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetSnapshot {
    /// Set index.
    pub index: usize,
    /// Ways, most recently used first.
    pub blocks: Vec<BlockSnapshot>,
}

/// Final state of one cache level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelReport {
    /// Level label (`L1`, `L2`).
    pub name: String,
    /// Counters.
    pub stats: LevelStats,
    /// Cache contents.
    pub contents: Vec<SetSnapshot>,
    /// Stream buffer contents, most recently used stream first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_buffers: Option<Vec<Vec<u32>>>,
}

/// Results of a complete run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimReport {
    /// Configuration the hierarchy was built from.
    pub config: Config,
    /// Configured levels, L1 first.
    pub levels: Vec<LevelReport>,
    /// Traffic between the last level and memory.
    pub memory_traffic: u64,
}

impl SimReport {
    /// Builds a report from the per-level results.
    pub fn new(config: Config, levels: Vec<LevelReport>) -> Self {
        let memory_traffic = levels
            .last()
            .map_or(0, |last| last.stats.memory_traffic());
        Self {
            config,
            levels,
            memory_traffic,
        }
    }

    /// Counters of level `n` (0 = L1), or all zeros when not configured.
    pub fn level_stats(&self, n: usize) -> LevelStats {
        self.levels.get(n).map(|l| l.stats).unwrap_or_default()
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures; none are expected for this type.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SimReport {
    /// Writes contents and measurements in the reference text layout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in &self.levels {
            writeln!(f, "===== {} contents =====", level.name)?;
            for set in &level.contents {
                write!(f, "set{:>7}:   ", set.index)?;
                for block in &set.blocks {
                    if block.dirty {
                        write!(f, "{:x} D  ", block.tag)?;
                    } else {
                        write!(f, "{:x}    ", block.tag)?;
                    }
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }

        if self.config.prefetch.enabled() {
            writeln!(f, "===== Stream Buffer(s) contents =====")?;
            for level in &self.levels {
                for stream in level.stream_buffers.iter().flatten() {
                    for tag in stream {
                        write!(f, " {tag:x} ")?;
                    }
                    writeln!(f)?;
                }
                if level.stream_buffers.is_some() {
                    writeln!(f)?;
                }
            }
        }

        let l1 = self.level_stats(0);
        let l2 = self.level_stats(1);
        let l2_miss_rate = if self.levels.len() > 1 {
            l2.read_miss_rate()
        } else {
            0.0
        };
        writeln!(f, "===== Measurements =====")?;
        writeln!(f, "a. L1 reads:                   {}", l1.reads)?;
        writeln!(f, "b. L1 read misses:             {}", l1.read_misses)?;
        writeln!(f, "c. L1 writes:                  {}", l1.writes)?;
        writeln!(f, "d. L1 write misses:            {}", l1.write_misses)?;
        writeln!(f, "e. L1 miss rate:               {:.4}", l1.miss_rate())?;
        writeln!(f, "f. L1 writebacks:              {}", l1.write_backs)?;
        writeln!(f, "g. L1 prefetches:              {}", l1.prefetches)?;
        writeln!(f, "h. L2 reads (demand):          {}", l2.reads)?;
        writeln!(f, "i. L2 read misses (demand):    {}", l2.read_misses)?;
        // L1 never prefetches into L2, so prefetch-originated L2 traffic is always zero.
        writeln!(f, "j. L2 reads (prefetch):        0")?;
        writeln!(f, "k. L2 read misses (prefetch):  0")?;
        writeln!(f, "l. L2 writes:                  {}", l2.writes)?;
        writeln!(f, "m. L2 write misses:            {}", l2.write_misses)?;
        writeln!(f, "n. L2 miss rate:               {l2_miss_rate:.4}")?;
        writeln!(f, "o. L2 writebacks:              {}", l2.write_backs)?;
        writeln!(f, "p. L2 prefetches:              {}", l2.prefetches)?;
        writeln!(f, "q. memory traffic:             {}", self.memory_traffic)
    }
}
