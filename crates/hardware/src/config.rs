//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry constants used when JSON omits a field.
//! 2. **Structures:** Block size, per-level cache geometry and stream-buffer prefetcher.
//! 3. **Validation:** Rejection of geometries the address decoder cannot represent.
//!
//! Configuration is normally built from the seven command-line integers with
//! [`Config::from_params`], or deserialized from JSON.

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default block size in bytes.
    pub const BLOCK_SIZE: u32 = 32;

    /// Default L1 size in bytes (1 KiB).
    pub const L1_SIZE: u32 = 1024;

    /// Default L1 associativity.
    pub const L1_WAYS: u32 = 2;

    /// L2 is disabled unless configured.
    pub const L2_SIZE: u32 = 0;

    /// L2 is disabled unless configured.
    pub const L2_WAYS: u32 = 0;

    /// Prefetching is disabled unless configured.
    pub const PREF_STREAMS: u32 = 0;

    /// Prefetching is disabled unless configured.
    pub const PREF_DEPTH: u32 = 0;
}

/// Root configuration structure.
///
/// # Examples
///
/// Building from the seven command-line parameters:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let config = Config::from_params(32, 8192, 4, 262144, 8, 3, 10);
/// assert!(config.l2.enabled());
/// assert_eq!(config.l1.num_sets(config.block_size), 64);
/// assert!(config.prefetch.enabled());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let json = r#"{
///     "block_size": 16,
///     "l1": { "size_bytes": 1024, "ways": 1 },
///     "prefetch": { "streams": 1, "depth": 4 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.block_size, 16);
/// assert!(!config.l2.enabled());
/// assert_eq!(config.prefetch.depth, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Block size in bytes, shared by every level.
    #[serde(default = "Config::default_block_size")]
    pub block_size: u32,
    /// First-level cache geometry.
    #[serde(default = "CacheConfig::default_l1")]
    pub l1: CacheConfig,
    /// Second-level cache geometry; disabled when size or ways is zero.
    #[serde(default = "CacheConfig::default_l2")]
    pub l2: CacheConfig,
    /// Stream-buffer prefetcher attached to the last level.
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Config {
    /// Builds a configuration from `BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M`.
    pub const fn from_params(
        block_size: u32,
        l1_size: u32,
        l1_assoc: u32,
        l2_size: u32,
        l2_assoc: u32,
        pref_n: u32,
        pref_m: u32,
    ) -> Self {
        Self {
            block_size,
            l1: CacheConfig {
                size_bytes: l1_size,
                ways: l1_assoc,
            },
            l2: CacheConfig {
                size_bytes: l2_size,
                ways: l2_assoc,
            },
            prefetch: PrefetchConfig {
                streams: pref_n,
                depth: pref_m,
            },
        }
    }

    /// Checks that every enabled level decodes cleanly.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: a block size that is not a
    /// power of two, a zero-way L1, or a level whose set count is not a
    /// nonzero power of two.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        self.l1.validate("L1", self.block_size)?;
        if self.l2.enabled() {
            self.l2.validate("L2", self.block_size)?;
        }
        Ok(())
    }

    /// Index of the level the prefetcher attaches to (the deepest configured level).
    pub const fn prefetch_level(&self) -> usize {
        if self.l2.enabled() { 1 } else { 0 }
    }

    /// Returns the default block size.
    const fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            l1: CacheConfig::default_l1(),
            l2: CacheConfig::default_l2(),
            prefetch: PrefetchConfig::default(),
        }
    }
}

/// Geometry of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in bytes.
    #[serde(default)]
    pub size_bytes: u32,
    /// Associativity (ways per set).
    #[serde(default)]
    pub ways: u32,
}

impl CacheConfig {
    /// Returns `true` when both size and associativity are nonzero.
    pub const fn enabled(&self) -> bool {
        self.size_bytes != 0 && self.ways != 0
    }

    /// Number of sets for the given block size (0 if the level is disabled).
    pub const fn num_sets(&self, block_size: u32) -> u32 {
        let set_bytes = self.ways.saturating_mul(block_size);
        if set_bytes == 0 { 0 } else { self.size_bytes / set_bytes }
    }

    /// Validates this level against `block_size`.
    fn validate(&self, level: &'static str, block_size: u32) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroAssociativity { level });
        }
        let set_bytes = u64::from(self.ways) * u64::from(block_size);
        if u64::from(self.size_bytes) % set_bytes != 0 {
            return Err(ConfigError::UnevenSets {
                level,
                size: self.size_bytes,
                ways: self.ways,
                block_size,
            });
        }
        let sets = self.num_sets(block_size);
        if !sets.is_power_of_two() {
            return Err(ConfigError::SetCount { level, sets });
        }
        Ok(())
    }

    /// Default L1 geometry.
    const fn default_l1() -> Self {
        Self {
            size_bytes: defaults::L1_SIZE,
            ways: defaults::L1_WAYS,
        }
    }

    /// Default (disabled) L2 geometry.
    const fn default_l2() -> Self {
        Self {
            size_bytes: defaults::L2_SIZE,
            ways: defaults::L2_WAYS,
        }
    }
}

/// Stream-buffer prefetcher geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchConfig {
    /// Number of stream buffers (`PREF_N`).
    #[serde(default)]
    pub streams: u32,
    /// Blocks held by each stream buffer (`PREF_M`).
    #[serde(default)]
    pub depth: u32,
}

impl PrefetchConfig {
    /// Returns `true` when both the stream count and depth are nonzero.
    pub const fn enabled(&self) -> bool {
        self.streams != 0 && self.depth != 0
    }
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            streams: defaults::PREF_STREAMS,
            depth: defaults::PREF_DEPTH,
        }
    }
}
