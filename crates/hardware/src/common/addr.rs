//! Address decoding for a single cache level.
//!
//! This module splits 32-bit byte addresses into the fields a set-associative
//! cache indexes by. It provides the following:
//! 1. **Decoding:** Byte address to (block offset, set index, tag).
//! 2. **Block tags:** Set-agnostic block numbers used by stream buffers.
//! 3. **Reconstruction:** Rebuilding a victim's byte address from its tag and set.

/// Fields of a byte address as seen by one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Byte offset within the block.
    pub offset: u32,
    /// Set index.
    pub index: usize,
    /// Tag stored in the way.
    pub tag: u32,
}

/// Bit layout of addresses for a given block size and set count.
///
/// Both the block size and the set count must be powers of two (a set count
/// of 1 gives a fully-associative cache with no index bits). The configuration
/// layer rejects anything else before a decoder is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    /// Creates a decoder for `block_size`-byte blocks spread over `num_sets` sets.
    ///
    /// # Panics
    ///
    /// Debug builds assert that both arguments are nonzero powers of two.
    pub fn new(block_size: u32, num_sets: u32) -> Self {
        debug_assert!(block_size.is_power_of_two(), "block size {block_size} is not a power of two");
        debug_assert!(num_sets.is_power_of_two(), "set count {num_sets} is not a power of two");
        Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        }
    }

    /// Number of block-offset bits.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits (0 for a single set).
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Splits `addr` into offset, set index and tag.
    #[inline]
    pub const fn decode(&self, addr: u32) -> DecodedAddr {
        let offset_mask = low_mask(self.offset_bits);
        let index_mask = low_mask(self.index_bits);
        DecodedAddr {
            offset: addr & offset_mask,
            index: (shr(addr, self.offset_bits) & index_mask) as usize,
            tag: shr(addr, self.offset_bits + self.index_bits),
        }
    }

    /// Block number of `addr`, ignoring set indexing.
    #[inline]
    pub const fn block_tag(&self, addr: u32) -> u32 {
        shr(addr, self.offset_bits)
    }

    /// Rebuilds the first byte address of the block holding `tag` in set `index`.
    #[inline]
    pub const fn block_addr(&self, tag: u32, index: usize) -> u32 {
        let block = shl(tag, self.index_bits) | index as u32;
        shl(block, self.offset_bits)
    }
}

/// Mask with the low `bits` bits set.
const fn low_mask(bits: u32) -> u32 {
    if bits >= u32::BITS { u32::MAX } else { (1u32 << bits) - 1 }
}

/// `value >> bits`, yielding 0 when every bit is shifted out.
const fn shr(value: u32, bits: u32) -> u32 {
    if bits >= u32::BITS { 0 } else { value >> bits }
}

/// `value << bits`, yielding 0 when every bit is shifted out.
const fn shl(value: u32, bits: u32) -> u32 {
    if bits >= u32::BITS { 0 } else { value << bits }
}
