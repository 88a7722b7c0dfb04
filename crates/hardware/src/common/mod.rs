//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every cache level. It includes:
//! 1. **Address Decoding:** Splitting byte addresses into offset, set index and tag.
//! 2. **Access Types:** Classifying requests as reads or writes.
//! 3. **Error Handling:** Configuration, trace and top-level error types.

/// Address decoding (offset / index / tag split and reconstruction).
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr};
pub use data::AccessType;
pub use error::{ConfigError, Result, SimError, TraceError};
