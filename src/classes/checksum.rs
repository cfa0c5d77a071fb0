//! CRC-32 boundary over the `crc32fast` crate.
//!
//! Pure and referentially transparent: no state is retained between calls
//! beyond the returned accumulator, so `update(update(c, a), b)` equals
//! `update(c, a ++ b)`.

use crc32fast::Hasher;

/// Longest input a single update may process. The algorithm addresses input
/// lengths as 32-bit quantities.
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// The accumulator for empty input.
pub fn initial() -> u32 {
    Hasher::new().finalize()
}

/// Feed `bytes` into a running checksum, returning the new accumulator.
pub fn update(crc: u32, bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(crc);
    hasher.update(bytes);
    hasher.finalize()
}
