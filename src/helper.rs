//! Helper functions.

use byteorder::{ByteOrder, LittleEndian};

use secret::SECRET;

/// Multiply two integers into a 128-bit product and return the `(low, high)` halves.
#[inline(always)]
pub fn mum(a: u64, b: u64) -> (u64, u64) {
    let r = a as u128 * b as u128;

    (r as u64, (r >> 64) as u64)
}

/// The mixing function.
///
/// This folds the full 128-bit product of `a` and `b` by XORing the two halves together. Every
/// step of the hash is built from this.
#[inline(always)]
pub fn mix(a: u64, b: u64) -> u64 {
    let (lo, hi) = mum(a, b);

    lo ^ hi
}

/// Mix a raw seed into the form used by the bulk and finalization steps.
#[inline(always)]
pub fn mix_seed(seed: u64) -> u64 {
    seed ^ mix(seed ^ SECRET[2], SECRET[1])
}

/// Read a little-endian 64-bit integer starting at `at`.
///
/// This panics if there are less than 8 bytes from `at` to the end of `buf`.
#[inline(always)]
pub fn read_u64(buf: &[u8], at: usize) -> u64 {
    LittleEndian::read_u64(&buf[at..at + 8])
}

/// Read a little-endian 32-bit integer starting at `at`, zero-extended.
///
/// This panics if there are less than 4 bytes from `at` to the end of `buf`.
#[inline(always)]
pub fn read_u32(buf: &[u8], at: usize) -> u64 {
    LittleEndian::read_u32(&buf[at..at + 4]) as u64
}

/// Load a buffer of 1 to 3 bytes into two lanes.
///
/// The first lane holds the first byte (shifted up by 45) and the last byte, the second lane holds
/// the middle byte. For shorter buffers the bytes overlap.
#[inline(always)]
pub fn read_small(buf: &[u8]) -> (u64, u64) {
    debug_assert!(!buf.is_empty() && buf.len() <= 3, "The small read must span 1 to 3 bytes.");

    let len = buf.len();

    ((buf[0] as u64) << 45 | buf[len - 1] as u64, buf[len >> 1] as u64)
}
