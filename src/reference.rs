//! A slow, but clear reference implementation of rapidhash.
//!
//! All three variants are expressed by one loop, parameterized over the number of lanes. This is
//! used to check the optimized code paths against.

use secret::SECRET;
use variant::Variant;

/// The secret indices used by the 16-byte steps folding the tail of a long input.
///
/// A variant with `n` lanes takes the first `n - 1` steps.
const TAIL_SECRETS: [usize; 6] = [2, 2, 1, 1, 2, 1];

/// Multiply and fold.
fn mix(a: u64, b: u64) -> u64 {
    let (lo, hi) = mum(a, b);
    lo ^ hi
}

/// Multiply into the `(low, high)` halves of the 128-bit product.
fn mum(a: u64, b: u64) -> (u64, u64) {
    let r = (a as u128) * (b as u128);
    (r as u64, (r >> 64) as u64)
}

/// Read an integer in little-endian.
fn read_int(int: &[u8]) -> u64 {
    // Start at 0.
    let mut x = 0;
    for &i in int.iter().rev() {
        // Shift up a byte.
        x <<= 8;
        // Set the lower byte.
        x |= i as u64;
    }

    x
}

/// Read the 64-bit word starting at `at`.
fn word(buf: &[u8], at: usize) -> u64 {
    read_int(&buf[at..at + 8])
}

/// A reference implementation of rapidhash.
///
/// This hashes `buf` with `variant` according to the raw (unmixed) `seed`.
pub fn hash(variant: Variant, buf: &[u8], seed: u64) -> u64 {
    // Mix the seed.
    let mut seed = seed ^ mix(seed ^ SECRET[2], SECRET[1]);
    let len = buf.len();

    // Load the two words to finalize with, and the length mixed into the result.
    let (a, b, left) = if len == 0 {
        (0, 0, 0)
    } else if len <= 3 {
        let a = (buf[0] as u64) << 45 | buf[len - 1] as u64;
        (a, buf[len / 2] as u64, len)
    } else if len < 8 {
        (read_int(&buf[..4]), read_int(&buf[len - 4..]) ^ len as u64, len)
    } else if len <= 16 {
        (word(buf, 0), word(buf, len - 8) ^ len as u64, len)
    } else {
        let lanes = variant.lanes();
        let stride = variant.stride();

        // Run the lanes over every full stride, as long as some bytes remain afterwards.
        let mut state = vec![seed; lanes];
        let mut pos = 0;
        while len - pos > stride {
            for (k, lane) in state.iter_mut().enumerate() {
                let at = pos + 16 * k;
                *lane = mix(word(buf, at) ^ SECRET[k], word(buf, at + 8) ^ *lane);
            }
            pos += stride;
        }

        // XOR is associative, so the lane collapse reduces to a plain fold. Since the lane count is
        // odd, this gives back the seed unchanged when no stride was processed.
        seed = state.iter().fold(0, |acc, &lane| acc ^ lane);

        // Fold the remaining bytes, 16 at a time.
        let left = len - pos;
        for (step, &secret) in TAIL_SECRETS[..lanes - 1].iter().enumerate() {
            if left > 16 * (step + 1) {
                let at = pos + 16 * step;
                seed = mix(word(buf, at) ^ SECRET[secret], word(buf, at + 8) ^ seed);
            }
        }

        (word(buf, len - 16) ^ left as u64, word(buf, len - 8), left)
    };

    let (a, b) = mum(a ^ SECRET[1], b ^ seed);
    mix(a ^ SECRET[7], b ^ SECRET[1] ^ left as u64)
}
