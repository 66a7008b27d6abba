//! The three optimized variants.
//!
//! Every variant shares the same short-input paths and finalization, and differs only in the bulk
//! loop for long inputs:
//!
//! | variant   | lanes | stride |
//! |-----------|-------|--------|
//! | `Default` | 7     | 112    |
//! | `Micro`   | 5     | 80     |
//! | `Nano`    | 3     | 48     |
//!
//! As a consequence, all three agree on inputs up to 48 bytes, and `Default` and `Micro` agree on
//! inputs up to 80 bytes.

use engine::{self, BLOCK};
use helper::{mix, mix_seed, mum, read_small, read_u32, read_u64};
use secret::{SECRET, SEED0_MIXED};

/// Inputs longer than this are routed through the process-wide block engine.
const LARGE: usize = 448;

/// A rapidhash variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The default variant, fastest for large inputs.
    Default,
    /// The micro variant, tuned for cache-sensitive inputs up to around 512 bytes.
    Micro,
    /// The nano variant, tuned for code size and inputs up to 48 bytes.
    Nano,
}

impl Variant {
    /// The number of bytes consumed per iteration of the bulk loop.
    pub fn stride(self) -> usize {
        16 * self.lanes()
    }

    /// The number of parallel lanes of the bulk loop.
    pub fn lanes(self) -> usize {
        match self {
            Variant::Default => 7,
            Variant::Micro => 5,
            Variant::Nano => 3,
        }
    }

    /// Hash some buffer with the default seed.
    pub fn hash(self, buf: &[u8]) -> u64 {
        match self {
            Variant::Default => hash(buf),
            Variant::Micro => hash_micro(buf),
            Variant::Nano => hash_nano(buf),
        }
    }

    /// Hash some buffer according to a chosen seed.
    pub fn hash_with_seed(self, buf: &[u8], seed: u64) -> u64 {
        match self {
            Variant::Default => hash_with_seed(buf, seed),
            Variant::Micro => hash_micro_with_seed(buf, seed),
            Variant::Nano => hash_nano_with_seed(buf, seed),
        }
    }
}

/// Hash a buffer given an already mixed seed, passing inputs longer than 16 bytes to `long`.
#[inline(always)]
fn dispatch(buf: &[u8], seed: u64, long: fn(&[u8], u64) -> u64) -> u64 {
    let len = buf.len();

    match len {
        0 => {
            let (a, b) = mum(SECRET[1], seed);

            mix(a ^ SECRET[7], b ^ SECRET[1])
        },
        1..=3 => {
            // Unlike the longer paths, the length is not mixed into `b` here.
            let (a, b) = read_small(buf);
            let (a, b) = mum(a ^ SECRET[1], b ^ seed);

            mix(a ^ SECRET[7], b ^ SECRET[1] ^ len as u64)
        },
        4..=16 => {
            // Read two words overlapping in the middle, one from each end of the buffer.
            let (a, b) = if len >= 8 {
                (read_u64(buf, 0), read_u64(buf, len - 8))
            } else {
                (read_u32(buf, 0), read_u32(buf, len - 4))
            };
            let (a, b) = mum(a ^ SECRET[1], b ^ seed ^ len as u64);

            mix(a ^ SECRET[7], b ^ SECRET[1] ^ len as u64)
        },
        _ => long(buf, seed),
    }
}

/// Finalize the hash of a buffer longer than 16 bytes.
///
/// `left` is the number of bytes the bulk loop left unprocessed. The last 16 bytes are always read
/// from the end of the whole buffer, regardless of where the loop stopped.
#[inline(always)]
fn finalize(buf: &[u8], seed: u64, left: usize) -> u64 {
    let len = buf.len();
    let left = left as u64;

    let a = read_u64(buf, len - 16) ^ left ^ SECRET[1];
    let b = read_u64(buf, len - 8) ^ seed;
    let (a, b) = mum(a, b);

    mix(a ^ SECRET[7], b ^ SECRET[1] ^ left)
}

/// Run the bulk loop of the default variant through the process-wide engine.
///
/// This is kept out of line, so the register pressure of the seven lanes does not leak into the
/// paths for smaller inputs.
#[inline(never)]
fn large_blocks(buf: &[u8], seed: u64) -> (usize, u64) {
    let mut lanes = [seed; 7];
    let read = engine::active().accumulate(buf, &mut lanes);

    (read, collapse7(lanes))
}

/// Collapse the seven lanes of the default variant into one seed.
#[inline(always)]
fn collapse7([mut seed, see1, mut see2, see3, mut see4, see5, see6]: engine::Lanes) -> u64 {
    seed ^= see1;
    see2 ^= see3;
    see4 ^= see5;
    seed ^= see6;
    see2 ^= see4;
    seed ^= see2;

    seed
}

/// Hash a buffer of more than 16 bytes with the default variant.
#[inline(never)]
fn long_default(buf: &[u8], mut seed: u64) -> u64 {
    let len = buf.len();
    let (read, collapsed) = if len > LARGE {
        large_blocks(buf, seed)
    } else if len > BLOCK {
        let mut lanes = [seed; 7];
        let read = engine::accumulate_blocks(buf, &mut lanes);

        (read, collapse7(lanes))
    } else {
        (0, seed)
    };
    seed = collapsed;

    // The rest is at most one block; fold it 16 bytes at a time.
    let rest = &buf[read..];
    let left = rest.len();
    if left > 16 {
        seed = mix(read_u64(rest, 0) ^ SECRET[2], read_u64(rest, 8) ^ seed);
        if left > 32 {
            seed = mix(read_u64(rest, 16) ^ SECRET[2], read_u64(rest, 24) ^ seed);
        }
        if left > 48 {
            seed = mix(read_u64(rest, 32) ^ SECRET[1], read_u64(rest, 40) ^ seed);
        }
        if left > 64 {
            seed = mix(read_u64(rest, 48) ^ SECRET[1], read_u64(rest, 56) ^ seed);
        }
        if left > 80 {
            seed = mix(read_u64(rest, 64) ^ SECRET[2], read_u64(rest, 72) ^ seed);
        }
        if left > 96 {
            seed = mix(read_u64(rest, 80) ^ SECRET[1], read_u64(rest, 88) ^ seed);
        }
    }

    finalize(buf, seed, left)
}

/// Hash a buffer of more than 16 bytes with the micro variant.
#[inline(never)]
fn long_micro(buf: &[u8], mut seed: u64) -> u64 {
    const STRIDE: usize = 80;

    let mut read = 0;
    if buf.len() > STRIDE {
        let (mut see1, mut see2, mut see3, mut see4) = (seed, seed, seed, seed);

        while buf.len() - read > STRIDE {
            let block = &buf[read..read + STRIDE];

            seed = mix(read_u64(block, 0) ^ SECRET[0], read_u64(block, 8) ^ seed);
            see1 = mix(read_u64(block, 16) ^ SECRET[1], read_u64(block, 24) ^ see1);
            see2 = mix(read_u64(block, 32) ^ SECRET[2], read_u64(block, 40) ^ see2);
            see3 = mix(read_u64(block, 48) ^ SECRET[3], read_u64(block, 56) ^ see3);
            see4 = mix(read_u64(block, 64) ^ SECRET[4], read_u64(block, 72) ^ see4);

            read += STRIDE;
        }

        seed ^= see1;
        see2 ^= see3;
        seed ^= see4;
        seed ^= see2;
    }

    let rest = &buf[read..];
    let left = rest.len();
    if left > 16 {
        seed = mix(read_u64(rest, 0) ^ SECRET[2], read_u64(rest, 8) ^ seed);
        if left > 32 {
            seed = mix(read_u64(rest, 16) ^ SECRET[2], read_u64(rest, 24) ^ seed);
        }
        if left > 48 {
            seed = mix(read_u64(rest, 32) ^ SECRET[1], read_u64(rest, 40) ^ seed);
        }
        if left > 64 {
            seed = mix(read_u64(rest, 48) ^ SECRET[1], read_u64(rest, 56) ^ seed);
        }
    }

    finalize(buf, seed, left)
}

/// Hash a buffer of more than 16 bytes with the nano variant.
#[inline(never)]
fn long_nano(buf: &[u8], mut seed: u64) -> u64 {
    const STRIDE: usize = 48;

    let mut read = 0;
    if buf.len() > STRIDE {
        let (mut see1, mut see2) = (seed, seed);

        while buf.len() - read > STRIDE {
            let block = &buf[read..read + STRIDE];

            seed = mix(read_u64(block, 0) ^ SECRET[0], read_u64(block, 8) ^ seed);
            see1 = mix(read_u64(block, 16) ^ SECRET[1], read_u64(block, 24) ^ see1);
            see2 = mix(read_u64(block, 32) ^ SECRET[2], read_u64(block, 40) ^ see2);

            read += STRIDE;
        }

        seed ^= see1;
        seed ^= see2;
    }

    let rest = &buf[read..];
    let left = rest.len();
    if left > 16 {
        seed = mix(read_u64(rest, 0) ^ SECRET[2], read_u64(rest, 8) ^ seed);
        if left > 32 {
            seed = mix(read_u64(rest, 16) ^ SECRET[2], read_u64(rest, 24) ^ seed);
        }
    }

    finalize(buf, seed, left)
}

/// Hash some buffer with the default variant.
///
/// This starts from the precomputed mixed seed, skipping the seed fold.
pub fn hash(buf: &[u8]) -> u64 {
    dispatch(buf, SEED0_MIXED, long_default)
}

/// Hash some buffer with the default variant according to a chosen seed.
pub fn hash_with_seed(buf: &[u8], seed: u64) -> u64 {
    dispatch(buf, mix_seed(seed), long_default)
}

/// Hash some buffer with the micro variant.
pub fn hash_micro(buf: &[u8]) -> u64 {
    dispatch(buf, SEED0_MIXED, long_micro)
}

/// Hash some buffer with the micro variant according to a chosen seed.
pub fn hash_micro_with_seed(buf: &[u8], seed: u64) -> u64 {
    dispatch(buf, mix_seed(seed), long_micro)
}

/// Hash some buffer with the nano variant.
pub fn hash_nano(buf: &[u8]) -> u64 {
    dispatch(buf, SEED0_MIXED, long_nano)
}

/// Hash some buffer with the nano variant according to a chosen seed.
pub fn hash_nano_with_seed(buf: &[u8], seed: u64) -> u64 {
    dispatch(buf, mix_seed(seed), long_nano)
}
