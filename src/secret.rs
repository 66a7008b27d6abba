//! The secret table.
//!
//! These are the multiplicative and XOR salts shared by every variant. They must never change: the
//! digests are only reproducible against the reference implementation with exactly these values.

/// The eight secrets.
pub const SECRET: [u64; 8] = [
    0x2d358dccaa6c78a5,
    0x8bb84b93962eacc9,
    0x4b33a62ed433d4a3,
    0x4d5a2da51de1aa47,
    0xa0761d6478bd642f,
    0xe7037ed1a0b428db,
    0x90ed1765281c388c,
    0xaaaaaaaaaaaaaaaa,
];

/// The mixed form of seed 0, i.e. `mix_seed(0)`.
///
/// The unseeded entry points start from this and skip the seed fold entirely.
pub const SEED0_MIXED: u64 = 0x422765567d8fbfd6;
