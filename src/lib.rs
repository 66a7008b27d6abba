//! rapidhash: A very fast, portable, non-cryptographic 64-bit hash function.
//!
//! rapidhash is a descendant of wyhash. Every step is built from the same primitive: multiply two
//! 64-bit words into a 128-bit product and fold the halves together with XOR. It comes in three
//! variants, which share the short-input paths and differ only in how many independent lanes the
//! bulk loop over long inputs runs:
//!
//! - `hash`: seven lanes over 112-byte blocks, fastest for large inputs.
//! - `hash_micro`: five lanes over 80-byte blocks, tuned for inputs up to around 512 bytes.
//! - `hash_nano`: three lanes over 48-byte blocks, tuned for inputs up to 48 bytes.
//!
//! All digests are defined on the little-endian reading of the input, so they are the same on
//! every platform. This stable layout allows them to be stored and compared across machines. They
//! are NOT suitable for anything adversarial: rapidhash is not a cryptographic hash function.
//!
//! # Seeds
//!
//! Every function has a `_with_seed` form. The seed is folded through a multiply-mix before use,
//! and the seedless forms are exactly the seeded forms with seed 0.
//!
//! # Streaming
//!
//! `Hasher` accepts the input in pieces, and gives the same digest as hashing the concatenation in
//! one go. It implements both `std::hash::Hasher` and `std::io::Write`.
//!
//! # Structured values
//!
//! `hash_comparable` hashes a value by its structure instead of its bytes. See the `Comparable`
//! trait.
//!
//! # Block engines
//!
//! The bulk loop of the default variant runs on a block engine picked once per process: an engine
//! compiled for BMI2 when the CPU supports it, and a portable one otherwise. Both give identical
//! digests. The choice can be pinned with the `RAPIDHASH_BLOCK_ENGINE` environment variable
//! (`auto`, `scalar` or `accelerated`), and reported to a logger with `init`.

#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate quick_error;
extern crate rand;
#[macro_use]
extern crate slog;

#[macro_use]
mod comparable;
mod error;
mod helper;
mod secret;
mod stream;
mod variant;

pub mod config;
pub mod engine;
pub mod reference;

pub use comparable::{encode, hash_comparable, hash_comparable_with_seed, Comparable, Node, Value};
pub use config::{Config, EnginePreference, BLOCK_ENGINE_VAR};
pub use engine::{accelerated, active, init, scalar, BlockEngine, Lanes, BLOCK};
pub use error::Error;
pub use stream::{Hasher, SeededState};
pub use variant::{hash, hash_micro, hash_micro_with_seed, hash_nano, hash_nano_with_seed, hash_with_seed,
                  Variant};

/// Hash some string with the default variant.
///
/// This is the same as hashing the UTF-8 bytes of the string.
pub fn hash_string(s: &str) -> u64 {
    hash(s.as_bytes())
}

/// Hash some string with the default variant according to a chosen seed.
pub fn hash_string_with_seed(s: &str, seed: u64) -> u64 {
    hash_with_seed(s.as_bytes(), seed)
}

/// Hash some string with the micro variant.
pub fn hash_string_micro(s: &str) -> u64 {
    hash_micro(s.as_bytes())
}

/// Hash some string with the micro variant according to a chosen seed.
pub fn hash_string_micro_with_seed(s: &str, seed: u64) -> u64 {
    hash_micro_with_seed(s.as_bytes(), seed)
}

/// Hash some string with the nano variant.
pub fn hash_string_nano(s: &str) -> u64 {
    hash_nano(s.as_bytes())
}

/// Hash some string with the nano variant according to a chosen seed.
pub fn hash_string_nano_with_seed(s: &str, seed: u64) -> u64 {
    hash_nano_with_seed(s.as_bytes(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIANTS: [Variant; 3] = [Variant::Default, Variant::Micro, Variant::Nano];

    fn cycling(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn strings() {
        assert_eq!(hash_string(""), 0x338dc4be2cecdae);
        assert_eq!(hash_string("a"), 0x599f47df33a2e1eb);
        assert_eq!(hash_string("abc"), 0xcb475beafa9c0da2);
        assert_eq!(hash_string("hello"), 0x2e2d7651b45f7946);
        assert_eq!(hash_string("abcdefghijklmnopq"), 0xc427c11a4463b8);
        assert_eq!(hash_string("The quick brown fox jumps over the lazy dog"), 0x91722dc8d52a3f7b);
    }

    #[test]
    fn strings_are_bytes() {
        for s in &["", "x", "Hello, World!", "The quick brown fox jumps over the lazy dog"] {
            assert_eq!(hash_string(s), hash(s.as_bytes()));
            assert_eq!(hash_string_micro(s), hash_micro(s.as_bytes()));
            assert_eq!(hash_string_nano(s), hash_nano(s.as_bytes()));
            assert_eq!(hash_string_with_seed(s, 5), hash_with_seed(s.as_bytes(), 5));
            assert_eq!(hash_string_micro_with_seed(s, 5), hash_micro_with_seed(s.as_bytes(), 5));
            assert_eq!(hash_string_nano_with_seed(s, 5), hash_nano_with_seed(s.as_bytes(), 5));
        }
    }

    #[test]
    fn default_seed() {
        for &len in &[0, 1, 3, 4, 8, 16, 17, 48, 49, 80, 81, 112, 113, 448, 449, 1000] {
            let buf = cycling(len);

            assert_eq!(hash(&buf), hash_with_seed(&buf, 0));
            assert_eq!(hash_micro(&buf), hash_micro_with_seed(&buf, 0));
            assert_eq!(hash_nano(&buf), hash_nano_with_seed(&buf, 0));
        }
    }

    #[test]
    fn seed_changes_digest() {
        for &len in &[0, 2, 5, 12, 33, 200] {
            let buf = cycling(len);
            for &variant in &VARIANTS {
                assert_ne!(variant.hash_with_seed(&buf, 1), variant.hash_with_seed(&buf, 2));
            }
        }
    }

    #[test]
    fn variants_agree_on_short_inputs() {
        let buf = cycling(120);

        for n in 0..49 {
            assert_eq!(hash(&buf[..n]), hash_micro(&buf[..n]));
            assert_eq!(hash(&buf[..n]), hash_nano(&buf[..n]));
            assert_eq!(hash_with_seed(&buf[..n], 99), hash_nano_with_seed(&buf[..n], 99));
        }
        for n in 49..81 {
            assert_eq!(hash(&buf[..n]), hash_micro(&buf[..n]));
            assert_eq!(hash_with_seed(&buf[..n], 99), hash_micro_with_seed(&buf[..n], 99));
        }

        assert_ne!(hash(&buf[..49]), hash_nano(&buf[..49]));
        assert_ne!(hash(&buf[..81]), hash_micro(&buf[..81]));
    }

    #[test]
    fn avalanche() {
        let buf = cycling(32);
        let base = hash(&buf);

        for bit in 0..256 {
            let mut flipped = buf.clone();
            flipped[bit / 8] ^= 1 << (bit % 8);

            let diff = (hash(&flipped) ^ base).count_ones();
            assert!(diff >= 10 && diff <= 54, "bit = {}, diff = {}", bit, diff);
        }
    }

    #[test]
    fn not_linear() {
        assert_ne!(hash(b"a") ^ hash(b"b"), hash(b"ab"));

        let a = hash(b"hello");
        let b = hash(b"world");
        let c = hash(b"helloworld");

        assert_ne!(a ^ b, c);
        assert_ne!(a.wrapping_add(b), c);
    }

    #[test]
    fn comparable_reexports() {
        assert_eq!(hash_comparable(&1u8), hash_comparable_with_seed(&1u8, 0));
        assert_eq!(hash_comparable(&1u8).map_err(|_| ()), Ok(hash(&encode(&1u8).unwrap())));
    }
}
