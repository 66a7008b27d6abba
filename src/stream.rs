//! The streaming version of the algorithm.

use std::{hash, io};

use byteorder::{BigEndian, ByteOrder};
use slog::Logger;

use comparable::{self, Comparable};
use engine::BLOCK;
use {hash_with_seed, Error};

/// The initial capacity of the buffer of a fresh hasher.
const INITIAL_CAPACITY: usize = 64;

/// A streaming hasher.
///
/// Every written byte is buffered, and the digest is computed on demand by hashing the whole
/// buffer with `hash_with_seed`. Consequently, any sequence of writes gives the same digest as one
/// write of their concatenation.
///
/// The hasher is not internally synchronized. Sharing one between threads is up to the caller.
#[derive(Clone)]
pub struct Hasher {
    /// The raw seed.
    seed: u64,
    /// The bytes written so far.
    buf: Vec<u8>,
    /// The logger, if any.
    log: Option<Logger>,
}

impl Default for Hasher {
    fn default() -> Hasher {
        Hasher::with_seed(0)
    }
}

impl Hasher {
    /// Create a new `Hasher` with the default seed.
    pub fn new() -> Hasher {
        Hasher::default()
    }

    /// Create a new `Hasher` with some seed.
    pub fn with_seed(seed: u64) -> Hasher {
        Hasher {
            seed: seed,
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            log: None,
        }
    }

    /// Attach a logger to the hasher.
    pub fn with_logger(mut self, log: Logger) -> Hasher {
        self.log = Some(log);
        self
    }

    /// The raw seed the hasher was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The number of bytes written since creation or the last reset.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Has nothing been written since creation or the last reset?
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write some bytes into the hasher.
    pub fn write(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write the bytes of some string into the hasher.
    pub fn write_string(&mut self, s: &str) {
        self.write(s.as_bytes());
    }

    /// Write the canonical encoding of some value into the hasher.
    ///
    /// This is equivalent to `write`ing the bytes of `comparable::encode(v)`, so it can be freely
    /// interleaved with the other writes. If the value cannot be encoded, nothing is written.
    pub fn write_comparable<T: Comparable + ?Sized>(&mut self, v: &T) -> Result<(), Error> {
        match comparable::encode(v) {
            Ok(bytes) => {
                self.write(&bytes);
                Ok(())
            },
            Err(err) => {
                if let Some(ref log) = self.log {
                    debug!(log, "rejected comparable value"; "error" => %err);
                }

                Err(err)
            },
        }
    }

    /// Reset the hasher, discarding every written byte.
    ///
    /// The buffer keeps its capacity.
    pub fn reset(&mut self) {
        if let Some(ref log) = self.log {
            trace!(log, "resetting hasher"; "discarded" => self.buf.len());
        }

        self.buf.clear();
    }

    /// Get the 64-bit digest of the bytes written so far.
    pub fn sum64(&self) -> u64 {
        if let Some(ref log) = self.log {
            trace!(log, "computing digest"; "len" => self.buf.len(), "seed" => self.seed);
        }

        hash_with_seed(&self.buf, self.seed)
    }

    /// Get the 32-bit digest, the XOR of the high and low halves of `sum64`.
    pub fn sum32(&self) -> u32 {
        let x = self.sum64();

        (x ^ (x >> 32)) as u32
    }

    /// Append the digest in big-endian to `prefix`.
    pub fn sum(&self, mut prefix: Vec<u8>) -> Vec<u8> {
        let mut digest = [0; 8];
        BigEndian::write_u64(&mut digest, self.sum64());
        prefix.extend_from_slice(&digest);

        prefix
    }

    /// The number of bytes `sum` appends.
    pub fn size(&self) -> usize {
        8
    }

    /// The block size of the default variant.
    ///
    /// This is informational; the hasher buffers everything regardless.
    pub fn block_size(&self) -> usize {
        BLOCK
    }
}

impl hash::Hasher for Hasher {
    fn finish(&self) -> u64 {
        self.sum64()
    }

    fn write(&mut self, bytes: &[u8]) {
        Hasher::write(self, bytes);
    }
}

impl io::Write for Hasher {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        Hasher::write(self, bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A `BuildHasher` creating seeded `Hasher`s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeededState {
    /// The raw seed.
    seed: u64,
}

impl SeededState {
    /// Create a new state building hashers with some seed.
    pub fn new(seed: u64) -> SeededState {
        SeededState {
            seed: seed,
        }
    }
}

impl hash::BuildHasher for SeededState {
    type Hasher = Hasher;

    fn build_hasher(&self) -> Hasher {
        Hasher::with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::hash::{BuildHasher, Hash};
    use std::io::Write;

    use slog::Discard;
    use {hash, hash_with_seed};

    const FOX: &'static [u8] = b"The quick brown fox jumps over the lazy dog";

    fn cycling(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn one_write() {
        let mut h = Hasher::new();
        h.write(b"Hello, World!");

        assert_eq!(h.sum64(), hash(b"Hello, World!"));
        assert_eq!(h.sum64(), 0x75bff66af6ba4d5b);
    }

    #[test]
    fn empty() {
        assert_eq!(Hasher::new().sum64(), hash(b""));
        assert_eq!(Hasher::with_seed(77).sum64(), hash_with_seed(b"", 77));
    }

    #[test]
    fn chunked() {
        for buf in &[FOX.to_vec(), cycling(1000), cycling(113), cycling(449)] {
            for &chunk in &[1, 2, 3, 5, 7, 11, 13, 17, buf.len()] {
                let mut h = Hasher::new();
                for part in buf.chunks(chunk) {
                    h.write(part);
                }

                assert_eq!(h.sum64(), hash(buf), "chunk = {}, len = {}", chunk, buf.len());
            }
        }
    }

    #[test]
    fn every_split() {
        let buf = cycling(300);
        for split in 0..buf.len() + 1 {
            let mut h = Hasher::with_seed(9);
            h.write(&buf[..split]);
            h.write(&buf[split..]);

            assert_eq!(h.sum64(), hash_with_seed(&buf, 9));
        }
    }

    #[test]
    fn write_string() {
        let mut a = Hasher::new();
        a.write_string("hello ");
        a.write_string("world");
        let mut b = Hasher::new();
        b.write(b"hello world");

        assert_eq!(a.sum64(), b.sum64());
    }

    #[test]
    fn reset() {
        let mut h = Hasher::with_seed(3);
        h.write(b"test data");
        let first = h.sum64();

        h.reset();
        assert!(h.is_empty());
        assert_eq!(h.sum64(), hash_with_seed(b"", 3));

        h.write(b"test data");
        assert_eq!(h.sum64(), first);
    }

    #[test]
    fn seeded() {
        let mut h0 = Hasher::new();
        h0.write(b"hello world");
        let mut h1 = Hasher::with_seed(12345);
        h1.write(b"hello world");

        assert_ne!(h0.sum64(), h1.sum64());
        assert_eq!(h0.sum64(), hash(b"hello world"));
        assert_eq!(h1.sum64(), hash_with_seed(b"hello world", 12345));
        assert_eq!(h1.seed(), 12345);
    }

    #[test]
    fn sum_is_big_endian() {
        let mut h = Hasher::new();
        h.write(b"test");
        let x = h.sum64();

        let sum = h.sum(Vec::new());
        assert_eq!(sum.len(), h.size());
        assert_eq!(sum, [(x >> 56) as u8, (x >> 48) as u8, (x >> 40) as u8, (x >> 32) as u8,
                         (x >> 24) as u8, (x >> 16) as u8, (x >> 8) as u8, x as u8]);

        let sum = h.sum(b"prefix".to_vec());
        assert_eq!(&sum[..6], b"prefix");
        assert_eq!(BigEndian::read_u64(&sum[6..]), x);
    }

    #[test]
    fn sum_is_repeatable() {
        let mut h = Hasher::new();
        h.write(FOX);

        assert_eq!(h.sum64(), h.sum64());
        assert_eq!(h.sum(Vec::new()), h.sum(Vec::new()));
        assert_eq!(h.len(), FOX.len());
    }

    #[test]
    fn sum32() {
        let mut h = Hasher::new();
        h.write(FOX);
        let x = h.sum64();

        assert_eq!(h.sum32(), (x as u32) ^ ((x >> 32) as u32));
    }

    #[test]
    fn sizes() {
        let h = Hasher::new();

        assert_eq!(h.size(), 8);
        assert_eq!(h.block_size(), 112);
    }

    #[test]
    fn std_hasher() {
        let mut h = Hasher::new();
        hash::Hasher::write(&mut h, b"abc");

        assert_eq!(hash::Hasher::finish(&h), hash(b"abc"));
    }

    #[test]
    fn io_write() {
        let mut h = Hasher::new();
        assert_eq!(Write::write(&mut h, b"abc").unwrap(), 3);
        write!(h, "def{}", 1).unwrap();
        h.flush().unwrap();

        assert_eq!(h.sum64(), hash(b"abcdef1"));
    }

    #[test]
    fn build_hasher() {
        let state = SeededState::new(42);
        let mut a = state.build_hasher();
        let mut b = state.build_hasher();
        "key".hash(&mut a);
        "key".hash(&mut b);

        assert_eq!(hash::Hasher::finish(&a), hash::Hasher::finish(&b));

        let mut map = HashMap::with_hasher(SeededState::new(7));
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn comparable_interleaves() {
        let mut h = Hasher::with_seed(0x1122334455667788);
        h.write(b"prefix-");
        h.write_comparable(&0x0102030405060708u64).unwrap();
        h.write_string("-suffix");

        let mut expected = b"prefix-".to_vec();
        expected.extend(comparable::encode(&0x0102030405060708u64).unwrap());
        expected.extend_from_slice(b"-suffix");

        assert_eq!(h.sum64(), hash_with_seed(&expected, 0x1122334455667788));
    }

    #[test]
    fn rejected_comparable_writes_nothing() {
        let log = Logger::root(Discard, o!());
        let mut h = Hasher::new().with_logger(log);
        h.write(b"abc");

        let mut map = HashMap::new();
        map.insert(1u8, 2u8);
        assert!(h.write_comparable(&map).is_err());
        assert_eq!(h.sum64(), hash(b"abc"));

        h.reset();
        assert!(h.is_empty());
    }
}
