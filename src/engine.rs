//! Block engines.
//!
//! A block engine runs the bulk loop of the default variant: it folds 112-byte blocks through the
//! seven lanes. The portable scalar engine is the implementation of record. Other engines are
//! allowed to exist only if their output is bit-identical to it for every input, which makes the
//! choice of engine invisible to callers.
//!
//! The engine is selected once per process, on first use (or explicitly through `init`), and
//! never changes afterwards.

use slog::Logger;

use config::{Config, EnginePreference};
use helper::{mix, read_u64};
use secret::SECRET;
use Error;

/// The number of bytes consumed per block by the default variant.
pub const BLOCK: usize = 112;

/// The lane state of the default variant.
///
/// The first lane is the running seed, the other six are the independent stripes.
pub type Lanes = [u64; 7];

/// A bulk-processing loop for the default variant.
pub trait BlockEngine: Sync {
    /// A short, stable name identifying the engine.
    fn name(&self) -> &'static str;

    /// Fold blocks from the front of `buf` into `lanes`.
    ///
    /// Blocks are consumed while strictly more than `BLOCK` bytes remain unconsumed. The number of
    /// consumed bytes (a multiple of `BLOCK`) is returned.
    fn accumulate(&self, buf: &[u8], lanes: &mut Lanes) -> usize;
}

/// The portable scalar loop.
///
/// This is inlined into every engine, so that they differ only in the instructions the compiler is
/// allowed to emit for it.
#[inline(always)]
pub fn accumulate_blocks(buf: &[u8], lanes: &mut Lanes) -> usize {
    let [mut seed, mut see1, mut see2, mut see3, mut see4, mut see5, mut see6] = *lanes;
    let mut read = 0;

    while buf.len() - read > BLOCK {
        // Slice the block once, so the reads below need no further bounds checks.
        let block = &buf[read..read + BLOCK];

        seed = mix(read_u64(block, 0) ^ SECRET[0], read_u64(block, 8) ^ seed);
        see1 = mix(read_u64(block, 16) ^ SECRET[1], read_u64(block, 24) ^ see1);
        see2 = mix(read_u64(block, 32) ^ SECRET[2], read_u64(block, 40) ^ see2);
        see3 = mix(read_u64(block, 48) ^ SECRET[3], read_u64(block, 56) ^ see3);
        see4 = mix(read_u64(block, 64) ^ SECRET[4], read_u64(block, 72) ^ see4);
        see5 = mix(read_u64(block, 80) ^ SECRET[5], read_u64(block, 88) ^ see5);
        see6 = mix(read_u64(block, 96) ^ SECRET[6], read_u64(block, 104) ^ see6);

        read += BLOCK;
    }

    *lanes = [seed, see1, see2, see3, see4, see5, see6];

    read
}

/// The portable scalar engine.
struct Scalar;

impl BlockEngine for Scalar {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn accumulate(&self, buf: &[u8], lanes: &mut Lanes) -> usize {
        accumulate_blocks(buf, lanes)
    }
}

/// The BMI2 engine.
///
/// This compiles the scalar loop with BMI2 enabled, letting the 128-bit multiplies lower to
/// `mulx`, which frees the flags register and eases register pressure across the seven lanes.
#[cfg(target_arch = "x86_64")]
struct Bmi2;

#[cfg(target_arch = "x86_64")]
impl BlockEngine for Bmi2 {
    fn name(&self) -> &'static str {
        "bmi2"
    }

    fn accumulate(&self, buf: &[u8], lanes: &mut Lanes) -> usize {
        // `Bmi2` is only handed out by `accelerated()`, after the feature was detected.
        unsafe { accumulate_bmi2(buf, lanes) }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn accumulate_bmi2(buf: &[u8], lanes: &mut Lanes) -> usize {
    accumulate_blocks(buf, lanes)
}

static SCALAR: Scalar = Scalar;
#[cfg(target_arch = "x86_64")]
static BMI2: Bmi2 = Bmi2;

/// Get the portable scalar engine.
pub fn scalar() -> &'static dyn BlockEngine {
    &SCALAR
}

/// Get the accelerated engine, if the running CPU supports one.
pub fn accelerated() -> Option<&'static dyn BlockEngine> {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("bmi2") {
            return Some(&BMI2);
        }
    }

    None
}

/// Pick an engine according to a configuration.
pub fn select(config: &Config) -> &'static dyn BlockEngine {
    match config.block_engine {
        EnginePreference::Scalar => scalar(),
        EnginePreference::Auto | EnginePreference::Accelerated => accelerated().unwrap_or_else(scalar),
    }
}

/// The outcome of the process-wide engine selection.
struct Selection {
    /// The chosen engine.
    engine: &'static dyn BlockEngine,
    /// The preference the engine was chosen by.
    preference: EnginePreference,
    /// The configuration error, if the environment held an invalid preference.
    error: Option<Error>,
}

impl Selection {
    /// Select the engine from a configuration, falling back to `auto` on invalid input.
    fn new(config: Result<Config, Error>) -> Selection {
        let (config, error) = match config {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        };

        Selection {
            engine: select(&config),
            preference: config.block_engine,
            error: error,
        }
    }

    /// Log the outcome of the selection.
    fn report(&self, log: &Logger) {
        if let Some(ref err) = self.error {
            warn!(log, "ignoring invalid block engine preference"; "error" => %err);
        }
        info!(log, "selected block engine";
              "engine" => self.engine.name(),
              "preference" => self.preference.as_str());
    }
}

lazy_static! {
    static ref ACTIVE: Selection = Selection::new(Config::from_env());
}

/// Get the process-wide engine.
#[inline]
pub fn active() -> &'static dyn BlockEngine {
    ACTIVE.engine
}

/// Force the process-wide engine selection and log its outcome.
///
/// Calling this is optional; the selection otherwise happens silently on first use. The name of
/// the selected engine is returned.
pub fn init(log: &Logger) -> &'static str {
    ACTIVE.report(log);

    ACTIVE.engine.name()
}
