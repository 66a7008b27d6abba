//! Runtime configuration.

use std::env::{self, VarError};
use std::str::FromStr;

use Error;

/// The environment variable holding the block engine preference.
pub const BLOCK_ENGINE_VAR: &'static str = "RAPIDHASH_BLOCK_ENGINE";

/// Which block engine to run the bulk loop with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePreference {
    /// Use the accelerated engine when the CPU supports it.
    Auto,
    /// Always use the portable scalar engine.
    Scalar,
    /// Ask for the accelerated engine.
    ///
    /// This falls back to the scalar engine when the CPU lacks support, so it behaves like `Auto`;
    /// it exists so that the intent is visible in logs.
    Accelerated,
}

impl EnginePreference {
    /// The name of the preference, as accepted by `from_str`.
    pub fn as_str(self) -> &'static str {
        match self {
            EnginePreference::Auto => "auto",
            EnginePreference::Scalar => "scalar",
            EnginePreference::Accelerated => "accelerated",
        }
    }
}

impl Default for EnginePreference {
    fn default() -> EnginePreference {
        EnginePreference::Auto
    }
}

impl FromStr for EnginePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<EnginePreference, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(EnginePreference::Auto),
            "scalar" | "portable" => Ok(EnginePreference::Scalar),
            "accelerated" => Ok(EnginePreference::Accelerated),
            _ => Err(Error::InvalidConfig {
                key: BLOCK_ENGINE_VAR,
                value: s.to_owned(),
            }),
        }
    }
}

/// The configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The block engine preference.
    pub block_engine: EnginePreference,
}

impl Config {
    /// Read the configuration from the environment.
    ///
    /// Unset variables take their default values. Set variables must be valid UTF-8.
    pub fn from_env() -> Result<Config, Error> {
        let block_engine = match env::var(BLOCK_ENGINE_VAR) {
            Ok(value) => value.parse()?,
            Err(VarError::NotPresent) => EnginePreference::default(),
            Err(VarError::NotUnicode(value)) => return Err(Error::InvalidConfig {
                key: BLOCK_ENGINE_VAR,
                value: value.to_string_lossy().into_owned(),
            }),
        };

        Ok(Config {
            block_engine: block_engine,
        })
    }
}
