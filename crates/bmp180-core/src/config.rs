//! Driver configuration
//!
//! [`Bmp180Config`] is plain serde data so it can be kept in flash as a
//! postcard blob and restored on boot.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::compensation::Algorithm;
use crate::oversampling::OversamplingMode;
use crate::registers::DEFAULT_ADDRESS;

/// Default polling interval for callers that sample periodically.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config decode failed: {0:?}")]
    Decode(postcard::Error),
    #[error("Config encode failed: {0:?}")]
    Encode(postcard::Error),
}

/// Per-driver settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bmp180Config {
    /// 7-bit bus address.
    pub address: u8,
    /// Pressure oversampling mode.
    pub mode: OversamplingMode,
    /// Compensation algorithm, fixed for the lifetime of the driver.
    pub algorithm: Algorithm,
    /// How often the owner of the driver should call `sample`.
    pub sample_interval_ms: u32,
}

impl Default for Bmp180Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            mode: OversamplingMode::Low,
            algorithm: Algorithm::Polynomial,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
        }
    }
}

impl Bmp180Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_mode(mut self, mode: OversamplingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_sample_interval_ms(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Decode a config stored with [`Self::to_vec`] (e.g. in flash).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }

    /// Encode this config with postcard.
    pub fn to_vec(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(ConfigError::Encode)
    }
}
