//! Oversampling modes and their conversion timing.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::Bmp180Error;
use crate::registers::READ_PRESSURE_CMD;

/// Settle time used for any oversampling value the sensor does not define.
pub const DEFAULT_WAIT_MS: u32 = 8;

/// Pressure oversampling setting (`oss` in the datasheet).
///
/// Higher modes average more internal samples: better resolution, longer
/// conversion time and more significant bits in the pressure result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum OversamplingMode {
    /// One internal sample, 4.5 ms conversion.
    #[default]
    Low = 0,
    /// Two internal samples, 7.5 ms conversion.
    Medium = 1,
    /// Four internal samples, 13.5 ms conversion.
    High = 2,
    /// Eight internal samples, 25.5 ms conversion.
    UltraHigh = 3,
}

impl OversamplingMode {
    pub const ALL: [OversamplingMode; 4] = [Self::Low, Self::Medium, Self::High, Self::UltraHigh];

    /// Raw `oss` value, `0..=3`.
    pub const fn oss(self) -> u8 {
        self as u8
    }

    /// Time to wait after starting a pressure conversion, in milliseconds.
    pub const fn settle_ms(self) -> u32 {
        match self {
            Self::Low => 5,
            Self::Medium => 8,
            Self::High => 14,
            Self::UltraHigh => 26,
        }
    }

    /// [`Self::settle_ms`] as an embassy [`Duration`].
    pub const fn settle_time(self) -> Duration {
        Duration::from_millis(self.settle_ms() as u64)
    }

    /// Control register value that starts a pressure conversion in this mode.
    pub const fn pressure_command(self) -> u8 {
        READ_PRESSURE_CMD | (self.oss() << 6)
    }

    /// Right shift applied to the 24-bit pressure word, always in `5..=8`.
    pub const fn pressure_shift(self) -> u32 {
        8 - self.oss() as u32
    }
}

impl TryFrom<u8> for OversamplingMode {
    type Error = Bmp180Error<core::convert::Infallible>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            3 => Ok(Self::UltraHigh),
            other => Err(Bmp180Error::InvalidMode(other)),
        }
    }
}

/// Settle time in milliseconds for a raw `oss` value.
///
/// Unknown values fall back to [`DEFAULT_WAIT_MS`].
pub fn wait_time(mode: u8) -> u32 {
    OversamplingMode::try_from(mode)
        .map(OversamplingMode::settle_ms)
        .unwrap_or(DEFAULT_WAIT_MS)
}
