//! Compensation of raw ADC codes into physical units
//!
//! Two datasheet-equivalent algorithms are available:
//!
//! - [`FixedPoint`]: the integer reference algorithm from the datasheet.
//! - [`Polynomial`]: the same model rewritten as floating-point polynomials
//!   over [`DerivedCoefficients`]. This is the default.
//!
//! The driver selects one at construction through [`Algorithm`] and only ever
//! talks to it through the [`Compensator`] trait, so the acquisition code does
//! not change with the algorithm.

mod fixed_point;
mod polynomial;

pub use fixed_point::FixedPoint;
pub use polynomial::Polynomial;

use serde::{Deserialize, Serialize};

use crate::acquisition::RawSample;
use crate::calibration::CalibrationBlock;
use crate::coefficients::DerivedCoefficients;

/// Exponent of the international barometric formula.
const BAROMETRIC_EXPONENT: f64 = 5.255;

/// Which compensation algorithm a driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Datasheet integer algorithm with two's-complement wraparound.
    FixedPoint,
    /// Floating-point polynomial evaluation.
    #[default]
    Polynomial,
}

/// A calibrated measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibratedReading {
    pub temperature_celsius: f64,
    pub pressure_hpa: f64,
}

impl CalibratedReading {
    /// Altitude in metres above the level where pressure is `sea_level_hpa`.
    pub fn altitude_m(&self, sea_level_hpa: f64) -> f64 {
        44330.0 * (1.0 - libm::pow(self.pressure_hpa / sea_level_hpa, 1.0 / BAROMETRIC_EXPONENT))
    }

    /// Pressure reduced to sea level, given the altitude of the sensor in metres.
    pub fn sea_level_hpa(&self, altitude_m: f64) -> f64 {
        self.pressure_hpa / libm::pow(1.0 - altitude_m / 44330.0, BAROMETRIC_EXPONENT)
    }
}

/// Maps raw samples to calibrated readings.
pub trait Compensator {
    /// Temperature in degrees Celsius for a raw temperature code.
    fn temperature(&self, raw_temperature: u16) -> f64;

    /// Full reading. Temperature is computed first since pressure depends on it.
    fn compensate(&self, sample: &RawSample) -> CalibratedReading;
}

/// The compensation algorithm selected for a driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Engine {
    FixedPoint(FixedPoint),
    Polynomial(Polynomial),
}

impl Engine {
    /// Build the engine for `algorithm`, deriving coefficients if it needs them.
    pub fn new(algorithm: Algorithm, calibration: &CalibrationBlock) -> Self {
        match algorithm {
            Algorithm::FixedPoint => Self::FixedPoint(FixedPoint::new(*calibration)),
            Algorithm::Polynomial => Self::Polynomial(Polynomial::new(calibration)),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::FixedPoint(_) => Algorithm::FixedPoint,
            Self::Polynomial(_) => Algorithm::Polynomial,
        }
    }

    /// Derived coefficients, present only for the polynomial engine.
    pub fn derived(&self) -> Option<&DerivedCoefficients> {
        match self {
            Self::FixedPoint(_) => None,
            Self::Polynomial(p) => Some(p.coefficients()),
        }
    }
}

impl Compensator for Engine {
    fn temperature(&self, raw_temperature: u16) -> f64 {
        match self {
            Self::FixedPoint(f) => f.temperature(raw_temperature),
            Self::Polynomial(p) => p.temperature(raw_temperature),
        }
    }

    fn compensate(&self, sample: &RawSample) -> CalibratedReading {
        match self {
            Self::FixedPoint(f) => f.compensate(sample),
            Self::Polynomial(p) => p.compensate(sample),
        }
    }
}
