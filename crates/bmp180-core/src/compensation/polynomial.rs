//! Floating-point polynomial compensation.

use super::{CalibratedReading, Compensator};
use crate::acquisition::RawSample;
use crate::calibration::CalibrationBlock;
use crate::coefficients::DerivedCoefficients;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polynomial {
    coefficients: DerivedCoefficients,
}

impl Polynomial {
    pub fn new(calibration: &CalibrationBlock) -> Self {
        Self::from_coefficients(DerivedCoefficients::from_block(calibration))
    }

    pub fn from_coefficients(coefficients: DerivedCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &DerivedCoefficients {
        &self.coefficients
    }

    /// Pressure in hPa for a raw code already scaled to 16 bits, at `temperature_celsius`.
    pub fn pressure(&self, scaled_pressure: f64, temperature_celsius: f64) -> f64 {
        let k = &self.coefficients;
        let s = temperature_celsius - 25.0;

        let x = (k.x2 * s * s) + (k.x1 * s) + k.x0;
        let y = (k.y2 * s * s) + (k.y1 * s) + k.y0;
        let z = (scaled_pressure - x) / y;

        (k.p2 * z * z) + (k.p1 * z) + k.p0
    }
}

/// `UP` rescaled to the 16-bit range the polynomials are fitted for.
fn scaled_pressure(sample: &RawSample) -> f64 {
    f64::from(sample.raw_pressure) / f64::from(1u32 << sample.mode.oss())
}

impl Compensator for Polynomial {
    fn temperature(&self, raw_temperature: u16) -> f64 {
        let k = &self.coefficients;
        let a = k.c5 * (f64::from(raw_temperature) - k.c6);
        a + (k.mc / (a + k.md))
    }

    fn compensate(&self, sample: &RawSample) -> CalibratedReading {
        let temperature_celsius = self.temperature(sample.raw_temperature);
        let pressure_hpa = self.pressure(scaled_pressure(sample), temperature_celsius);

        CalibratedReading {
            temperature_celsius,
            pressure_hpa,
        }
    }
}
