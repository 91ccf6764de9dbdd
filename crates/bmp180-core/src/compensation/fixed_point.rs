//! Datasheet integer compensation.
//!
//! All intermediate products use explicit wrapping arithmetic so that results
//! match the 32-bit two's-complement reference implementation bit for bit.

use super::{CalibratedReading, Compensator};
use crate::acquisition::RawSample;
use crate::calibration::CalibrationBlock;

/// Signed division truncating toward zero; 0 when the divisor is 0.
fn div_or_zero(lhs: i32, rhs: i32) -> i32 {
    if rhs == 0 { 0 } else { lhs.wrapping_div(rhs) }
}

fn udiv_or_zero(lhs: u32, rhs: u32) -> u32 {
    lhs.checked_div(rhs).unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    calibration: CalibrationBlock,
}

impl FixedPoint {
    pub fn new(calibration: CalibrationBlock) -> Self {
        Self { calibration }
    }

    /// Intermediate `B5`, shared by the temperature and pressure formulas.
    pub fn b5(&self, raw_temperature: u16) -> i32 {
        let c = &self.calibration;

        let x1 = (i32::from(raw_temperature) - i32::from(c.ac6)).wrapping_mul(i32::from(c.ac5)) >> 15;
        let x2 = div_or_zero(i32::from(c.mc) << 11, x1.wrapping_add(i32::from(c.md)));
        x1.wrapping_add(x2)
    }

    /// Temperature in 0.1 °C.
    pub fn temperature_tenths(&self, raw_temperature: u16) -> i32 {
        self.b5(raw_temperature).wrapping_add(8) >> 4
    }

    /// Pressure in Pa.
    pub fn pressure_pa(&self, sample: &RawSample) -> i32 {
        let c = &self.calibration;
        let oss = u32::from(sample.mode.oss());

        let b6 = self.b5(sample.raw_temperature).wrapping_sub(4000);
        let b6_sq = b6.wrapping_mul(b6) >> 12;

        let x1 = i32::from(c.b2).wrapping_mul(b6_sq) >> 11;
        let x2 = i32::from(c.ac2).wrapping_mul(b6) >> 11;
        let x3 = x1.wrapping_add(x2);
        let b3 = div_or_zero(
            i32::from(c.ac1)
                .wrapping_mul(4)
                .wrapping_add(x3)
                .wrapping_shl(oss)
                .wrapping_add(2),
            4,
        );

        let x1 = i32::from(c.ac3).wrapping_mul(b6) >> 13;
        let x2 = i32::from(c.b1).wrapping_mul(b6_sq) >> 16;
        let x3 = x1.wrapping_add(x2).wrapping_add(2) >> 2;
        let b4 = u32::from(c.ac4).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
        let b7 = sample
            .raw_pressure
            .wrapping_sub(b3 as u32)
            .wrapping_mul(50000 >> oss);

        let p = if b7 < 0x8000_0000 {
            udiv_or_zero(b7.wrapping_mul(2), b4)
        } else {
            udiv_or_zero(b7, b4).wrapping_mul(2)
        } as i32;

        let x1 = (p >> 8).wrapping_mul(p >> 8);
        let x1 = x1.wrapping_mul(3038) >> 16;
        let x2 = (-7357i32).wrapping_mul(p) >> 16;
        p.wrapping_add(x1.wrapping_add(x2).wrapping_add(3791) >> 4)
    }
}

impl Compensator for FixedPoint {
    fn temperature(&self, raw_temperature: u16) -> f64 {
        f64::from(self.temperature_tenths(raw_temperature)) / 10.0
    }

    fn compensate(&self, sample: &RawSample) -> CalibratedReading {
        let temperature_celsius = self.temperature(sample.raw_temperature);
        let pressure_hpa = f64::from(self.pressure_pa(sample)) / 100.0;

        CalibratedReading {
            temperature_celsius,
            pressure_hpa,
        }
    }
}
