//! Floating-point coefficients for the polynomial compensation.
//!
//! The integer datasheet algorithm can be rewritten as a handful of
//! polynomials whose coefficients only depend on the calibration block. They
//! are computed once, right after the block is loaded.

use crate::calibration::CalibrationBlock;

/// `2^exp` as `f64`, exact for the exponents used here.
const fn pow2(exp: i32) -> f64 {
    if exp >= 0 {
        (1u64 << exp) as f64
    } else {
        1.0 / (1u64 << -exp) as f64
    }
}

/// Sixteen coefficients derived from a [`CalibrationBlock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedCoefficients {
    pub c3: f64,
    pub c4: f64,
    pub b1: f64,
    pub c5: f64,
    pub c6: f64,
    pub mc: f64,
    pub md: f64,
    pub x0: f64,
    pub x1: f64,
    pub x2: f64,
    pub y0: f64,
    pub y1: f64,
    pub y2: f64,
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
}

impl DerivedCoefficients {
    pub fn from_block(cal: &CalibrationBlock) -> Self {
        let c3 = 160.0 * pow2(-15) * cal.ac3 as f64;
        let c4 = 1e-3 * pow2(-15) * cal.ac4 as f64;
        let b1 = 160.0 * 160.0 * pow2(-30) * cal.b1 as f64;

        Self {
            c3,
            c4,
            b1,
            c5: (pow2(-15) / 160.0) * cal.ac5 as f64,
            c6: cal.ac6 as f64,
            mc: (pow2(11) / (160.0 * 160.0)) * cal.mc as f64,
            md: cal.md as f64 / 160.0,
            x0: cal.ac1 as f64,
            x1: 160.0 * pow2(-13) * cal.ac2 as f64,
            x2: 160.0 * 160.0 * pow2(-25) * cal.b2 as f64,
            y0: c4 * pow2(15),
            y1: c4 * c3,
            y2: c4 * b1,
            p0: (3791.0 - 8.0) / 1600.0,
            p1: 1.0 - 7357.0 * pow2(-20),
            p2: 3038.0 * 100.0 * pow2(-36),
        }
    }

    /// All sixteen values in declaration order.
    pub fn to_array(&self) -> [f64; 16] {
        [
            self.c3, self.c4, self.b1, self.c5, self.c6, self.mc, self.md, self.x0, self.x1,
            self.x2, self.y0, self.y1, self.y2, self.p0, self.p1, self.p2,
        ]
    }
}

impl From<&CalibrationBlock> for DerivedCoefficients {
    fn from(cal: &CalibrationBlock) -> Self {
        Self::from_block(cal)
    }
}
