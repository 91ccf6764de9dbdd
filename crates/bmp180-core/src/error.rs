//! Driver error type

use thiserror_no_std::Error;

/// Error returned by every fallible BMP180 operation.
///
/// `E` is the error type of the underlying [`BusTransport`](crate::BusTransport).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bmp180Error<E> {
    /// A bus transaction failed; carries the transport error.
    #[error("Bus transfer failed: {0:?}")]
    Bus(E),

    /// Acquisition was attempted before the calibration block was loaded.
    #[error("Sensor not calibrated; call start() first")]
    NotCalibrated,

    /// Acquisition was attempted on a halted driver.
    #[error("Driver halted")]
    Halted,

    /// Oversampling value outside `0..=3`.
    #[error("Invalid oversampling mode: {0}")]
    InvalidMode(u8),
}

/// Result type for BMP180 operations
pub type Bmp180Result<T, E> = Result<T, Bmp180Error<E>>;
