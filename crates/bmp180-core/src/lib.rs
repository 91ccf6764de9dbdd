//! Hardware-independent core library for the BMP180 barometric sensor
//!
//! This crate contains the whole transaction-and-calibration pipeline for the
//! Bosch BMP180/BMP085 family: bus transport abstraction, calibration block
//! loading, timed raw acquisition, the two datasheet compensation algorithms
//! and the error reporting glue.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).
//!
//! # Example
//!
//! ```rust,ignore
//! use bmp180_core::{Bmp180, Bmp180Config, I2cTransport, LogReporter, OversamplingMode};
//!
//! let config = Bmp180Config::default().with_mode(OversamplingMode::High);
//! let mut bmp = Bmp180::new(I2cTransport::new(i2c), embassy_time::Delay, LogReporter, config);
//!
//! bmp.start().await?;
//! let reading = bmp.sample().await?;
//! log::info!("{} °C, {} hPa", reading.temperature_celsius, reading.pressure_hpa);
//! ```

#![no_std]

extern crate alloc;

pub mod acquisition;
pub mod calibration;
pub mod coefficients;
pub mod compensation;
pub mod config;
pub mod driver;
pub mod error;
pub mod oversampling;
pub mod registers;
pub mod reporter;
pub mod transport;

pub use acquisition::{Phase, RawSample};
pub use calibration::CalibrationBlock;
pub use coefficients::DerivedCoefficients;
pub use compensation::{Algorithm, CalibratedReading, Compensator, Engine};
pub use config::Bmp180Config;
pub use driver::{Bmp180, HaltSignal};
pub use error::{Bmp180Error, Bmp180Result};
pub use oversampling::{OversamplingMode, wait_time};
pub use reporter::{ErrorChannel, ErrorEvent, ErrorReporter, EventKind, LogReporter, Stage};
pub use transport::{BusTransport, I2cTransport, SharedI2cTransport};
