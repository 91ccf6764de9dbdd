//! BMP180 device driver
//!
//! [`Bmp180`] ties the pipeline together: it loads the calibration block once
//! in [`Bmp180::start`], runs the timed acquisitions, feeds the raw codes to
//! the selected compensation engine and keeps the latest reading.
//!
//! # Lifecycle
//!
//! ```text
//! new ──start()──▶ calibrated ──sample()──▶ reading updated
//!                      ▲    │
//!               start()│    │halt()
//!                      │    ▼
//!                     halted
//! ```
//!
//! All bus operations take `&mut self`, so a driver can never have two
//! transactions in flight. State is only written after the last `.await` of
//! an acquisition: dropping a pending `sample()` future (for example through
//! [`Bmp180::sample_or_halt`]) leaves the previous reading untouched.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::i2c::Error as _;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::acquisition::{Phase, RawSample, Sequencer};
use crate::calibration::CalibrationBlock;
use crate::coefficients::DerivedCoefficients;
use crate::compensation::{CalibratedReading, Compensator, Engine};
use crate::config::Bmp180Config;
use crate::error::{Bmp180Error, Bmp180Result};
use crate::oversampling::OversamplingMode;
use crate::registers::{CHIP_ID, SOFT_RESET, SOFT_RESET_CMD};
use crate::reporter::{ErrorEvent, ErrorReporter, EventKind, Stage};
use crate::transport::BusTransport;

/// Signal used to halt a driver from another task.
pub type HaltSignal = Signal<CriticalSectionRawMutex, ()>;

pub struct Bmp180<T, D, R> {
    transport: T,
    delay: D,
    reporter: R,
    config: Bmp180Config,
    calibration: Option<CalibrationBlock>,
    engine: Option<Engine>,
    raw: Option<RawSample>,
    reading: Option<CalibratedReading>,
    phase: Phase,
    halted: bool,
}

impl<T, D, R> Bmp180<T, D, R>
where
    T: BusTransport,
    D: DelayNs,
    R: ErrorReporter,
{
    /// Create an uncalibrated driver. No bus traffic happens until [`Self::start`].
    pub fn new(transport: T, delay: D, reporter: R, config: Bmp180Config) -> Self {
        Self {
            transport,
            delay,
            reporter,
            config,
            calibration: None,
            engine: None,
            raw: None,
            reading: None,
            phase: Phase::Idle,
            halted: false,
        }
    }

    pub fn config(&self) -> &Bmp180Config {
        &self.config
    }

    pub fn mode(&self) -> OversamplingMode {
        self.config.mode
    }

    /// Change the oversampling mode used by the next pressure acquisition.
    pub fn set_mode(&mut self, mode: OversamplingMode) {
        self.config.mode = mode;
    }

    /// [`Self::set_mode`] from a raw `oss` value.
    pub fn set_mode_raw(&mut self, oss: u8) -> Bmp180Result<(), T::Error> {
        let mode = OversamplingMode::try_from(oss).map_err(|_| Bmp180Error::InvalidMode(oss))?;
        self.set_mode(mode);
        Ok(())
    }

    pub fn calibration(&self) -> Option<&CalibrationBlock> {
        self.calibration.as_ref()
    }

    /// Derived coefficients; only present with the polynomial algorithm.
    pub fn derived_coefficients(&self) -> Option<&DerivedCoefficients> {
        self.engine.as_ref().and_then(Engine::derived)
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Raw codes behind the latest reading.
    pub fn raw_sample(&self) -> Option<RawSample> {
        self.raw
    }

    /// Latest calibrated reading, `None` until the first successful sample.
    pub fn reading(&self) -> Option<CalibratedReading> {
        self.reading
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Destroy the driver and hand back its resources.
    pub fn release(self) -> (T, D, R) {
        (self.transport, self.delay, self.reporter)
    }

    fn report(&mut self, stage: Stage, error: T::Error) -> Bmp180Error<T::Error> {
        self.reporter.publish(ErrorEvent {
            stage,
            kind: EventKind::Bus(error.kind()),
        });
        Bmp180Error::Bus(error)
    }

    /// Engine for an acquisition at `stage`. A halted or uncalibrated driver
    /// publishes the refusal and touches nothing.
    fn ready_engine(&mut self, stage: Stage) -> Bmp180Result<Engine, T::Error> {
        let (kind, error) = match (self.halted, self.engine) {
            (false, Some(engine)) => return Ok(engine),
            (true, _) => (EventKind::Halted, Bmp180Error::Halted),
            (false, None) => (EventKind::NotCalibrated, Bmp180Error::NotCalibrated),
        };

        self.reporter.publish(ErrorEvent { stage, kind });
        Err(error)
    }

    /// Load the calibration block and make the driver ready for acquisition.
    ///
    /// The block is read only once per driver. Calling `start` on a halted,
    /// already calibrated driver just resumes it.
    pub async fn start(&mut self) -> Bmp180Result<(), T::Error> {
        if self.calibration.is_some() {
            self.halted = false;
            info!("BMP180: resumed");
            return Ok(());
        }

        let block = CalibrationBlock::load(&mut self.transport, self.config.address)
            .await
            .map_err(|e| self.report(Stage::CalibrationLoad, e))?;

        self.engine = Some(Engine::new(self.config.algorithm, &block));
        self.calibration = Some(block);
        self.halted = false;
        info!("BMP180: started with {:?} compensation", self.config.algorithm);

        Ok(())
    }

    /// Stop the driver. Further acquisitions fail with [`Bmp180Error::Halted`]
    /// until [`Self::start`] is called again.
    pub fn halt(&mut self) -> Bmp180Result<(), T::Error> {
        if self.phase != Phase::Idle {
            warn!("BMP180: acquisition cancelled while {:?}", self.phase);
            self.phase = Phase::Idle;
        }
        self.halted = true;
        info!("BMP180: halted");
        Ok(())
    }

    /// Run one temperature conversion and return `UT`.
    pub async fn read_raw_temperature(&mut self) -> Bmp180Result<u16, T::Error> {
        self.ready_engine(Stage::TemperatureAcquisition)?;
        self.acquire_temperature().await
    }

    /// Run one pressure conversion in the configured mode and return `UP`.
    pub async fn read_raw_pressure(&mut self) -> Bmp180Result<u32, T::Error> {
        self.ready_engine(Stage::PressureAcquisition)?;
        self.acquire_pressure().await
    }

    async fn acquire_temperature(&mut self) -> Bmp180Result<u16, T::Error> {
        let result = Sequencer::new(
            &mut self.transport,
            &mut self.delay,
            &mut self.phase,
            self.config.address,
        )
        .raw_temperature()
        .await;

        result.map_err(|e| self.report(Stage::TemperatureAcquisition, e))
    }

    async fn acquire_pressure(&mut self) -> Bmp180Result<u32, T::Error> {
        let mode = self.config.mode;
        let result = Sequencer::new(
            &mut self.transport,
            &mut self.delay,
            &mut self.phase,
            self.config.address,
        )
        .raw_pressure(mode)
        .await;

        result.map_err(|e| self.report(Stage::PressureAcquisition, e))
    }

    /// One full cycle: raw temperature, raw pressure, compensation.
    ///
    /// On failure the previous raw sample and reading are kept.
    pub async fn sample(&mut self) -> Bmp180Result<CalibratedReading, T::Error> {
        let engine = self.ready_engine(Stage::TemperatureAcquisition)?;

        let raw_temperature = self.acquire_temperature().await?;
        let raw_pressure = self.acquire_pressure().await?;
        let raw = RawSample {
            raw_temperature,
            raw_pressure,
            mode: self.config.mode,
        };

        let reading = engine.compensate(&raw);
        self.raw = Some(raw);
        self.reading = Some(reading);
        debug!(
            "BMP180: UT={} UP={} -> {:.2} °C, {:.2} hPa",
            raw.raw_temperature, raw.raw_pressure, reading.temperature_celsius, reading.pressure_hpa
        );

        Ok(reading)
    }

    /// [`Self::sample`], abandoned as soon as `halt` is signalled.
    ///
    /// Returns `Ok(None)` when the halt won; the driver is then halted and its
    /// previous reading is unchanged.
    pub async fn sample_or_halt(
        &mut self,
        halt: &HaltSignal,
    ) -> Bmp180Result<Option<CalibratedReading>, T::Error> {
        let outcome = select(self.sample(), halt.wait()).await;

        match outcome {
            Either::First(result) => result.map(Some),
            Either::Second(()) => {
                self.halt()?;
                Ok(None)
            }
        }
    }

    /// Read the chip identification register (`0x55` on a genuine part).
    pub async fn chip_id(&mut self) -> Bmp180Result<u8, T::Error> {
        let mut id = [0u8; 1];
        let address = self.config.address;

        let result = async {
            self.transport.start(address).await?;
            self.transport.write(&[CHIP_ID]).await?;
            self.transport.read(&mut id).await
        }
        .await;

        result.map_err(|e| self.report(Stage::ChipId, e))?;
        Ok(id[0])
    }

    /// Trigger the power-on-reset sequence. Calibration EEPROM is unaffected.
    pub async fn soft_reset(&mut self) -> Bmp180Result<(), T::Error> {
        let address = self.config.address;

        let result = async {
            self.transport.start(address).await?;
            self.transport.write(&[SOFT_RESET, SOFT_RESET_CMD]).await
        }
        .await;

        result.map_err(|e| self.report(Stage::SoftReset, e))
    }
}
