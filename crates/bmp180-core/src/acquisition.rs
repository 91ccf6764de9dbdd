//! Timed raw acquisition
//!
//! Each conversion runs through the same four phases:
//!
//! ```text
//! Idle -> CommandSent -> Settling -> ReadBack -> Idle
//! ```
//!
//! The settle wait is an `.await` on the injected delay provider, so other
//! tasks keep running while the sensor converts.

use embedded_hal_async::delay::DelayNs;
use log::trace;

use crate::oversampling::OversamplingMode;
use crate::registers::{
    CONTROL, PRESSURE_DATA, READ_TEMPERATURE_CMD, TEMPERATURE_DATA, TEMPERATURE_SETTLE_MS,
};
use crate::transport::BusTransport;

/// Position of the driver inside a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Conversion command written to the control register.
    CommandSent,
    /// Waiting for the conversion to finish.
    Settling,
    /// Reading the result registers.
    ReadBack,
}

/// Uncalibrated ADC codes from one acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// `UT` in the datasheet.
    pub raw_temperature: u16,
    /// `UP` in the datasheet, already shifted by `8 - oss`.
    pub raw_pressure: u32,
    /// Mode the pressure conversion ran in.
    pub mode: OversamplingMode,
}

/// Assemble the 24-bit pressure word and drop the unused low bits.
pub fn assemble_pressure(bytes: [u8; 3], mode: OversamplingMode) -> u32 {
    let [msb, lsb, xlsb] = bytes;
    let word = (u32::from(msb) << 16) | (u32::from(lsb) << 8) | u32::from(xlsb);
    word >> mode.pressure_shift()
}

/// Drives conversions for a single device.
///
/// Borrows the driver's transport, delay and phase for the duration of one
/// acquisition.
pub struct Sequencer<'a, T, D> {
    transport: &'a mut T,
    delay: &'a mut D,
    phase: &'a mut Phase,
    address: u8,
}

impl<'a, T, D> Sequencer<'a, T, D>
where
    T: BusTransport,
    D: DelayNs,
{
    pub fn new(transport: &'a mut T, delay: &'a mut D, phase: &'a mut Phase, address: u8) -> Self {
        Self {
            transport,
            delay,
            phase,
            address,
        }
    }

    fn enter(&mut self, phase: Phase) {
        trace!("BMP180: {:?} -> {:?}", self.phase, phase);
        *self.phase = phase;
    }

    /// Read `UT`.
    pub async fn raw_temperature(&mut self) -> Result<u16, T::Error> {
        let mut buf = [0u8; 2];
        self.convert(
            READ_TEMPERATURE_CMD,
            TEMPERATURE_SETTLE_MS,
            TEMPERATURE_DATA,
            &mut buf,
        )
        .await?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read `UP` in the given oversampling mode.
    pub async fn raw_pressure(&mut self, mode: OversamplingMode) -> Result<u32, T::Error> {
        let mut buf = [0u8; 3];
        self.convert(
            mode.pressure_command(),
            mode.settle_ms(),
            PRESSURE_DATA,
            &mut buf,
        )
        .await?;
        Ok(assemble_pressure(buf, mode))
    }

    async fn convert(
        &mut self,
        command: u8,
        settle_ms: u32,
        data_register: u8,
        buf: &mut [u8],
    ) -> Result<(), T::Error> {
        let result = self.convert_steps(command, settle_ms, data_register, buf).await;
        self.enter(Phase::Idle);
        result
    }

    async fn convert_steps(
        &mut self,
        command: u8,
        settle_ms: u32,
        data_register: u8,
        buf: &mut [u8],
    ) -> Result<(), T::Error> {
        self.transport.start(self.address).await?;
        self.transport.write(&[CONTROL, command]).await?;
        self.enter(Phase::CommandSent);

        self.enter(Phase::Settling);
        self.delay.delay_ms(settle_ms).await;

        self.enter(Phase::ReadBack);
        self.transport.write(&[data_register]).await?;
        self.transport.read(buf).await
    }
}
