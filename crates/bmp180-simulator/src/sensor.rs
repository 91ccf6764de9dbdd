//! Register-level model of a BMP180 behind an async I2C bus.
//!
//! Answers calibration, chip-id and conversion reads the way the real part
//! does, using the calibration values and raw codes from the datasheet worked
//! example. Raw codes drift slowly so consecutive readings differ, and every
//! `fault_every`-th transfer fails so the error path can be watched.

use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use embedded_hal_async::i2c::I2c;
use log::trace;

use bmp180_core::CalibrationBlock;
use bmp180_core::registers::{
    CALIBRATION, CALIBRATION_LEN, CHIP_ID, CONTROL, EXPECTED_CHIP_ID, READ_PRESSURE_CMD,
    READ_TEMPERATURE_CMD, SOFT_RESET, SOFT_RESET_CMD, TEMPERATURE_DATA,
};

/// Calibration block from the datasheet worked example.
pub const DATASHEET_CALIBRATION: CalibrationBlock = CalibrationBlock {
    ac1: 408,
    ac2: -72,
    ac3: -14383,
    ac4: 32741,
    ac5: 32757,
    ac6: 23153,
    b1: 6190,
    b2: 4,
    mb: -32768,
    mc: -8711,
    md: 2868,
};

const BASE_RAW_TEMPERATURE: f64 = 27898.0;
const BASE_RAW_PRESSURE: f64 = 23843.0;

pub struct SimulatedBmp180 {
    address: u8,
    eeprom: [u8; CALIBRATION_LEN],
    pointer: u8,
    /// Result registers 0xF6..=0xF8.
    adc: [u8; 3],
    conversions: u32,
    transfers: u32,
    fault_every: Option<u32>,
}

impl SimulatedBmp180 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            eeprom: DATASHEET_CALIBRATION.to_bytes(),
            pointer: 0,
            adc: [0; 3],
            conversions: 0,
            transfers: 0,
            fault_every: None,
        }
    }

    /// Fail every `n`-th transfer with a bus error.
    pub fn with_fault_every(mut self, n: u32) -> Self {
        self.fault_every = (n > 0).then_some(n);
        self
    }

    fn drift(&self, period: f64, amplitude: f64) -> f64 {
        amplitude * (f64::from(self.conversions) / period).sin()
    }

    fn convert(&mut self, command: u8) {
        self.conversions = self.conversions.wrapping_add(1);

        if command == READ_TEMPERATURE_CMD {
            let ut = (BASE_RAW_TEMPERATURE + self.drift(7.0, 120.0)) as u16;
            let [msb, lsb] = ut.to_be_bytes();
            self.adc = [msb, lsb, 0];
            trace!("sim: UT={}", ut);
        } else if command & 0x3F == READ_PRESSURE_CMD {
            let oss = command >> 6;
            let up = (BASE_RAW_PRESSURE + self.drift(11.0, 40.0)) * f64::from(1u32 << oss);
            let word = (up as u32) << (8 - oss);
            let [_, msb, lsb, xlsb] = word.to_be_bytes();
            self.adc = [msb, lsb, xlsb];
            trace!("sim: UP={} (oss {})", up as u32, oss);
        }
    }

    fn write_registers(&mut self, bytes: &[u8]) {
        match bytes {
            [register] => self.pointer = *register,
            [CONTROL, command] => self.convert(*command),
            [SOFT_RESET, SOFT_RESET_CMD] => {
                self.adc = [0; 3];
                self.pointer = 0;
            }
            _ => trace!("sim: ignored write {:02x?}", bytes),
        }
    }

    fn register(&self, register: u8) -> u8 {
        let eeprom_end = CALIBRATION + CALIBRATION_LEN as u8;
        match register {
            r if (CALIBRATION..eeprom_end).contains(&r) => self.eeprom[usize::from(r - CALIBRATION)],
            CHIP_ID => EXPECTED_CHIP_ID,
            r if (TEMPERATURE_DATA..TEMPERATURE_DATA + 3).contains(&r) => {
                self.adc[usize::from(r - TEMPERATURE_DATA)]
            }
            _ => 0,
        }
    }

    fn read_registers(&mut self, buf: &mut [u8]) {
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.register(self.pointer.wrapping_add(offset as u8));
        }
    }
}

impl ErrorType for SimulatedBmp180 {
    type Error = ErrorKind;
}

impl I2c for SimulatedBmp180 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        self.transfers = self.transfers.wrapping_add(1);
        if let Some(n) = self.fault_every
            && self.transfers % n == 0
        {
            return Err(ErrorKind::Bus);
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write_registers(bytes),
                Operation::Read(buf) => self.read_registers(buf),
            }
        }
        Ok(())
    }
}
