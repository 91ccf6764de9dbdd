//! Factory calibration block
//!
//! Every BMP180 is individually calibrated at the factory. The eleven
//! coefficients live in EEPROM at `0xAA..=0xBF` as big-endian 16-bit words and
//! are needed by both compensation algorithms.

use log::{debug, info};

use crate::registers::{CALIBRATION, CALIBRATION_LEN};
use crate::transport::BusTransport;

/// The eleven factory calibration coefficients.
///
/// Field names and signedness follow the datasheet: `ac4`, `ac5` and `ac6`
/// are unsigned, everything else is two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationBlock {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

impl CalibrationBlock {
    /// Parse the raw 22-byte EEPROM dump.
    pub fn from_bytes(bytes: &[u8; CALIBRATION_LEN]) -> Self {
        let word = |i: usize| [bytes[2 * i], bytes[2 * i + 1]];

        Self {
            ac1: i16::from_be_bytes(word(0)),
            ac2: i16::from_be_bytes(word(1)),
            ac3: i16::from_be_bytes(word(2)),
            ac4: u16::from_be_bytes(word(3)),
            ac5: u16::from_be_bytes(word(4)),
            ac6: u16::from_be_bytes(word(5)),
            b1: i16::from_be_bytes(word(6)),
            b2: i16::from_be_bytes(word(7)),
            mb: i16::from_be_bytes(word(8)),
            mc: i16::from_be_bytes(word(9)),
            md: i16::from_be_bytes(word(10)),
        }
    }

    /// Serialize back into the EEPROM layout.
    pub fn to_bytes(&self) -> [u8; CALIBRATION_LEN] {
        let words = [
            self.ac1.to_be_bytes(),
            self.ac2.to_be_bytes(),
            self.ac3.to_be_bytes(),
            self.ac4.to_be_bytes(),
            self.ac5.to_be_bytes(),
            self.ac6.to_be_bytes(),
            self.b1.to_be_bytes(),
            self.b2.to_be_bytes(),
            self.mb.to_be_bytes(),
            self.mc.to_be_bytes(),
            self.md.to_be_bytes(),
        ];

        let mut bytes = [0u8; CALIBRATION_LEN];
        for (chunk, word) in bytes.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word);
        }
        bytes
    }

    /// Read and parse the calibration block from the device at `address`.
    ///
    /// Nothing is kept if any of the three transfers fails.
    pub async fn load<T: BusTransport>(transport: &mut T, address: u8) -> Result<Self, T::Error> {
        let mut raw = [0u8; CALIBRATION_LEN];

        transport.start(address).await?;
        transport.write(&[CALIBRATION]).await?;
        transport.read(&mut raw).await?;

        let block = Self::from_bytes(&raw);
        info!("BMP180: calibration block loaded from 0x{:02X}", address);
        debug!("BMP180: {:?}", block);

        Ok(block)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use super::*;
    use crate::registers::DEFAULT_ADDRESS;
    use crate::transport::I2cTransport;
    use embassy_futures::block_on;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    /// Incrementing test pattern used throughout the crate's tests.
    pub(crate) const PATTERN: [u8; CALIBRATION_LEN] = [
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x20, 0x21, 0x22, 0x23, 0x24,
        0x25, 0x26, 0x27, 0x28, 0x29, 0x30, 0x31,
    ];

    /// Worked example from the BMP180 datasheet, section 3.5.
    pub(crate) const DATASHEET: CalibrationBlock = CalibrationBlock {
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

    #[test]
    fn test_parse_pattern() {
        let block = CalibrationBlock::from_bytes(&PATTERN);

        assert_eq!(block.ac1, 4113);
        assert_eq!(block.ac2, 4627);
        assert_eq!(block.ac4, 0x1617);
        assert_eq!(block.ac6, 0x2021);
        assert_eq!(block.md, 0x3031);
    }

    #[test]
    fn test_parse_signedness() {
        let bytes = DATASHEET.to_bytes();
        assert_eq!(&bytes[2..4], &[0xFF, 0xB8], "ac2 = -72");
        assert_eq!(&bytes[16..18], &[0x80, 0x00], "mb = -32768");

        let block = CalibrationBlock::from_bytes(&bytes);
        assert_eq!(block, DATASHEET);
    }

    #[test]
    fn test_load_reads_block() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(DEFAULT_ADDRESS, vec![CALIBRATION]),
            I2cTransaction::read(DEFAULT_ADDRESS, PATTERN.to_vec()),
        ]);
        let mut transport = I2cTransport::new(i2c.clone());

        let block = block_on(CalibrationBlock::load(&mut transport, DEFAULT_ADDRESS)).unwrap();
        assert_eq!(block, CalibrationBlock::from_bytes(&PATTERN));
        i2c.done();
    }

    #[test]
    fn test_load_fails_on_read_error() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(DEFAULT_ADDRESS, vec![CALIBRATION]),
            I2cTransaction::read(DEFAULT_ADDRESS, PATTERN.to_vec())
                .with_error(ErrorKind::NoAcknowledge(
                    embedded_hal::i2c::NoAcknowledgeSource::Data,
                )),
        ]);
        let mut transport = I2cTransport::new(i2c.clone());

        let result = block_on(CalibrationBlock::load(&mut transport, DEFAULT_ADDRESS));
        assert!(matches!(result, Err(ErrorKind::NoAcknowledge(_))));
        i2c.done();
    }

    #[test]
    fn test_load_fails_on_register_select() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(DEFAULT_ADDRESS, vec![CALIBRATION])
            .with_error(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ))]);
        let mut transport = I2cTransport::new(i2c.clone());

        let result = block_on(CalibrationBlock::load(&mut transport, DEFAULT_ADDRESS));
        assert!(matches!(result, Err(ErrorKind::NoAcknowledge(_))));
        i2c.done();
    }
}
