//! BMP180 register map.

/// Fixed 7-bit bus address of the BMP180.
pub const DEFAULT_ADDRESS: u8 = 0x77;

/// First register of the 22-byte calibration EEPROM block.
pub const CALIBRATION: u8 = 0xAA;
/// Length of the calibration block in bytes.
pub const CALIBRATION_LEN: usize = 22;

/// Measurement control register.
pub const CONTROL: u8 = 0xF4;
/// Temperature result register (MSB, LSB).
pub const TEMPERATURE_DATA: u8 = 0xF6;
/// Pressure result register (MSB, LSB, XLSB).
pub const PRESSURE_DATA: u8 = 0xF6;

/// Control value that starts a temperature conversion.
pub const READ_TEMPERATURE_CMD: u8 = 0x2E;
/// Control value that starts a pressure conversion, oversampling bits cleared.
pub const READ_PRESSURE_CMD: u8 = 0x34;

/// Chip identification register.
pub const CHIP_ID: u8 = 0xD0;
/// Value the chip identification register reads back on a BMP180/BMP085.
pub const EXPECTED_CHIP_ID: u8 = 0x55;

/// Soft reset register.
pub const SOFT_RESET: u8 = 0xE0;
/// Value that triggers a power-on-reset sequence when written to [`SOFT_RESET`].
pub const SOFT_RESET_CMD: u8 = 0xB6;

/// Fixed conversion time for a temperature measurement, in milliseconds.
pub const TEMPERATURE_SETTLE_MS: u32 = 5;
