//! Addressed bus transport
//!
//! The driver talks to the sensor through [`BusTransport`]: select a device
//! with `start`, then issue `write`/`read` transfers against it. Two
//! implementations are provided on top of `embedded-hal-async`:
//!
//! - [`I2cTransport`] owns an I2C peripheral (or any other `I2c` impl).
//! - [`SharedI2cTransport`] borrows a bus that lives behind an embassy async
//!   mutex, so several device drivers can share one peripheral.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::I2c;

use crate::registers::DEFAULT_ADDRESS;

/// Exclusive, addressed two-wire bus.
///
/// `start` selects the target device for all following transfers. On I2C the
/// start condition and address byte are emitted per transfer, so `start` only
/// latches the address.
pub trait BusTransport {
    /// Transport failure. Must map onto an I2C error kind so it can be reported.
    type Error: embedded_hal::i2c::Error;

    /// Select the 7-bit device address for the following transfers.
    fn start(&mut self, address: u8) -> impl Future<Output = Result<(), Self::Error>>;

    /// Write `bytes` to the selected device.
    fn write(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), Self::Error>>;

    /// Fill `buf` with bytes read from the selected device.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<(), Self::Error>>;
}

/// [`BusTransport`] over an owned `embedded-hal-async` I2C bus.
pub struct I2cTransport<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cTransport<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
        }
    }

    /// Currently selected device address.
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I: I2c> BusTransport for I2cTransport<I> {
    type Error = I::Error;

    async fn start(&mut self, address: u8) -> Result<(), Self::Error> {
        self.address = address;
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, bytes).await
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, buf).await
    }
}

/// [`BusTransport`] over a bus shared through Embassy's async [`Mutex`].
///
/// Each transfer takes the lock for its own duration only. While the driver
/// waits for a conversion to settle the bus is free for other devices.
///
/// ```rust,ignore
/// static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, Async>>> = StaticCell::new();
///
/// let i2c_bus = I2C_BUS.init(Mutex::new(i2c));
/// let bmp = Bmp180::new(SharedI2cTransport::new(i2c_bus), Delay, LogReporter, config);
/// ```
pub struct SharedI2cTransport<'a, T> {
    bus: &'a Mutex<CriticalSectionRawMutex, T>,
    address: u8,
}

impl<'a, T> SharedI2cTransport<'a, T> {
    #[inline]
    pub const fn new(bus: &'a Mutex<CriticalSectionRawMutex, T>) -> Self {
        Self {
            bus,
            address: DEFAULT_ADDRESS,
        }
    }

    /// Currently selected device address.
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<T: I2c> BusTransport for SharedI2cTransport<'_, T> {
    type Error = T::Error;

    #[inline]
    async fn start(&mut self, address: u8) -> Result<(), Self::Error> {
        self.address = address;
        Ok(())
    }

    #[inline]
    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.write(self.address, bytes).await
    }

    #[inline]
    async fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.read(self.address, buf).await
    }
}
