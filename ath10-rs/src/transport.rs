use core::fmt::Debug;

use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Bus operations the ATH10 driver needs.
///
/// Every [`I2c`] implementation is a `Transport`. Implement this trait
/// directly for buses that can report short reads.
pub trait Transport {
    /// Error reported by the bus.
    type Error: Debug;

    /// Bring up the bus. Buses configured at construction need not override this.
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Write `bytes` to the device at `address`.
    fn write(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read up to `buf.len()` bytes from the device at `address`.
    ///
    /// Returns the number of bytes received, which may be less than requested.
    fn read(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: I2c<SevenBitAddress>> Transport for T {
    type Error = T::Error;

    fn write(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        I2c::write(self, address, bytes)
    }

    fn read(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<usize, Self::Error> {
        I2c::read(self, address, buf)?;
        Ok(buf.len())
    }
}
