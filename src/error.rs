//! Error definitions for VEML6075 driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed.
    I2c(I2cError),
    /// Identity register answered, but not with the VEML6075 device id (carries the low byte read).
    DeviceIdMismatch(u8),
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::DeviceIdMismatch(id) => write!(f, "unexpected device id 0x{:02x}", id),
        }
    }
}
