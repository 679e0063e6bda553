//! FMA-style digital force sensor
//!
//! The sensor answers a plain 2-byte I2C read with a big-endian 14-bit
//! count; the top two bits of the first byte carry status and are masked
//! off. Its supply is switched from a GPIO so a wedged sensor can be
//! power-cycled.

use clampforce_core::config::SensorConfig;
use clampforce_core::traits::{BusError, ForceBus};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// Factory default 7-bit address
pub const DEFAULT_ADDRESS: u8 = 0x28;

/// Status bits in the first byte of a reading
const STATUS_MASK: u8 = 0xC0;

/// Combine the two reply bytes into a 14-bit count
pub fn raw_from_bytes(bytes: [u8; 2]) -> u16 {
    (((bytes[0] & !STATUS_MASK) as u16) << 8) | bytes[1] as u16
}

/// Power-cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FmaTimings {
    pub power_off_ms: u32,
    pub power_on_settle_ms: u32,
    pub conversion_settle_ms: u32,
}

impl From<&SensorConfig> for FmaTimings {
    fn from(config: &SensorConfig) -> Self {
        Self {
            power_off_ms: config.power_off_ms,
            power_on_settle_ms: config.power_on_settle_ms,
            conversion_settle_ms: config.conversion_settle_ms,
        }
    }
}

fn map_i2c_error(kind: ErrorKind) -> BusError {
    match kind {
        ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge,
        _ => BusError::Bus,
    }
}

/// FMA force sensor on a blocking I2C bus
pub struct FmaForceSensor<I2C, PWR, D> {
    i2c: I2C,
    power: PWR,
    delay: D,
    address: u8,
    timings: FmaTimings,
}

impl<I2C, PWR, D> FmaForceSensor<I2C, PWR, D>
where
    I2C: I2c,
    PWR: OutputPin,
    D: DelayNs,
{
    /// Create a driver; the supply is left as the caller configured it
    pub fn new(i2c: I2C, power: PWR, delay: D, address: u8, timings: FmaTimings) -> Self {
        Self {
            i2c,
            power,
            delay,
            address,
            timings,
        }
    }

    /// Create a driver from the machine configuration
    pub fn from_config(i2c: I2C, power: PWR, delay: D, config: &SensorConfig) -> Self {
        Self::new(i2c, power, delay, config.address, FmaTimings::from(config))
    }

    /// Configured 7-bit address
    pub fn address(&self) -> u8 {
        self.address
    }

    fn read_bytes(&mut self) -> Result<[u8; 2], BusError> {
        let mut bytes = [0u8; 2];
        self.i2c
            .read(self.address, &mut bytes)
            .map_err(|e| map_i2c_error(e.kind()))?;
        Ok(bytes)
    }

    /// Release the bus, power pin and delay
    pub fn release(self) -> (I2C, PWR, D) {
        (self.i2c, self.power, self.delay)
    }
}

impl<I2C, PWR, D> ForceBus for FmaForceSensor<I2C, PWR, D>
where
    I2C: I2c,
    PWR: OutputPin,
    D: DelayNs,
{
    fn read_raw(&mut self) -> Result<u16, BusError> {
        self.read_bytes().map(raw_from_bytes)
    }

    fn power_cycle(&mut self) -> Result<(), BusError> {
        self.power.set_low().map_err(|_| BusError::Power)?;
        self.delay.delay_ms(self.timings.power_off_ms);
        self.power.set_high().map_err(|_| BusError::Power)?;
        self.delay.delay_ms(self.timings.power_on_settle_ms);

        // A read doubles as the presence check; the sensor has no registers
        self.read_bytes()?;

        self.delay.delay_ms(self.timings.conversion_settle_ms);
        Ok(())
    }
}
