//! I2C bus abstractions
//!
//! Provides the blocking master trait consumed by device drivers and the
//! clock configuration used to program the peripheral.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Smallest CPU-to-bus clock ratio the bit-rate generator can produce
const MIN_CLOCK_RATIO: u32 = 16;

/// Clock configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus frequency is above what the CPU clock can generate
    BusFrequencyTooHigh,
    /// Bus frequency is zero or needs a divisor wider than 8 bits
    BusFrequencyTooLow,
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cConfig {
    /// SCL frequency in Hz
    pub frequency: u32,
    /// Peripheral (CPU) clock in Hz
    pub cpu_frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// CPU clock assumed by the presets
    pub const DEFAULT_CPU_FREQUENCY: u32 = 16_000_000;

    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self::new(100_000);

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self::new(400_000);

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self::new(1_000_000);

    /// Bus frequency with the default CPU clock
    pub const fn new(frequency: u32) -> Self {
        Self {
            frequency,
            cpu_frequency: Self::DEFAULT_CPU_FREQUENCY,
        }
    }

    /// Override the CPU clock
    pub const fn with_cpu_frequency(mut self, cpu_frequency: u32) -> Self {
        self.cpu_frequency = cpu_frequency;
        self
    }

    /// Bit-rate register value for this configuration
    ///
    /// SCL = CPU / (16 + 2 * divisor), with the prescaler cleared.
    pub const fn bit_rate_divisor(&self) -> Result<u8, ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::BusFrequencyTooLow);
        }
        let ratio = self.cpu_frequency / self.frequency;
        if ratio < MIN_CLOCK_RATIO {
            return Err(ConfigError::BusFrequencyTooHigh);
        }
        let divisor = (ratio - MIN_CLOCK_RATIO) / 2;
        if divisor > u8::MAX as u32 {
            return Err(ConfigError::BusFrequencyTooLow);
        }
        Ok(divisor as u8)
    }
}
