//! Driver errors

use twimaster_hal::ConfigError;

use crate::state::Status;

/// Errors reported by the TWI master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// Request does not fit the static buffer
    Overflow,
    /// Read of zero bytes requested
    EmptyRead,
    /// A transaction is still in flight
    Busy,
    /// Transaction ended with this bus status
    Bus(Status),
    /// Bus clock cannot be configured
    Config(ConfigError),
}

impl From<ConfigError> for TwiError {
    fn from(e: ConfigError) -> Self {
        TwiError::Config(e)
    }
}
