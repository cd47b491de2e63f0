//! Bus status codes and transaction outcomes
//!
//! Status codes are the masked values of the peripheral's status
//! register in master mode. Slave-mode codes are not listed; they never
//! reach a master-only driver.

use twimaster_hal::STATUS_MASK;

use crate::error::TwiError;

/// Raw byte recorded for a successful transaction
///
/// Unreachable from the status register: bit 2 always reads as zero.
pub const SUCCESS_CODE: u8 = 0xFF;

/// Master-mode status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    /// Illegal START or STOP condition
    BusError = 0x00,
    /// START transmitted
    StartSent = 0x08,
    /// Repeated START transmitted
    RepeatedStartSent = 0x10,
    /// SLA+W transmitted, ACK received
    SlaWAck = 0x18,
    /// SLA+W transmitted, NACK received
    SlaWNack = 0x20,
    /// Data byte transmitted, ACK received
    DataTxAck = 0x28,
    /// Data byte transmitted, NACK received
    DataTxNack = 0x30,
    /// Arbitration lost in address or data phase
    ArbitrationLost = 0x38,
    /// SLA+R transmitted, ACK received
    SlaRAck = 0x40,
    /// SLA+R transmitted, NACK received
    SlaRNack = 0x48,
    /// Data byte received, ACK returned
    DataRxAck = 0x50,
    /// Data byte received, NACK returned
    DataRxNack = 0x58,
    /// No relevant state information
    NoInfo = 0xF8,
}

impl Status {
    /// Decode a status register value
    ///
    /// Prescaler bits are masked off. Returns `None` for codes a master
    /// never sees.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw & STATUS_MASK {
            0x00 => Some(Self::BusError),
            0x08 => Some(Self::StartSent),
            0x10 => Some(Self::RepeatedStartSent),
            0x18 => Some(Self::SlaWAck),
            0x20 => Some(Self::SlaWNack),
            0x28 => Some(Self::DataTxAck),
            0x30 => Some(Self::DataTxNack),
            0x38 => Some(Self::ArbitrationLost),
            0x40 => Some(Self::SlaRAck),
            0x48 => Some(Self::SlaRNack),
            0x50 => Some(Self::DataRxAck),
            0x58 => Some(Self::DataRxNack),
            0xF8 => Some(Self::NoInfo),
            _ => None,
        }
    }

    /// Raw status code
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Check if this code ends the transaction with an error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::BusError
                | Status::SlaWNack
                | Status::DataTxNack
                | Status::ArbitrationLost
                | Status::SlaRNack
        )
    }
}

/// Result of the most recent transaction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Transaction in flight, or nothing has run since init
    Pending,
    /// Phase completed as requested
    Success,
    /// Phase failed with this bus status
    Failed(Status),
}

impl Outcome {
    /// Raw byte form (`0xF8` pending, `0xFF` success, status otherwise)
    pub fn raw(self) -> u8 {
        match self {
            Outcome::Pending => Status::NoInfo.raw(),
            Outcome::Success => SUCCESS_CODE,
            Outcome::Failed(status) => status.raw(),
        }
    }

    /// Check if the outcome is final
    pub fn is_settled(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    /// Convert a failed outcome into a bus error
    pub fn into_result(self) -> Result<(), TwiError> {
        match self {
            Outcome::Failed(status) => Err(TwiError::Bus(status)),
            Outcome::Pending | Outcome::Success => Ok(()),
        }
    }
}
