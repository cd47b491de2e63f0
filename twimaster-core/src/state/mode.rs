//! Driver modes and per-bus transaction record

use super::status::Outcome;

/// Driver modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Idle; buffers may be overwritten
    Ready,
    /// Transaction accepted, waiting for the first status event
    Initializing,
    /// Repeated START is on the bus; the next transaction must follow
    RepeatedStartSent,
    /// Address acknowledged for writing
    MasterTransmitter,
    /// Address acknowledged for reading
    MasterReceiver,
    /// Addressed as a slave for reading (never entered by the master)
    SlaveTransmitter,
    /// Addressed as a slave for writing (never entered by the master)
    SlaveReceiver,
}

impl Mode {
    /// Check if the foreground may start a new transaction
    ///
    /// A repeated START holds the bus for the foreground, so it counts.
    pub fn is_ready(&self) -> bool {
        matches!(self, Mode::Ready | Mode::RepeatedStartSent)
    }

    /// Check if the driver is mid-transaction
    pub fn is_busy(&self) -> bool {
        !self.is_ready()
    }
}

/// Transaction record for one bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionInfo {
    /// Current mode
    pub mode: Mode,
    /// Result of the last completed phase
    pub outcome: Outcome,
    /// Chain into another transaction instead of releasing the bus
    pub repeat_start: bool,
}

impl Default for TransactionInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionInfo {
    /// Fresh record: ready, nothing to report
    pub const fn new() -> Self {
        Self {
            mode: Mode::Ready,
            outcome: Outcome::Pending,
            repeat_start: false,
        }
    }

    /// Return to the power-on state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
