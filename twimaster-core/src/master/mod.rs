//! Single-context TWI master
//!
//! [`TwiMaster`] owns one peripheral together with its transaction record
//! and buffers. The foreground entry points live here; the status-event
//! handler is in [`dispatch`].
//!
//! Everything takes `&mut self`, so this type on its own cannot wait for
//! a running transaction: [`TwiMaster::transmit`] and [`TwiMaster::read`]
//! refuse with [`TwiError::Busy`] instead. Use
//! [`SharedTwiMaster`](crate::SharedTwiMaster) when the foreground and the
//! interrupt handler run in different contexts.

pub mod dispatch;

use twimaster_hal::{I2cConfig, TwiHardware};

use crate::buffer::{RxBuffer, TxBuffer};
use crate::error::TwiError;
use crate::state::{Mode, Outcome, TransactionInfo};

/// Default transmit buffer capacity in bytes
pub const DEFAULT_TX_CAPACITY: usize = 16;

/// Default receive buffer capacity in bytes
pub const DEFAULT_RX_CAPACITY: usize = 16;

/// Read direction bit of the address frame
const READ_BIT: u8 = 0x01;

/// Build the SLA+R frame for a 7-bit address
pub fn read_address(address: u8) -> u8 {
    (address << 1) | READ_BIT
}

/// Build the SLA+W frame for a 7-bit address
pub fn write_address(address: u8) -> u8 {
    address << 1
}

/// Master-mode driver for one TWI peripheral
pub struct TwiMaster<
    H,
    const TX: usize = DEFAULT_TX_CAPACITY,
    const RX: usize = DEFAULT_RX_CAPACITY,
> {
    hardware: H,
    config: I2cConfig,
    info: TransactionInfo,
    tx: TxBuffer<TX>,
    rx: RxBuffer<RX>,
}

impl<H: TwiHardware, const TX: usize, const RX: usize> TwiMaster<H, TX, RX> {
    /// Create a driver; call [`init`](Self::init) before the first transaction
    pub const fn new(hardware: H, config: I2cConfig) -> Self {
        Self {
            hardware,
            config,
            info: TransactionInfo::new(),
            tx: TxBuffer::new(),
            rx: RxBuffer::new(),
        }
    }

    /// Reset the transaction record, program the clock and enable the peripheral
    ///
    /// Safe to call repeatedly. Fails without touching anything if the
    /// configured bus frequency cannot be generated.
    pub fn init(&mut self) -> Result<(), TwiError> {
        let divisor = self.config.bit_rate_divisor()?;
        self.info.reset();
        self.hardware.set_clock_divisor(divisor);
        self.hardware.enable();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "TWI init: {} Hz, divisor {}",
            self.config.frequency,
            divisor
        );

        Ok(())
    }

    /// Check if a new transaction may be started
    pub fn is_ready(&self) -> bool {
        self.info.mode.is_ready()
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.info.mode
    }

    /// Result of the last transaction
    ///
    /// Only meaningful once [`is_ready`](Self::is_ready) returns true.
    pub fn outcome(&self) -> Outcome {
        self.info.outcome
    }

    /// Full transaction record
    pub fn info(&self) -> &TransactionInfo {
        &self.info
    }

    /// Bus configuration
    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    /// Bytes received by the last read, in arrival order
    pub fn received(&self) -> &[u8] {
        self.rx.as_slice()
    }

    /// Transmit buffer capacity
    pub const fn tx_capacity(&self) -> usize {
        TX
    }

    /// Receive buffer capacity
    pub const fn rx_capacity(&self) -> usize {
        RX
    }

    /// Access the peripheral
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Mutable access to the peripheral
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Give the peripheral back
    pub fn release(self) -> H {
        self.hardware
    }

    /// Start sending `data` as-is
    ///
    /// The first byte must be the address frame (SLA+W or SLA+R). With
    /// `repeat_start` the bus is kept after the last byte and a repeated
    /// START is issued instead of STOP; the next call then continues on
    /// the held bus. An empty `data` after a repeated START releases the
    /// bus with STOP.
    ///
    /// Returns once the first bus operation is issued. Completion is
    /// observed through [`is_ready`](Self::is_ready) and
    /// [`outcome`](Self::outcome).
    pub fn transmit(&mut self, data: &[u8], repeat_start: bool) -> Result<(), TwiError> {
        if data.len() > TX {
            return Err(TwiError::Overflow);
        }
        if !self.is_ready() {
            return Err(TwiError::Busy);
        }

        self.begin(data, repeat_start);
        Ok(())
    }

    /// Start reading `count` bytes from `address`
    ///
    /// `count` must be non-zero and smaller than the receive capacity.
    /// The bytes are available through [`received`](Self::received) once
    /// the transaction completes.
    pub fn read(&mut self, address: u8, count: usize, repeat_start: bool) -> Result<(), TwiError> {
        if count >= RX {
            return Err(TwiError::Overflow);
        }
        if count == 0 {
            return Err(TwiError::EmptyRead);
        }
        if !self.is_ready() {
            return Err(TwiError::Busy);
        }

        self.rx.expect(count);
        self.begin(&[read_address(address)], repeat_start);
        Ok(())
    }

    /// Hand a transaction to the hardware
    ///
    /// Caller has checked readiness and capacity.
    fn begin(&mut self, data: &[u8], repeat_start: bool) {
        self.info.repeat_start = repeat_start;
        self.tx.load(data);
        self.info.outcome = Outcome::Pending;

        if self.info.mode == Mode::RepeatedStartSent {
            // Targets are already listening for an address; no new START
            match self.tx.next_byte() {
                Some(byte) => {
                    self.info.mode = Mode::Initializing;
                    self.hardware.write_data(byte);
                    self.hardware.resume();
                }
                None => {
                    self.info.mode = Mode::Ready;
                    self.info.outcome = Outcome::Success;
                    self.hardware.stop();
                }
            }
        } else {
            self.info.mode = Mode::Initializing;
            self.hardware.start();
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("TWI begin: {} bytes, repeat_start={}", data.len(), repeat_start);
    }
}
