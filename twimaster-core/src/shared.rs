//! Driver handle shared between foreground and interrupt context
//!
//! The driver lives in a blocking mutex so it can sit in a `static` and be
//! reached from both the interrupt handler and the foreground. The mode is
//! the handover token: the foreground only touches buffers while the
//! driver is ready, and from then on only the interrupt handler advances
//! the transaction.
//!
//! ```rust,ignore
//! static TWI0: SharedTwiMaster<CriticalSectionRawMutex, Twi0> =
//!     SharedTwiMaster::new(Twi0::new(), I2cConfig::FAST);
//!
//! #[interrupt]
//! fn TWI0() {
//!     TWI0.on_interrupt();
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use twimaster_hal::{I2cBus, I2cConfig, TwiHardware};

use crate::error::TwiError;
use crate::master::{write_address, TwiMaster, DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY};
use crate::state::{Mode, Outcome};

/// TWI master reachable from the foreground and the interrupt handler
pub struct SharedTwiMaster<
    M: RawMutex,
    H,
    const TX: usize = DEFAULT_TX_CAPACITY,
    const RX: usize = DEFAULT_RX_CAPACITY,
> {
    inner: Mutex<M, RefCell<TwiMaster<H, TX, RX>>>,
    /// Raised whenever the dispatcher hands the bus back
    ready: Signal<M, ()>,
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> SharedTwiMaster<M, H, TX, RX> {
    /// Create a shared driver; call [`init`](Self::init) before use
    pub const fn new(hardware: H, config: I2cConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(TwiMaster::new(hardware, config))),
            ready: Signal::new(),
        }
    }

    /// Run `f` with exclusive access to the driver
    ///
    /// Must not be called from inside `f`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut TwiMaster<H, TX, RX>) -> R) -> R {
        self.inner.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// Interrupt handler entry point
    pub fn on_interrupt(&self) {
        let ready = self.lock(|master| {
            master.on_interrupt();
            master.is_ready()
        });
        if ready {
            self.ready.signal(());
        }
    }

    /// Reset the transaction record and enable the peripheral
    pub fn init(&self) -> Result<(), TwiError> {
        self.lock(|master| master.init())
    }

    /// Check if a new transaction may be started
    pub fn is_ready(&self) -> bool {
        self.lock(|master| master.is_ready())
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.lock(|master| master.mode())
    }

    /// Result of the last transaction
    pub fn outcome(&self) -> Outcome {
        self.lock(|master| master.outcome())
    }

    /// Send `data` once the bus is free
    ///
    /// Spins until any running transaction finishes, then hands the new
    /// one to the hardware and returns. There is no timeout.
    pub fn transmit(&self, data: &[u8], repeat_start: bool) -> Result<(), TwiError> {
        self.when_ready(|master| master.transmit(data, repeat_start))
    }

    /// Read `count` bytes from `address` once the bus is free
    ///
    /// Spins like [`transmit`](Self::transmit).
    pub fn read(&self, address: u8, count: usize, repeat_start: bool) -> Result<(), TwiError> {
        self.when_ready(|master| master.read(address, count, repeat_start))
    }

    /// Copy the bytes of the last read into `buf`
    ///
    /// Returns the number of bytes copied.
    pub fn copy_received(&self, buf: &mut [u8]) -> usize {
        self.lock(|master| {
            let received = master.received();
            let len = received.len().min(buf.len());
            buf[..len].copy_from_slice(&received[..len]);
            len
        })
    }

    /// Wait until the dispatcher hands the bus back
    pub async fn wait_ready(&self) {
        while !self.is_ready() {
            self.ready.wait().await;
        }
    }

    /// Spin until the dispatcher hands the bus back
    pub fn block_until_ready(&self) {
        while !self.is_ready() {
            core::hint::spin_loop();
        }
    }

    /// Retry `start` until the driver stops reporting busy
    fn when_ready(
        &self,
        mut start: impl FnMut(&mut TwiMaster<H, TX, RX>) -> Result<(), TwiError>,
    ) -> Result<(), TwiError> {
        loop {
            match self.lock(&mut start) {
                Err(TwiError::Busy) => core::hint::spin_loop(),
                Ok(()) => {
                    self.ready.reset();
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run a complete read and copy the result out
    fn read_blocking(&self, address: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        self.read(address, buf.len(), false)?;
        self.block_until_ready();
        self.outcome().into_result()?;
        self.copy_received(buf);
        Ok(())
    }

    /// SLA+W followed by `data`
    fn write_frame(address: u8, data: &[u8]) -> Result<Vec<u8, TX>, TwiError> {
        let mut frame = Vec::new();
        frame
            .push(write_address(address))
            .map_err(|_| TwiError::Overflow)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| TwiError::Overflow)?;
        Ok(frame)
    }
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> I2cBus
    for &SharedTwiMaster<M, H, TX, RX>
{
    type Error = TwiError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), TwiError> {
        let frame = SharedTwiMaster::<M, H, TX, RX>::write_frame(address, data)?;
        self.transmit(&frame, false)?;
        self.block_until_ready();
        self.outcome().into_result()
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        self.read_blocking(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), TwiError> {
        // Validate both legs up front so a rejected read never strands a held bus
        let frame = SharedTwiMaster::<M, H, TX, RX>::write_frame(address, write_data)?;
        if read_buf.len() >= RX {
            return Err(TwiError::Overflow);
        }
        if read_buf.is_empty() {
            return Err(TwiError::EmptyRead);
        }

        self.transmit(&frame, true)?;
        self.block_until_ready();
        let write_outcome = self.outcome();

        // The chain continues even if the write leg failed
        let read_result = self.read_blocking(address, read_buf);
        write_outcome.into_result()?;
        read_result
    }
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> I2cBus
    for SharedTwiMaster<M, H, TX, RX>
{
    type Error = TwiError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), TwiError> {
        I2cBus::write(&mut &*self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        I2cBus::read(&mut &*self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), TwiError> {
        I2cBus::write_read(&mut &*self, address, write_data, read_buf)
    }
}
