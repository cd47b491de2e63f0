//! Simulated TWI peripheral for host tests
//!
//! Records every control operation and serves whatever status and data
//! the test loads. `armed` mimics the hardware starting a bus phase that
//! will end in a status interrupt.

use heapless::Vec;
use twimaster_hal::{TwiHardware, STATUS_MASK};

use crate::state::Status;

const MAX_OPS: usize = 64;

/// Control operation issued to the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwOp {
    SetClockDivisor(u8),
    Enable,
    Start,
    Stop,
    Resume,
    AckNext,
    NackNext,
    WriteData(u8),
}

#[derive(Debug)]
pub struct SimTwi {
    status: u8,
    data: u8,
    armed: bool,
    ops: Vec<HwOp, MAX_OPS>,
}

impl SimTwi {
    pub const fn new() -> Self {
        Self {
            status: 0xF8,
            data: 0,
            armed: false,
            ops: Vec::new(),
        }
    }

    /// Load the status register
    pub fn set_status(&mut self, status: Status) {
        self.status = status.raw();
    }

    /// Load a raw status register value
    pub fn set_raw_status(&mut self, raw: u8) {
        self.status = raw;
    }

    /// Load the data register as if a byte arrived
    pub fn set_data(&mut self, byte: u8) {
        self.data = byte;
    }

    pub fn ops(&self) -> &[HwOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, op: HwOp) -> usize {
        self.ops.iter().filter(|&&o| o == op).count()
    }

    /// Consume the "bus phase started" flag
    pub fn take_armed(&mut self) -> bool {
        core::mem::take(&mut self.armed)
    }

    fn record(&mut self, op: HwOp) {
        self.ops.push(op).expect("sim op log full");
    }
}

impl TwiHardware for SimTwi {
    fn set_clock_divisor(&mut self, divisor: u8) {
        self.record(HwOp::SetClockDivisor(divisor));
    }

    fn enable(&mut self) {
        self.record(HwOp::Enable);
    }

    fn start(&mut self) {
        self.armed = true;
        self.record(HwOp::Start);
    }

    fn stop(&mut self) {
        self.record(HwOp::Stop);
    }

    fn resume(&mut self) {
        self.armed = true;
        self.record(HwOp::Resume);
    }

    fn ack_next(&mut self) {
        self.armed = true;
        self.record(HwOp::AckNext);
    }

    fn nack_next(&mut self) {
        self.armed = true;
        self.record(HwOp::NackNext);
    }

    fn status(&mut self) -> u8 {
        self.status & STATUS_MASK
    }

    fn read_data(&mut self) -> u8 {
        self.data
    }

    fn write_data(&mut self, byte: u8) {
        self.data = byte;
        self.record(HwOp::WriteData(byte));
    }
}
