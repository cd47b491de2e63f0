//! Register-level TWI peripheral operations
//!
//! Each method maps onto a single control register write (or register
//! read) of a classic TWI peripheral. Implementations must keep the
//! peripheral and its interrupt enabled on every control write, and every
//! write that continues the bus also clears the pending-interrupt flag.

/// Bits of the status register that carry the protocol status code.
///
/// The low three bits hold the prescaler and a reserved bit.
pub const STATUS_MASK: u8 = 0xF8;

/// TWI peripheral in master mode
///
/// The dispatcher issues exactly one bus operation per status event, so
/// implementations never need to queue or retry anything.
pub trait TwiHardware {
    /// Clear the prescaler and program the bit-rate divisor
    fn set_clock_divisor(&mut self, divisor: u8);

    /// Enable the peripheral and its status interrupt
    fn enable(&mut self);

    /// Request a START (or repeated START) condition
    fn start(&mut self);

    /// Request a STOP condition, releasing the bus
    fn stop(&mut self);

    /// Clear the wait condition so the loaded byte goes out
    fn resume(&mut self);

    /// Receive the next byte and answer it with ACK
    fn ack_next(&mut self);

    /// Receive the next byte and answer it with NACK
    fn nack_next(&mut self);

    /// Current status code, already masked with [`STATUS_MASK`]
    fn status(&mut self) -> u8;

    /// Read the data register
    fn read_data(&mut self) -> u8;

    /// Load the data register
    fn write_data(&mut self, byte: u8);
}
