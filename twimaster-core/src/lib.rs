//! Interrupt-driven TWI/I2C master driver
//!
//! The foreground prepares a transaction and issues the first bus
//! operation; every later step is taken by the dispatcher in response to
//! the peripheral's status interrupt:
//!
//! - Transaction modes and bus status codes
//! - Fixed-capacity transmit/receive buffers
//! - The status-event dispatcher
//! - Single-context driver ([`TwiMaster`]) and the handle shared between
//!   foreground and interrupt ([`SharedTwiMaster`])
//! - `embedded_hal::i2c::I2c` and [`twimaster_hal::I2cBus`] on the shared handle

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod i2c;
pub mod master;
pub mod shared;
pub mod state;

#[cfg(test)]
mod sim;

pub use error::TwiError;
pub use master::{TwiMaster, DEFAULT_RX_CAPACITY, DEFAULT_TX_CAPACITY};
pub use shared::SharedTwiMaster;
pub use state::{Mode, Outcome, Status};
