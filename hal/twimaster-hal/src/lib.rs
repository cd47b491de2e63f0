//! Twimaster Hardware Abstraction Layer
//!
//! This crate defines the seams between the master-mode TWI driver and
//! the outside world. The driver core is written against these traits so
//! the same state machine runs on a real peripheral or a simulated one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sensor drivers, etc.)     │
//! └─────────────────────────────────────────┘
//!                     │  I2cBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  twimaster-core (dispatcher + buffers)  │
//! └─────────────────────────────────────────┘
//!                     │  TwiHardware
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Chip register access (per target)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`hardware::TwiHardware`] - Register-level bus operations
//! - [`i2c::I2cBus`] - Blocking I2C master operations

#![no_std]
#![deny(unsafe_code)]

pub mod hardware;
pub mod i2c;

// Re-export key items at crate root for convenience
pub use hardware::{TwiHardware, STATUS_MASK};
pub use i2c::{ConfigError, I2cBus, I2cConfig};
