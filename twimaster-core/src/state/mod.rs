//! Transaction state
//!
//! The mode doubles as the synchronization token between the foreground
//! and the interrupt handler; the outcome is the last recorded result.

pub mod mode;
pub mod status;

pub use mode::{Mode, TransactionInfo};
pub use status::{Outcome, Status};
