//! Status-event dispatcher
//!
//! Called once per TWI status interrupt. Reads the status code, updates
//! the transaction record and issues at most one bus operation. It never
//! blocks and never retries.
//!
//! | Status                          | Action                                   |
//! |---------------------------------|------------------------------------------|
//! | START sent, SLA+W ACK, data ACK | send next byte, or finish                |
//! | SLA+R ACK                       | receive next byte with ACK or NACK       |
//! | data received + ACK             | store byte, receive next with ACK/NACK   |
//! | data received + NACK            | store byte, finish                       |
//! | any NACK, arbitration lost      | record error, finish                     |
//! | repeated START sent             | hold the bus for the foreground          |
//! | illegal START/STOP              | record error, STOP                       |
//!
//! "Finish" issues a repeated START when the transaction asked for one and
//! STOP otherwise.

use twimaster_hal::TwiHardware;

use super::TwiMaster;
use crate::state::{Mode, Outcome, Status};

impl<H: TwiHardware, const TX: usize, const RX: usize> TwiMaster<H, TX, RX> {
    /// Handle one TWI status interrupt
    pub fn on_interrupt(&mut self) {
        let raw = self.hardware.status();
        match Status::from_raw(raw) {
            Some(status) => self.dispatch(status),
            None => {
                // Slave-mode codes; nothing to do in master mode
                #[cfg(feature = "defmt")]
                defmt::warn!("TWI unexpected status {=u8:#04x}", raw);
            }
        }
    }

    /// Advance the transaction for a decoded status code
    pub fn dispatch(&mut self, status: Status) {
        #[cfg(feature = "defmt")]
        defmt::trace!("TWI {} in {}", status, self.info.mode);

        match status {
            Status::StartSent | Status::DataTxAck => self.send_next_or_finish(),
            Status::SlaWAck => {
                self.info.mode = Mode::MasterTransmitter;
                self.send_next_or_finish();
            }

            Status::SlaRAck => {
                self.info.mode = Mode::MasterReceiver;
                self.request_next_byte();
            }
            Status::DataRxAck => {
                self.store_received();
                self.request_next_byte();
            }
            Status::DataRxNack => {
                self.store_received();
                self.finish(Outcome::Success);
            }

            Status::SlaWNack | Status::SlaRNack | Status::DataTxNack | Status::ArbitrationLost => {
                #[cfg(feature = "defmt")]
                defmt::warn!("TWI bus error: {}", status);
                self.finish(Outcome::Failed(status));
            }

            // Interrupt stays pending until the foreground loads the next frame
            Status::RepeatedStartSent => self.info.mode = Mode::RepeatedStartSent,

            Status::BusError => {
                #[cfg(feature = "defmt")]
                defmt::warn!("TWI illegal START/STOP, aborting");
                self.info.outcome = Outcome::Failed(Status::BusError);
                self.info.mode = Mode::Ready;
                self.hardware.stop();
            }

            // Placeholder value only; the hardware never interrupts with it
            Status::NoInfo => {}
        }
    }

    /// Load the next transmit byte, or end the transmission
    fn send_next_or_finish(&mut self) {
        match self.tx.next_byte() {
            Some(byte) => {
                self.hardware.write_data(byte);
                self.info.outcome = Outcome::Pending;
                self.hardware.resume();
            }
            None => self.finish(Outcome::Success),
        }
    }

    /// ACK every byte but the last requested one
    fn request_next_byte(&mut self) {
        self.info.outcome = Outcome::Pending;
        if self.rx.remaining() > 1 {
            self.hardware.ack_next();
        } else {
            self.hardware.nack_next();
        }
    }

    fn store_received(&mut self) {
        let byte = self.hardware.read_data();
        if !self.rx.push(byte) {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWI receive buffer full, dropping {=u8:#04x}", byte);
        }
    }

    /// Record the outcome, then chain with a repeated START or release the bus
    fn finish(&mut self, outcome: Outcome) {
        self.info.outcome = outcome;
        if self.info.repeat_start {
            self.hardware.start();
        } else {
            self.info.mode = Mode::Ready;
            self.hardware.stop();

            #[cfg(feature = "defmt")]
            defmt::debug!("TWI transaction done: {}", outcome);
        }
    }
}
