//! embedded-hal I2C implementation
//!
//! Lets device drivers written against `embedded_hal::i2c::I2c` run on the
//! shared driver. Adjacent operations of the same direction are merged
//! into one bus transfer; transfers are chained with repeated STARTs and
//! only the last one ends with STOP.

use embedded_hal::i2c::{
    Error, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress,
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;
use twimaster_hal::TwiHardware;

use crate::error::TwiError;
use crate::master::write_address;
use crate::shared::SharedTwiMaster;
use crate::state::Status;

impl Error for TwiError {
    fn kind(&self) -> ErrorKind {
        match self {
            TwiError::Bus(Status::SlaWNack | Status::SlaRNack) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            TwiError::Bus(Status::DataTxNack) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            TwiError::Bus(Status::ArbitrationLost) => ErrorKind::ArbitrationLoss,
            TwiError::Bus(_) => ErrorKind::Bus,
            TwiError::Overflow | TwiError::EmptyRead | TwiError::Busy | TwiError::Config(_) => {
                ErrorKind::Other
            }
        }
    }
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> ErrorType
    for &SharedTwiMaster<M, H, TX, RX>
{
    type Error = TwiError;
}

fn is_read(op: &Operation<'_>) -> bool {
    matches!(op, Operation::Read(_))
}

fn op_len(op: &Operation<'_>) -> usize {
    match op {
        Operation::Read(buf) => buf.len(),
        Operation::Write(bytes) => bytes.len(),
    }
}

/// End of the run of same-direction operations starting at `start`
fn run_end(operations: &[Operation<'_>], start: usize) -> usize {
    let read = is_read(&operations[start]);
    let mut end = start + 1;
    while end < operations.len() && is_read(&operations[end]) == read {
        end += 1;
    }
    end
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> I2c<SevenBitAddress>
    for &SharedTwiMaster<M, H, TX, RX>
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), TwiError> {
        // Every transfer must fit before the first one takes the bus
        let mut start = 0;
        while start < operations.len() {
            let end = run_end(operations, start);
            let len: usize = operations[start..end].iter().map(op_len).sum();
            if is_read(&operations[start]) {
                if len >= RX {
                    return Err(TwiError::Overflow);
                }
                if len == 0 {
                    return Err(TwiError::EmptyRead);
                }
            } else if len >= TX {
                return Err(TwiError::Overflow);
            }
            start = end;
        }

        let mut first_error = None;
        let mut start = 0;
        while start < operations.len() {
            let end = run_end(operations, start);
            let repeat_start = end < operations.len();
            let run = &mut operations[start..end];

            let result = if is_read(&run[0]) {
                self.read_run(address, run, repeat_start)
            } else {
                self.write_run(address, run, repeat_start)
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
            start = end;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<M: RawMutex, H: TwiHardware, const TX: usize, const RX: usize> SharedTwiMaster<M, H, TX, RX> {
    /// One SLA+W transfer carrying every write in `run`
    fn write_run(
        &self,
        address: u8,
        run: &[Operation<'_>],
        repeat_start: bool,
    ) -> Result<(), TwiError> {
        let mut frame: Vec<u8, TX> = Vec::new();
        frame
            .push(write_address(address))
            .map_err(|_| TwiError::Overflow)?;
        for op in run {
            if let Operation::Write(bytes) = op {
                frame
                    .extend_from_slice(bytes)
                    .map_err(|_| TwiError::Overflow)?;
            }
        }

        self.transmit(&frame, repeat_start)?;
        self.block_until_ready();
        self.outcome().into_result()
    }

    /// One SLA+R transfer filling every read buffer in `run` in order
    fn read_run(
        &self,
        address: u8,
        run: &mut [Operation<'_>],
        repeat_start: bool,
    ) -> Result<(), TwiError> {
        let total: usize = run.iter().map(op_len).sum();
        self.read(address, total, repeat_start)?;
        self.block_until_ready();
        self.outcome().into_result()?;

        self.lock(|master| {
            let mut received = master.received();
            for op in run.iter_mut() {
                if let Operation::Read(buf) = op {
                    let len = buf.len().min(received.len());
                    buf[..len].copy_from_slice(&received[..len]);
                    received = &received[len..];
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::thread;
    use twimaster_hal::I2cConfig;

    use super::*;
    use crate::master::read_address;
    use crate::sim::{HwOp, SimTwi};
    use crate::state::Mode;

    type Shared = SharedTwiMaster<CriticalSectionRawMutex, SimTwi>;

    fn ready_shared() -> Shared {
        let shared = SharedTwiMaster::new(SimTwi::new(), I2cConfig::FAST);
        shared.init().unwrap();
        shared.lock(|m| m.hardware_mut().clear_ops());
        shared
    }

    fn serve(shared: &Shared, script: &[(Status, u8)]) {
        for &(status, data) in script {
            while !shared.lock(|m| m.hardware_mut().take_armed()) {
                thread::yield_now();
            }
            shared.lock(|m| {
                m.hardware_mut().set_status(status);
                m.hardware_mut().set_data(data);
            });
            shared.on_interrupt();
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            TwiError::Bus(Status::SlaWNack).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert_eq!(
            TwiError::Bus(Status::SlaRNack).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert_eq!(
            TwiError::Bus(Status::DataTxNack).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        );
        assert_eq!(
            TwiError::Bus(Status::ArbitrationLost).kind(),
            ErrorKind::ArbitrationLoss
        );
        assert_eq!(TwiError::Bus(Status::BusError).kind(), ErrorKind::Bus);
        assert_eq!(TwiError::Overflow.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_merged_writes_then_split_read() {
        let shared = ready_shared();
        let mut head = [0u8; 1];
        let mut tail = [0u8; 2];

        let result = thread::scope(|s| {
            s.spawn(|| {
                serve(
                    &shared,
                    &[
                        (Status::StartSent, 0),
                        (Status::SlaWAck, 0),
                        (Status::DataTxAck, 0),
                        (Status::DataTxAck, 0),
                        (Status::RepeatedStartSent, 0),
                        (Status::SlaRAck, 0),
                        (Status::DataRxAck, 0x0A),
                        (Status::DataRxAck, 0x0B),
                        (Status::DataRxNack, 0x0C),
                    ],
                )
            });

            let mut bus = &shared;
            bus.transaction(
                0x68,
                &mut [
                    Operation::Write(&[0x3B]),
                    Operation::Write(&[0x01]),
                    Operation::Read(&mut head),
                    Operation::Read(&mut tail),
                ],
            )
        });

        assert_eq!(result, Ok(()));
        assert_eq!(head, [0x0A]);
        assert_eq!(tail, [0x0B, 0x0C]);
        assert_eq!(shared.mode(), Mode::Ready);
        shared.lock(|m| {
            let ops = m.hardware().ops();
            assert_eq!(m.hardware().count(HwOp::Stop), 1);
            assert!(ops.contains(&HwOp::WriteData(read_address(0x68))));
            assert!(ops.contains(&HwOp::WriteData(0x3B)));
            assert!(ops.contains(&HwOp::WriteData(0x01)));
        });
    }

    #[test]
    fn test_default_write_read() {
        let shared = ready_shared();
        let mut buf = [0u8; 1];

        let result = thread::scope(|s| {
            s.spawn(|| {
                serve(
                    &shared,
                    &[
                        (Status::StartSent, 0),
                        (Status::SlaWAck, 0),
                        (Status::DataTxAck, 0),
                        (Status::RepeatedStartSent, 0),
                        (Status::SlaRAck, 0),
                        (Status::DataRxNack, 0x77),
                    ],
                )
            });

            let mut bus = &shared;
            I2c::write_read(&mut bus, 0x40, &[0x00], &mut buf)
        });

        assert_eq!(result, Ok(()));
        assert_eq!(buf, [0x77]);
    }

    #[test]
    fn test_rejects_oversize_run_before_bus_use() {
        let shared = ready_shared();
        let mut big = [0u8; 16];

        let mut bus = &shared;
        let result = bus.transaction(
            0x68,
            &mut [Operation::Write(&[0x3B]), Operation::Read(&mut big)],
        );

        assert_eq!(result, Err(TwiError::Overflow));
        shared.lock(|m| assert!(m.hardware().ops().is_empty()));
    }

    #[test]
    fn test_empty_transaction() {
        let shared = ready_shared();
        let mut bus = &shared;
        assert_eq!(bus.transaction(0x10, &mut []), Ok(()));
    }
}
