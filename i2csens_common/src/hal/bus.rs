//! Bus transport contract.
//!
//! The register map never talks to a particular bus (I2C, SPI, simulated).
//! It only needs a request/response channel that moves one byte to or from
//! one register address per transaction. Implementations are expected to
//! serialize transactions issued on the same handle.

use thiserror::Error;

/// Transport-level failure, surfaced unchanged to callers and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// The device did not acknowledge the transfer
    #[error("No acknowledge for register {address:#04x}")]
    Nack {
        /// Register address of the failed transfer
        address: u8,
    },

    /// The transfer did not complete in time
    #[error("Bus transaction timed out")]
    Timeout,

    /// The device is no longer reachable
    #[error("Device disconnected")]
    Disconnected,

    /// Operating-system level I/O failure
    #[error("Bus I/O error: {0}")]
    Io(String),
}

/// Direction and payload of a single register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Read one byte from the register
    Read,
    /// Write one byte to the register
    Write(u8),
}

/// Request/response channel to a byte-addressable device.
pub trait BusTransport {
    /// Execute one transaction against `address`.
    ///
    /// Returns the byte read, or the byte written for [`Transfer::Write`].
    ///
    /// # Errors
    /// Returns [`BusError`] when the transport reports a failed transfer.
    fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError>;
}

impl<T: BusTransport + ?Sized> BusTransport for Box<T> {
    fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
        (**self).transaction(address, transfer)
    }
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
        (**self).transaction(address, transfer)
    }
}

/// Owned, type-erased transport handle as handed out by device discovery.
pub type DynBus = Box<dyn BusTransport + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl BusTransport for Echo {
        fn transaction(&mut self, address: u8, transfer: Transfer) -> Result<u8, BusError> {
            match transfer {
                Transfer::Read => Ok(address),
                Transfer::Write(value) => Ok(value),
            }
        }
    }

    #[test]
    fn boxed_transport_forwards() {
        let mut bus: DynBus = Box::new(Echo);
        assert_eq!(bus.transaction(7, Transfer::Read), Ok(7));
        assert_eq!(bus.transaction(1, Transfer::Write(0x42)), Ok(0x42));
    }

    #[test]
    fn bus_error_display() {
        let err = BusError::Nack { address: 2 };
        assert!(err.to_string().contains("0x02"));
        assert!(BusError::Io("EIO".into()).to_string().contains("EIO"));
    }
}
