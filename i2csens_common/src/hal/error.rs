//! Error types for register access, device binding and the attribute interface.
//!
//! Register-level errors propagate unchanged to the caller of an attribute
//! get/set. Binding is the only layer that turns a register error into a
//! decision (bind or reject).

use crate::hal::bus::BusError;
use thiserror::Error;

/// Errors raised by a register map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegmapError {
    /// Address outside the declared register space
    #[error("Register {address:#04x} out of range (address space size {size})")]
    OutOfRange {
        /// Offending address
        address: u8,
        /// Number of addressable registers
        size: usize,
    },

    /// Write to a register the map declares read-only
    #[error("Register {address:#04x} is not writable")]
    NotWritable {
        /// Offending address
        address: u8,
    },

    /// Transport failure during the transaction
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Errors that reject a device during binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Reading the identity register failed on the bus
    #[error("Error reading ID register: {0}")]
    Bus(BusError),

    /// The identity register holds an unexpected value
    #[error("Unexpected ID {found:#04x} (expected {expected:#04x})")]
    UnexpectedIdentity {
        /// Identity byte the driver supports
        expected: u8,
        /// Identity byte the device reported
        found: u8,
    },

    /// Register map rejected the identity access
    #[error("Register access failed: {0}")]
    Register(RegmapError),
}

impl From<RegmapError> for BindError {
    fn from(err: RegmapError) -> Self {
        match err {
            RegmapError::Bus(bus) => BindError::Bus(bus),
            other => BindError::Register(other),
        }
    }
}

/// Errors returned by attribute get/set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    /// The written text does not hold an integer
    #[error("Invalid input: {0:?}")]
    InvalidInput(String),

    /// Set attempted on a read-only attribute
    #[error("Attribute '{0}' is read-only")]
    ReadOnly(&'static str),

    /// Underlying register access failed
    #[error(transparent)]
    Register(#[from] RegmapError),
}

/// Errors from the attribute namespace when exposing a device's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The namespace cannot accept new entries
    #[error("Attribute namespace unavailable")]
    Unavailable,

    /// The device already exposes an attribute group
    #[error("Attribute group already exists for device '{0}'")]
    AlreadyExists(String),

    /// No such attribute is exposed for the device
    #[error("No attribute '{attr}' for device '{device}'")]
    NotFound {
        /// Device instance name
        device: String,
        /// Attribute name
        attr: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_error_becomes_bind_bus_error() {
        let err: BindError = RegmapError::Bus(BusError::Timeout).into();
        assert_eq!(err, BindError::Bus(BusError::Timeout));

        let err: BindError = RegmapError::NotWritable { address: 0 }.into();
        assert!(matches!(err, BindError::Register(RegmapError::NotWritable { .. })));
    }

    #[test]
    fn unexpected_identity_display() {
        let err = BindError::UnexpectedIdentity {
            expected: 0x5A,
            found: 0x13,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x13"));
        assert!(msg.contains("0x5a"));
    }

    #[test]
    fn attr_error_wraps_register_error() {
        let err: AttrError = RegmapError::Bus(BusError::Disconnected).into();
        assert_eq!(err.to_string(), "Device disconnected");
    }
}
