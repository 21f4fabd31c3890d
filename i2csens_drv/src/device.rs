//! Bound i2csens device instance.
//!
//! An `I2cSens` only exists after its identity has been validated, so holding
//! one is proof the device is in the `Bound` state. The register map sits
//! behind a mutex: every attribute access runs as one critical section, which
//! keeps the CTRL read-modify-write from interleaving with another caller.

use crate::regmap::Regmap;
use i2csens_common::hal::bus::BusTransport;
use std::sync::{Mutex, PoisonError};

/// Binding state of a discovered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Discovered, identity not yet checked
    Unbound,
    /// Identity validated; attributes may be used
    Bound,
    /// Bus error or identity mismatch during binding; never retried
    Rejected,
}

/// Private state of one bound sensor.
pub struct I2cSens<B> {
    name: String,
    regmap: Mutex<Regmap<B>>,
    attrs_registered: bool,
}

impl<B: BusTransport> I2cSens<B> {
    pub(crate) fn new(name: String, regmap: Regmap<B>, attrs_registered: bool) -> Self {
        Self {
            name,
            regmap: Mutex::new(regmap),
            attrs_registered,
        }
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always `Bound`: rejected devices are never constructed.
    pub fn state(&self) -> BindState {
        BindState::Bound
    }

    /// True if the attribute group was exposed during binding.
    pub fn attrs_registered(&self) -> bool {
        self.attrs_registered
    }

    /// Run `f` with exclusive access to the register map.
    ///
    /// No other access to this device can interleave with the closure. The
    /// map keeps no state between transactions, so a lock poisoned by a
    /// panicking caller is taken over as is.
    pub fn with_regmap<T>(&self, f: impl FnOnce(&mut Regmap<B>) -> T) -> T {
        let mut guard = self.regmap.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Tear the instance down and hand back the transport.
    pub(crate) fn into_bus(self) -> B {
        self.regmap
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_bus()
    }
}
