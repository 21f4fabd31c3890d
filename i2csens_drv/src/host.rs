//! Device host: discovery, teardown and attribute routing.
//!
//! The `DeviceHost` plays the part of the bus core. Enumeration reports a
//! device with [`DeviceHost::discover`]; the host matches it against the
//! [`DriverRegistry`] and probes it exactly once. Bound devices are reachable
//! through the attribute namespace until [`DeviceHost::remove`] tears them
//! down. A rejected device is remembered so it is never probed again.

use crate::binding::unbind;
use crate::device::{BindState, I2cSens};
use crate::driver_registry::{DeviceDescriptor, DriverRegistry};
use crate::surface::AttrNamespace;
use i2csens_common::hal::bus::DynBus;
use i2csens_common::hal::error::{AttrError, BindError, RegistrationError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// No registered driver matches the device
    #[error("No driver for device '{0}'")]
    NoDriver(String),

    /// The device was already probed
    #[error("Device '{0}' was already probed")]
    AlreadyProbed(String),

    /// The device was rejected during binding
    #[error("Device '{0}' was rejected")]
    Rejected(String),

    /// No device with this name
    #[error("Unknown device '{0}'")]
    DeviceNotFound(String),

    /// Binding failed
    #[error("Bind failed: {0}")]
    Bind(#[from] BindError),

    /// Attribute get/set failed
    #[error("Attribute access failed: {0}")]
    Attr(#[from] AttrError),

    /// Attribute not exposed
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

enum Slot {
    Bound(I2cSens<DynBus>),
    Rejected(BindError),
}

/// Owner of every discovered device.
pub struct DeviceHost {
    registry: DriverRegistry,
    namespace: AttrNamespace,
    slots: HashMap<String, Slot>,
}

impl DeviceHost {
    /// Create a host with an empty attribute namespace.
    pub fn new(registry: DriverRegistry) -> Self {
        Self::with_namespace(registry, AttrNamespace::new())
    }

    /// Create a host exposing attributes through `namespace`.
    pub fn with_namespace(registry: DriverRegistry, namespace: AttrNamespace) -> Self {
        Self {
            registry,
            namespace,
            slots: HashMap::new(),
        }
    }

    /// Probe a newly enumerated device over `transport`.
    ///
    /// # Errors
    /// - `HostError::AlreadyProbed` if a device with this name was seen before
    /// - `HostError::NoDriver` if no driver matches
    /// - `HostError::Bind` if the driver rejects the device
    pub fn discover(
        &mut self,
        device: DeviceDescriptor,
        transport: DynBus,
    ) -> Result<(), HostError> {
        if self.slots.contains_key(&device.name) {
            return Err(HostError::AlreadyProbed(device.name));
        }
        let driver = self
            .registry
            .match_device(&device)
            .ok_or_else(|| HostError::NoDriver(device.name.clone()))?;

        info!("{}: probing with driver '{}'", device.name, driver.name);
        match (driver.probe)(&device.name, transport, &mut self.namespace) {
            Ok(bound) => {
                self.slots.insert(device.name, Slot::Bound(bound));
                Ok(())
            }
            Err(e) => {
                warn!("{}: probe failed: {e}", device.name);
                self.slots.insert(device.name, Slot::Rejected(e.clone()));
                Err(HostError::Bind(e))
            }
        }
    }

    /// Tear down a device that disappeared from the bus.
    ///
    /// Returns the transport of a bound device, `None` for a rejected one.
    ///
    /// # Errors
    /// Returns `HostError::DeviceNotFound` if the device is unknown.
    pub fn remove(&mut self, name: &str) -> Result<Option<DynBus>, HostError> {
        match self.slots.remove(name) {
            Some(Slot::Bound(device)) => Ok(Some(unbind(device, &mut self.namespace))),
            Some(Slot::Rejected(_)) => Ok(None),
            None => Err(HostError::DeviceNotFound(name.to_string())),
        }
    }

    /// Tear down every device.
    pub fn shutdown(&mut self) {
        for (name, slot) in self.slots.drain() {
            match slot {
                Slot::Bound(device) => drop(unbind(device, &mut self.namespace)),
                Slot::Rejected(_) => debug!("{name}: dropping rejected device"),
            }
        }
    }

    /// Binding state of `name`; `Unbound` for devices never probed.
    pub fn state(&self, name: &str) -> BindState {
        match self.slots.get(name) {
            Some(Slot::Bound(_)) => BindState::Bound,
            Some(Slot::Rejected(_)) => BindState::Rejected,
            None => BindState::Unbound,
        }
    }

    /// Why `name` was rejected, if it was.
    pub fn rejection(&self, name: &str) -> Option<&BindError> {
        match self.slots.get(name) {
            Some(Slot::Rejected(e)) => Some(e),
            _ => None,
        }
    }

    /// A bound device.
    pub fn device(&self, name: &str) -> Option<&I2cSens<DynBus>> {
        match self.slots.get(name) {
            Some(Slot::Bound(device)) => Some(device),
            _ => None,
        }
    }

    /// Names of bound devices, sorted.
    pub fn devices(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Bound(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Attribute namespace.
    pub fn namespace(&self) -> &AttrNamespace {
        &self.namespace
    }

    /// Read `device/attr` as the namespace presents it (newline terminated).
    ///
    /// # Errors
    /// Fails if the device is not bound, the attribute is not exposed, or
    /// the get fails.
    pub fn read_attr(&self, device: &str, attr: &str) -> Result<String, HostError> {
        let dev = self.bound(device)?;
        let attribute = self.namespace.lookup(device, attr)?;
        Ok(format!("{}\n", attribute.show(dev)?))
    }

    /// Write `buf` to `device/attr`. Returns the number of bytes consumed.
    ///
    /// # Errors
    /// Fails if the device is not bound, the attribute is not exposed, or
    /// the set fails.
    pub fn write_attr(&self, device: &str, attr: &str, buf: &str) -> Result<usize, HostError> {
        let dev = self.bound(device)?;
        let attribute = self.namespace.lookup(device, attr)?;
        Ok(attribute.store(dev, buf)?)
    }

    fn bound(&self, name: &str) -> Result<&I2cSens<DynBus>, HostError> {
        match self.slots.get(name) {
            Some(Slot::Bound(device)) => Ok(device),
            Some(Slot::Rejected(_)) => Err(HostError::Rejected(name.to_string())),
            None => Err(HostError::DeviceNotFound(name.to_string())),
        }
    }
}
