//! Driver registry and device matching.
//!
//! A [`DriverRegistry`] holds the drivers the host knows about, each with its
//! device-tree compatible strings and bus id names. Discovery hands the
//! registry a [`DeviceDescriptor`]; the first driver whose tables match gets
//! to probe the device. The registry is built by the caller and passed to the
//! host by value, so it can be tested in isolation.

use crate::binding::bind;
use crate::device::I2cSens;
use crate::surface::AttributeSurface;
use i2csens_common::consts::{DRIVER_NAME, I2C_DEVICE_ID, OF_COMPATIBLE};
use i2csens_common::hal::bus::DynBus;
use i2csens_common::hal::error::BindError;

/// Probe function: validate the device and expose its attributes.
pub type ProbeFn =
    fn(&str, DynBus, &mut dyn AttributeSurface) -> Result<I2cSens<DynBus>, BindError>;

/// Static description of a driver.
pub struct DriverEntry {
    /// Driver name
    pub name: &'static str,
    /// Device-tree compatible strings
    pub of_match_table: &'static [&'static str],
    /// Bus device ids
    pub id_table: &'static [&'static str],
    /// Called once per matching device
    pub probe: ProbeFn,
}

/// The i2csens driver.
pub static I2CSENS_DRIVER: DriverEntry = DriverEntry {
    name: DRIVER_NAME,
    of_match_table: &[OF_COMPATIBLE],
    id_table: &[I2C_DEVICE_ID],
    probe: bind::<DynBus>,
};

/// A device reported by bus enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Instance name, unique on the host
    pub name: String,
    /// Device-tree compatible string, if described by firmware
    pub compatible: Option<String>,
    /// Bus device id, if instantiated by name
    pub id: Option<String>,
}

impl DeviceDescriptor {
    /// Descriptor of a firmware-described device.
    pub fn of(name: impl Into<String>, compatible: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compatible: Some(compatible.into()),
            id: None,
        }
    }

    /// Descriptor of a device instantiated by bus id.
    pub fn by_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compatible: None,
            id: Some(id.into()),
        }
    }
}

/// Registry of available drivers.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<&'static DriverEntry>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// Registry holding every built-in driver.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.register(&I2CSENS_DRIVER);
        reg
    }

    /// Register a driver.
    ///
    /// # Panics
    /// Panics if a driver with the same name is already registered.
    pub fn register(&mut self, driver: &'static DriverEntry) {
        if self.get(driver.name).is_some() {
            panic!("Driver '{}' is already registered", driver.name);
        }
        self.drivers.push(driver);
    }

    /// Get a driver by name.
    pub fn get(&self, name: &str) -> Option<&'static DriverEntry> {
        self.drivers.iter().copied().find(|d| d.name == name)
    }

    /// Find the driver for `device`.
    ///
    /// Compatible strings take precedence over bus ids.
    pub fn match_device(&self, device: &DeviceDescriptor) -> Option<&'static DriverEntry> {
        let by_of = device.compatible.as_deref().and_then(|compat| {
            self.drivers
                .iter()
                .copied()
                .find(|d| d.of_match_table.iter().any(|c| *c == compat))
        });
        by_of.or_else(|| {
            let id = device.id.as_deref()?;
            self.drivers
                .iter()
                .copied()
                .find(|d| d.id_table.iter().any(|i| *i == id))
        })
    }

    /// List all registered driver names.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        self.drivers.iter().map(|d| d.name).collect()
    }
}
