//! Register-map and device configuration types.
//!
//! [`RegmapConfig`] describes a device's address space and is handed to the
//! register map constructor. It is read-only data shared by every device
//! instance of the same type.
//!
//! [`DeviceConfig`] is the TOML file that tells the tooling which device to
//! bring up and over which transport.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "i2csens"
//!
//! [device]
//! name = "1-0048"
//! compatible = "mistra,i2csens"
//!
//! [bus]
//! kind = "i2c-dev"
//! path = "/dev/i2c-1"
//! address = 0x48
//! ```

use crate::config::{ConfigError, LogLevel, SharedConfig};
use crate::consts::{
    DEFAULT_DEVICE_NAME, I2CSENS_ID, OF_COMPATIBLE, REG_CTRL, REG_DATA, REGISTER_COUNT,
};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Register caching policy.
///
/// Only `None` exists: every read goes to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// No cache, every access is a bus transaction
    #[default]
    None,
}

/// Description of a device's register address space.
#[derive(Debug, Clone, Copy)]
pub struct RegmapConfig {
    /// Name used in log output
    pub name: &'static str,
    /// Register address width in bits
    pub reg_bits: u8,
    /// Register value width in bits
    pub val_bits: u8,
    /// Highest valid register address
    pub max_register: u8,
    /// Cache policy
    pub cache_type: CachePolicy,
    /// Returns true if the register at the address accepts writes
    pub writeable_reg: fn(u8) -> bool,
}

impl RegmapConfig {
    /// Number of addressable registers.
    pub const fn address_space_size(&self) -> usize {
        self.max_register as usize + 1
    }

    /// Check that the description fits a byte-wide transport.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if:
    /// - `val_bits` is not 8
    /// - `reg_bits` is not within 1..=8
    /// - `max_register` does not fit in `reg_bits`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.val_bits != 8 {
            return Err(ConfigError::ValidationError(format!(
                "{}: val_bits must be 8, got {}",
                self.name, self.val_bits
            )));
        }
        if !(1..=8).contains(&self.reg_bits) {
            return Err(ConfigError::ValidationError(format!(
                "{}: reg_bits must be within 1..=8, got {}",
                self.name, self.reg_bits
            )));
        }
        if u16::from(self.max_register) >= 1u16 << self.reg_bits {
            return Err(ConfigError::ValidationError(format!(
                "{}: max_register {:#04x} does not fit in {} address bits",
                self.name, self.max_register, self.reg_bits
            )));
        }
        Ok(())
    }
}

fn i2csens_writeable_reg(reg: u8) -> bool {
    reg == REG_CTRL
}

/// Register map of the i2csens sensor: ID, CTRL, DATA; only CTRL is writable.
pub static I2CSENS_REGMAP_CONFIG: RegmapConfig = RegmapConfig {
    name: "i2csens",
    reg_bits: 8,
    val_bits: 8,
    max_register: REG_DATA,
    cache_type: CachePolicy::None,
    writeable_reg: i2csens_writeable_reg,
};

bitflags! {
    /// CTRL register bits. Bits other than `ENABLE` are reserved and must be
    /// preserved across writes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CtrlFlags: u8 {
        /// Sensor armed
        const ENABLE = 0x01;
    }
}

/// Initial register contents for the simulated sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Identity register value
    pub id: u8,
    /// Control register value
    pub ctrl: u8,
    /// Sample register value
    pub data: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            id: I2CSENS_ID,
            ctrl: 0,
            data: 0,
        }
    }
}

impl SimulationConfig {
    /// Register contents indexed by address.
    pub fn registers(&self) -> [u8; REGISTER_COUNT] {
        [self.id, self.ctrl, self.data]
    }
}

/// Transport used to reach the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum BusConfig {
    /// In-process register model
    Simulated(SimulationConfig),
    /// Linux `/dev/i2c-N` character device
    I2cDev {
        /// Adapter device node
        path: PathBuf,
        /// 7-bit client address
        address: u16,
    },
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::Simulated(SimulationConfig::default())
    }
}

/// Identity of the device instance presented to discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DeviceSection {
    /// Instance name, used as the attribute directory name
    pub name: String,
    /// Device-tree compatible string
    pub compatible: Option<String>,
    /// Bus device id
    pub id: Option<String>,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            compatible: Some(OF_COMPATIBLE.to_string()),
            id: None,
        }
    }
}

/// Top-level configuration file for the i2csens tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Common fields
    pub shared: SharedConfig,
    /// Device identity
    #[serde(default)]
    pub device: DeviceSection,
    /// Transport
    #[serde(default)]
    pub bus: BusConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig {
                log_level: LogLevel::default(),
                service_name: "i2csens".to_string(),
            },
            device: DeviceSection::default(),
            bus: BusConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if:
    /// - the shared section is invalid
    /// - the device name is empty
    /// - neither a compatible string nor a device id is given
    /// - an `i2c-dev` address does not fit in 7 bits
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.device.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "device.name cannot be empty".to_string(),
            ));
        }
        if self.device.compatible.is_none() && self.device.id.is_none() {
            return Err(ConfigError::ValidationError(
                "device needs a compatible string or an id".to_string(),
            ));
        }
        if let BusConfig::I2cDev { address, .. } = self.bus {
            if address > 0x7F {
                return Err(ConfigError::ValidationError(format!(
                    "bus.address {address:#x} is not a 7-bit address"
                )));
            }
        }
        Ok(())
    }
}
