//! Named constants for the i2csens sensor.
//!
//! Register addresses are logical addresses inside the register map, not
//! physical offsets.

use static_assertions::const_assert;

/// Identity register (read-only).
pub const REG_ID: u8 = 0;

/// Control register (read-write). Bit 0 enables the sensor.
pub const REG_CTRL: u8 = 1;

/// Sample register (read-only), raw 8-bit unsigned.
pub const REG_DATA: u8 = 2;

/// Number of addressable registers.
pub const REGISTER_COUNT: usize = 3;

const_assert!(REG_DATA as usize + 1 == REGISTER_COUNT);

/// Value the identity register must report for the device to be bound.
pub const I2CSENS_ID: u8 = 0x5A;

/// Driver name used for match tables and logging.
pub const DRIVER_NAME: &str = "i2csensdrv";

/// Name of the attribute group exposed for each bound device.
pub const ATTR_GROUP_NAME: &str = "i2csens";

/// Device-tree compatible string matched by the driver.
pub const OF_COMPATIBLE: &str = "mistra,i2csens";

/// Bus device id matched by the driver.
pub const I2C_DEVICE_ID: &str = "i2csens";

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/i2csens/i2csens.toml";

/// Default device instance name (`<adapter>-<address>` as the bus names it).
pub const DEFAULT_DEVICE_NAME: &str = "0-0048";
