//! Attribute interface of a bound sensor.
//!
//! | Attribute | Mode | Backing register |
//! |-----------|------|------------------|
//! | `enable`  | rw   | CTRL bit 0       |
//! | `data`    | ro   | DATA, in milli-degrees Celsius |
//!
//! Each get/set holds the device's register-map lock for its whole duration.

use crate::device::I2cSens;
use i2csens_common::consts::{REG_CTRL, REG_DATA};
use i2csens_common::hal::bus::BusTransport;
use i2csens_common::hal::config::CtrlFlags;
use i2csens_common::hal::error::AttrError;

/// Access mode of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMode {
    /// Get only
    ReadOnly,
    /// Get and set
    ReadWrite,
}

/// Named attributes of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Sensor enable flag
    Enable,
    /// Temperature sample
    Data,
}

impl Attribute {
    /// Name in the attribute namespace.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Enable => "enable",
            Attribute::Data => "data",
        }
    }

    /// Access mode.
    pub const fn mode(self) -> AttrMode {
        match self {
            Attribute::Enable => AttrMode::ReadWrite,
            Attribute::Data => AttrMode::ReadOnly,
        }
    }

    /// Look an attribute up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        I2CSENS_GROUP.attrs.iter().copied().find(|a| a.name() == name)
    }

    /// Current value as text: `"0"`/`"1"` for `enable`, an integer for `data`.
    pub fn show<B: BusTransport>(self, dev: &I2cSens<B>) -> Result<String, AttrError> {
        match self {
            Attribute::Enable => Ok(u8::from(enable_show(dev)?).to_string()),
            Attribute::Data => Ok(data_show(dev)?.to_string()),
        }
    }

    /// Apply a textual value. Returns the number of bytes consumed.
    pub fn store<B: BusTransport>(self, dev: &I2cSens<B>, buf: &str) -> Result<usize, AttrError> {
        match self {
            Attribute::Enable => enable_store(dev, buf),
            Attribute::Data => Err(AttrError::ReadOnly(self.name())),
        }
    }
}

/// A set of attributes exposed together for one device.
#[derive(Debug)]
pub struct AttributeGroup {
    /// Directory-like name of the group
    pub name: &'static str,
    /// Members, in exposure order
    pub attrs: &'static [Attribute],
}

/// Attribute group of the i2csens sensor.
pub static I2CSENS_GROUP: AttributeGroup = AttributeGroup {
    name: i2csens_common::consts::ATTR_GROUP_NAME,
    attrs: &[Attribute::Enable, Attribute::Data],
};

/// Read the enable flag (CTRL bit 0).
pub fn enable_show<B: BusTransport>(dev: &I2cSens<B>) -> Result<bool, AttrError> {
    let ctrl = dev.with_regmap(|map| map.read(REG_CTRL))?;
    Ok(CtrlFlags::from_bits_retain(ctrl).contains(CtrlFlags::ENABLE))
}

/// Set or clear the enable flag from text; any non-zero integer enables.
///
/// Reserved CTRL bits are read back and written unchanged, all in one
/// critical section.
pub fn enable_store<B: BusTransport>(dev: &I2cSens<B>, buf: &str) -> Result<usize, AttrError> {
    let enable = parse_int(buf).ok_or_else(|| AttrError::InvalidInput(buf.to_string()))? != 0;
    let value = if enable { CtrlFlags::ENABLE.bits() } else { 0 };

    dev.with_regmap(|map| map.update_bits(REG_CTRL, CtrlFlags::ENABLE.bits(), value))?;
    Ok(buf.len())
}

/// Read the temperature in milli-degrees Celsius.
pub fn data_show<B: BusTransport>(dev: &I2cSens<B>) -> Result<u32, AttrError> {
    let raw = dev.with_regmap(|map| map.read(REG_DATA))?;
    Ok(raw_to_millicelsius(raw))
}

/// Sensor transfer function: half a degree per LSB, truncated.
pub const fn raw_to_millicelsius(raw: u8) -> u32 {
    (raw as u32 * 1000) >> 1
}

/// Leading decimal integer of `buf`, as `sscanf("%d")` reads it.
///
/// Skips leading whitespace, accepts one sign, stops at the first non-digit.
fn parse_int(buf: &str) -> Option<i64> {
    let s = buf.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Only zero/non-zero matters; saturate instead of failing on overflow.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
