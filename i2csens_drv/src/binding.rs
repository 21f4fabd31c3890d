//! Identity-checked device binding and teardown.
//!
//! `bind` runs once per discovered device:
//!
//! ```text
//! Unbound ──read(ID) == 0x5A──► Bound ──unbind──► (gone)
//!    │
//!    └──bus error / other ID──► Rejected
//! ```
//!
//! Failing to expose the attribute group does not reject the device: it is
//! logged and the device stays usable through its register map.

use crate::attrs::I2CSENS_GROUP;
use crate::device::I2cSens;
use crate::regmap::Regmap;
use crate::surface::AttributeSurface;
use i2csens_common::consts::{I2CSENS_ID, REG_ID};
use i2csens_common::hal::bus::BusTransport;
use i2csens_common::hal::config::I2CSENS_REGMAP_CONFIG;
use i2csens_common::hal::error::BindError;
use tracing::{debug, error, info, warn};

/// Validate the device behind `transport` and expose its attributes.
///
/// # Errors
/// - `BindError::Bus` if the ID register cannot be read
/// - `BindError::UnexpectedIdentity` if it does not hold [`I2CSENS_ID`]
///
/// No attribute group is created for a rejected device.
pub fn bind<B: BusTransport>(
    name: &str,
    transport: B,
    surface: &mut dyn AttributeSurface,
) -> Result<I2cSens<B>, BindError> {
    let mut regmap = Regmap::new(transport, &I2CSENS_REGMAP_CONFIG);

    let id = regmap.read(REG_ID).map_err(|e| {
        error!("{name}: error reading ID register: {e}");
        BindError::from(e)
    })?;

    if id != I2CSENS_ID {
        error!("{name}: unexpected ID {id:#04x}");
        return Err(BindError::UnexpectedIdentity {
            expected: I2CSENS_ID,
            found: id,
        });
    }
    debug!("{name}: ID {id:#04x} matches");

    let attrs_registered = match surface.create_group(name, &I2CSENS_GROUP) {
        Ok(()) => true,
        Err(e) => {
            warn!("{name}: cannot create attributes: {e}");
            false
        }
    };

    info!("{name}: bound (attributes {})", if attrs_registered { "exposed" } else { "absent" });
    Ok(I2cSens::new(name.to_string(), regmap, attrs_registered))
}

/// Remove the device's attributes and release its transport.
pub fn unbind<B: BusTransport>(device: I2cSens<B>, surface: &mut dyn AttributeSurface) -> B {
    if device.attrs_registered() {
        surface.remove_group(device.name(), &I2CSENS_GROUP);
    }
    info!("{}: unbound", device.name());
    device.into_bus()
}
