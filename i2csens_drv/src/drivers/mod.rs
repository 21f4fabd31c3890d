//! Bus transports the driver can be bound over.
//!
//! - [`simulation`] - Software register model for development and testing
//! - [`i2c_dev`] - Linux `/dev/i2c-N` adapter
//!
//! # Adding New Transports
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement `BusTransport` from `i2csens_common::hal::bus`
//! 3. Map its configuration in [`open_transport`]

pub mod i2c_dev;
pub mod simulation;

use i2csens_common::hal::bus::{BusError, DynBus};
use i2csens_common::hal::config::BusConfig;
use tracing::info;

pub use i2c_dev::I2cDevBus;
pub use simulation::SimulatedSensor;

/// Build the transport described by `config`.
///
/// # Errors
/// Returns `BusError` if a hardware transport cannot be opened.
pub fn open_transport(config: &BusConfig) -> Result<DynBus, BusError> {
    match config {
        BusConfig::Simulated(sim) => {
            info!(
                "Using simulated sensor (id={:#04x}, ctrl={:#04x}, data={})",
                sim.id, sim.ctrl, sim.data
            );
            Ok(Box::new(SimulatedSensor::new(*sim)))
        }
        BusConfig::I2cDev { path, address } => {
            info!("Using {} at address {:#04x}", path.display(), address);
            Ok(Box::new(I2cDevBus::open(path, *address)?))
        }
    }
}
