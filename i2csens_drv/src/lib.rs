//! # i2csens Driver Library
//!
//! Driver for a byte-addressable I2C temperature sensor with three
//! registers (ID, CTRL, DATA). The driver validates the device identity on
//! binding and exposes two attributes: `enable` (rw) and `data` (ro,
//! milli-degrees Celsius).
//!
//! # Module Structure
//!
//! - [`regmap`] - Bounds- and permission-checked register access
//! - [`device`] - Bound device instance, per-device lock
//! - [`binding`] - Identity-checked bind and teardown
//! - [`attrs`] - `enable` / `data` attribute interface
//! - [`surface`] - Attribute namespace
//! - [`driver_registry`] - Driver match tables
//! - [`host`] - Discovery, teardown and attribute routing
//! - [`drivers`] - Bus transports (simulation, Linux i2c-dev)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         DeviceHost                               │
//! │  ┌────────────────┐    ┌──────────────┐    ┌──────────────────┐  │
//! │  │ AttrNamespace  │◄───│   bind()     │◄───│  DriverRegistry  │  │
//! │  │ enable / data  │    │  ID == 0x5A  │    │  match tables    │  │
//! │  └───────┬────────┘    └──────┬───────┘    └──────────────────┘  │
//! │          │                    │                                  │
//! │          ▼                    ▼                                  │
//! │   ┌─────────────┐     ┌────────────────┐     ┌───────────────┐   │
//! │   │  attrs      │────►│ I2cSens        │────►│ BusTransport  │   │
//! │   │ show/store  │     │ Mutex<Regmap>  │     │ (sim/i2c-dev) │   │
//! │   └─────────────┘     └────────────────┘     └───────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use i2csens_drv::attrs::{data_show, enable_store};
//! use i2csens_drv::binding::bind;
//! use i2csens_drv::drivers::SimulatedSensor;
//! use i2csens_drv::surface::AttrNamespace;
//! use i2csens_common::hal::config::SimulationConfig;
//!
//! let sensor = SimulatedSensor::new(SimulationConfig { data: 100, ..Default::default() });
//! let mut namespace = AttrNamespace::new();
//! let dev = bind("0-0048", sensor, &mut namespace).unwrap();
//!
//! enable_store(&dev, "1").unwrap();
//! assert_eq!(data_show(&dev).unwrap(), 50_000);
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod attrs;
pub mod binding;
pub mod device;
pub mod driver_registry;
pub mod drivers;
pub mod host;
pub mod regmap;
pub mod surface;

// Re-export key types for convenience
pub use crate::binding::{bind, unbind};
pub use crate::device::{BindState, I2cSens};
pub use crate::driver_registry::{DeviceDescriptor, DriverRegistry};
pub use crate::host::{DeviceHost, HostError};
pub use crate::regmap::Regmap;
