//! Prelude module for common re-exports.
//!
//! ```rust
//! use i2csens_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::hal::config::{
    BusConfig, CachePolicy, CtrlFlags, DeviceConfig, I2CSENS_REGMAP_CONFIG, RegmapConfig,
    SimulationConfig,
};

// ─── Register constants ─────────────────────────────────────────────
pub use crate::consts::{I2CSENS_ID, REG_CTRL, REG_DATA, REG_ID};

// ─── Bus & errors ───────────────────────────────────────────────────
pub use crate::hal::bus::{BusError, BusTransport, DynBus, Transfer};
pub use crate::hal::error::{AttrError, BindError, RegistrationError, RegmapError};
