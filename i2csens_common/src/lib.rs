//! i2csens Common Library
//!
//! This crate provides the types shared by the i2csens driver crate and its
//! tooling: the bus transport contract, the register-map description,
//! error enums, named register constants and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`consts`] - Register addresses, identity byte and match-table names
//! - [`hal`] - Bus transport trait, register-map configuration and errors
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use i2csens_common::consts::{I2CSENS_ID, REG_ID};
//! use i2csens_common::hal::config::I2CSENS_REGMAP_CONFIG;
//!
//! assert_eq!(I2CSENS_REGMAP_CONFIG.address_space_size(), 3);
//! assert!(!(I2CSENS_REGMAP_CONFIG.writeable_reg)(REG_ID));
//! assert_eq!(I2CSENS_ID, 0x5A);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
