//! Hardware-facing contracts shared by the driver and its transports.
//!
//! - [`bus`] - Bus transport trait and transport errors
//! - [`config`] - Register-map configuration and device configuration file
//! - [`error`] - Register, binding, attribute and registration errors

pub mod bus;
pub mod config;
pub mod error;
