//! Attribute exposure surface.
//!
//! Binding hands the device's [`AttributeGroup`] to an [`AttributeSurface`],
//! which makes the attributes reachable by name. [`AttrNamespace`] is the
//! in-process implementation used by the host: one directory per device
//! instance, one entry per attribute.

use crate::attrs::{AttrMode, Attribute, AttributeGroup};
use i2csens_common::hal::error::RegistrationError;
use std::collections::HashMap;
use tracing::debug;

/// Something that can expose attribute groups by device name.
pub trait AttributeSurface {
    /// Expose `group` under `device`.
    ///
    /// # Errors
    /// Returns `RegistrationError` if the entries cannot be created.
    fn create_group(
        &mut self,
        device: &str,
        group: &'static AttributeGroup,
    ) -> Result<(), RegistrationError>;

    /// Remove a group previously created for `device`.
    fn remove_group(&mut self, device: &str, group: &'static AttributeGroup);
}

/// In-memory attribute namespace keyed by device name.
#[derive(Debug)]
pub struct AttrNamespace {
    groups: HashMap<String, &'static AttributeGroup>,
    available: bool,
}

impl AttrNamespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            available: true,
        }
    }

    /// A namespace that refuses every registration.
    pub fn unavailable() -> Self {
        Self {
            groups: HashMap::new(),
            available: false,
        }
    }

    /// Resolve `device/attr` to an exposed attribute.
    ///
    /// # Errors
    /// Returns `RegistrationError::NotFound` if the device has no such entry.
    pub fn lookup(&self, device: &str, attr: &str) -> Result<Attribute, RegistrationError> {
        self.groups
            .get(device)
            .and_then(|group| group.attrs.iter().copied().find(|a| a.name() == attr))
            .ok_or_else(|| RegistrationError::NotFound {
                device: device.to_string(),
                attr: attr.to_string(),
            })
    }

    /// Attribute names exposed for `device`, in group order.
    pub fn list(&self, device: &str) -> Vec<&'static str> {
        self.groups
            .get(device)
            .map(|group| group.attrs.iter().map(|a| a.name()).collect())
            .unwrap_or_default()
    }

    /// `ls -l` style listing of `device`'s entries, e.g. `rw enable`.
    pub fn describe(&self, device: &str) -> Vec<String> {
        self.groups
            .get(device)
            .map(|group| {
                group
                    .attrs
                    .iter()
                    .map(|a| {
                        let mode = match a.mode() {
                            AttrMode::ReadWrite => "rw",
                            AttrMode::ReadOnly => "r-",
                        };
                        format!("{mode} {}", a.name())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for AttrNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSurface for AttrNamespace {
    fn create_group(
        &mut self,
        device: &str,
        group: &'static AttributeGroup,
    ) -> Result<(), RegistrationError> {
        if !self.available {
            return Err(RegistrationError::Unavailable);
        }
        if self.groups.contains_key(device) {
            return Err(RegistrationError::AlreadyExists(device.to_string()));
        }
        self.groups.insert(device.to_string(), group);
        debug!("{device}: exposed attribute group '{}'", group.name);
        Ok(())
    }

    fn remove_group(&mut self, device: &str, group: &'static AttributeGroup) {
        if self.groups.remove(device).is_some() {
            debug!("{device}: removed attribute group '{}'", group.name);
        }
    }
}
