// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records from the host registry.

use serde::{Deserialize, Serialize};

/// A physical unit tracked by the hub.
///
/// Devices are immutable for the lifetime of a snapshot. The host may
/// report both a factory `name` and a user-assigned `name_by_user`; the
/// latter wins in [`Device::display_name`].
///
/// # Examples
///
/// ```
/// use hubcard_lib::snapshot::Device;
///
/// let device = Device::new("kitchen_plug")
///     .with_name("Smart Plug")
///     .with_name_by_user("Kitchen Kettle")
///     .with_label("kitchen");
///
/// assert_eq!(device.display_name(), "Kitchen Kettle");
/// assert!(device.has_label("kitchen"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable device identifier.
    #[serde(default)]
    pub id: String,

    /// Name reported by the integration.
    #[serde(default)]
    pub name: Option<String>,

    /// Name assigned by the user, if any.
    #[serde(default)]
    pub name_by_user: Option<String>,

    /// Manufacturer string.
    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Model string.
    #[serde(default)]
    pub model: Option<String>,

    /// Labels attached to the device.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Device {
    /// Creates a device with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the integration-reported name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the user-assigned name.
    #[must_use]
    pub fn with_name_by_user(mut self, name: impl Into<String>) -> Self {
        self.name_by_user = Some(name.into());
        self
    }

    /// Sets the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Returns the name to show for this device.
    ///
    /// Prefers the user-assigned name, then the integration name, and falls
    /// back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name_by_user
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Returns `true` if the device carries the given label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}
