// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device profiles.
//!
//! A [`DeviceProfile`] tells a device card what to look for: which entity
//! domains are in scope, which identifier suffixes mark the readings worth
//! listing as named sensors, and how to present the device (icon, model
//! string). Profiles are plain values; one generic card is parameterized by
//! a profile instead of having one card type per device model.
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::profile::{DeviceProfile, DeviceProfileBuilder};
//!
//! // Built-in preset
//! let plug = DeviceProfile::smart_plug();
//! assert!(plug.suffixes().iter().any(|s| s == "_power"));
//!
//! // Custom profile
//! let valve = DeviceProfileBuilder::new("water-valve")
//!     .icon("mdi:water-pump")
//!     .domain("sensor")
//!     .domain("valve")
//!     .suffix("_flow")
//!     .build()
//!     .unwrap();
//! assert_eq!(valve.name(), "water-valve");
//! ```

mod registry;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use registry::ProfileRegistry;

/// Domains a generic device card looks at.
const DEFAULT_DOMAINS: [&str; 9] = [
    "binary_sensor",
    "button",
    "event",
    "light",
    "number",
    "select",
    "sensor",
    "switch",
    "update",
];

/// Presentation and classification settings for one kind of device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Registry key of the profile.
    name: String,
    /// Icon shown in the card header.
    icon: String,
    /// Model string shown instead of the device-reported one.
    #[serde(default)]
    model: Option<String>,
    /// Entity domains in scope. Empty means every domain.
    #[serde(default)]
    domains: Vec<String>,
    /// Identifier suffixes of the named sensors, in display order.
    #[serde(default)]
    suffixes: Vec<String>,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::generic()
    }
}

impl DeviceProfile {
    fn preset(name: &str, icon: &str, extra_domains: &[&str], suffixes: &[&str]) -> Self {
        let mut domains: Vec<String> = DEFAULT_DOMAINS.iter().map(ToString::to_string).collect();
        domains.extend(extra_domains.iter().map(ToString::to_string));

        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            model: None,
            domains,
            suffixes: suffixes.iter().map(ToString::to_string).collect(),
        }
    }

    /// Profile for any device: default domains, no named sensors.
    #[must_use]
    pub fn generic() -> Self {
        Self::preset("generic", "mdi:devices", &[], &[])
    }

    /// Profile for metering smart plugs.
    ///
    /// - Named sensors: power, energy, voltage, current
    #[must_use]
    pub fn smart_plug() -> Self {
        Self::preset(
            "smart-plug",
            "mdi:power-socket-eu",
            &[],
            &["_power", "_energy", "_voltage", "_current"],
        )
    }

    /// Profile for thermostats and climate sensors.
    ///
    /// - Adds the `climate` domain
    /// - Named sensors: temperature, humidity
    #[must_use]
    pub fn thermostat() -> Self {
        Self::preset(
            "thermostat",
            "mdi:thermostat",
            &["climate"],
            &["_temperature", "_humidity"],
        )
    }

    /// Profile for door and window contacts.
    #[must_use]
    pub fn contact_sensor() -> Self {
        Self::preset(
            "contact-sensor",
            "mdi:door-sensor",
            &[],
            &["_door", "_window", "_tamper"],
        )
    }

    /// Profile for motion sensors.
    #[must_use]
    pub fn motion_sensor() -> Self {
        Self::preset(
            "motion-sensor",
            "mdi:motion-sensor",
            &[],
            &["_motion", "_illuminance"],
        )
    }

    /// Profile for the network controller.
    #[must_use]
    pub fn controller() -> Self {
        Self::preset("controller", "mdi:router-wireless", &[], &[])
    }

    /// Returns every built-in preset.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::generic(),
            Self::smart_plug(),
            Self::thermostat(),
            Self::contact_sensor(),
            Self::motion_sensor(),
            Self::controller(),
        ]
    }

    /// Returns the registry key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the header icon.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Returns the model override, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the entity domains in scope.
    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Returns the named-sensor suffixes.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Checks that the profile can be used for classification.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySuffix`] if a suffix is empty, since it
    /// would claim every entity as a named sensor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffixes.iter().any(String::is_empty) {
            return Err(ConfigError::EmptySuffix);
        }
        Ok(())
    }
}

/// Builder for custom device profiles.
#[derive(Debug)]
pub struct DeviceProfileBuilder {
    inner: DeviceProfile,
}

impl DeviceProfileBuilder {
    /// Starts a profile with no domains and no suffixes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: DeviceProfile {
                name: name.into(),
                icon: "mdi:devices".to_string(),
                model: None,
                domains: Vec::new(),
                suffixes: Vec::new(),
            },
        }
    }

    /// Starts from an existing profile under a new name.
    #[must_use]
    pub fn from_profile(name: impl Into<String>, base: &DeviceProfile) -> Self {
        let mut inner = base.clone();
        inner.name = name.into();
        Self { inner }
    }

    /// Sets the header icon.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.inner.icon = icon.into();
        self
    }

    /// Sets the model override.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = Some(model.into());
        self
    }

    /// Adds an entity domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        if !self.inner.domains.contains(&domain) {
            self.inner.domains.push(domain);
        }
        self
    }

    /// Adds a named-sensor suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.inner.suffixes.push(suffix.into());
        self
    }

    /// Builds the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySuffix`] if an empty suffix was added.
    pub fn build(self) -> Result<DeviceProfile, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
