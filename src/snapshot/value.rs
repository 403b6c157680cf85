// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current entity values and their attributes.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::entity::domain_of;

/// Free-form attribute map attached to a value.
///
/// The host sends arbitrary JSON here. Accessors are provided for the keys
/// the classifier looks at; anything else is reachable through
/// [`Attributes::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, serde_json::Value>);

impl Attributes {
    /// Creates an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw attribute for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Returns the attribute for `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    /// Inserts an attribute, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The current reading of an entity.
///
/// # Examples
///
/// ```
/// use hubcard_lib::snapshot::Value;
///
/// let value = Value::new("sensor.plug_power", "12.5")
///     .with_attribute("device_class", "power")
///     .with_attribute("state_class", "measurement");
///
/// assert_eq!(value.device_class(), Some("power"));
/// assert_eq!(value.domain(), Some("sensor"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// Identifier of the entity this value belongs to.
    #[serde(default, alias = "entity_id")]
    pub id: String,

    /// Raw state string as reported by the host.
    #[serde(default)]
    pub state: String,

    /// Attribute map.
    #[serde(default)]
    pub attributes: Attributes,
}

impl Value {
    /// Creates a value without attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: state.into(),
            attributes: Attributes::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Returns the domain prefix of the identifier.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        domain_of(&self.id)
    }

    /// Returns the `device_class` attribute.
    #[must_use]
    pub fn device_class(&self) -> Option<&str> {
        self.attributes.get_str("device_class")
    }

    /// Returns the `state_class` attribute.
    #[must_use]
    pub fn state_class(&self) -> Option<&str> {
        self.attributes.get_str("state_class")
    }

    /// Returns the `friendly_name` attribute.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes.get_str("friendly_name")
    }

    /// Returns the `unit_of_measurement` attribute.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.attributes.get_str("unit_of_measurement")
    }
}
