// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity registry records.

use serde::{Deserialize, Serialize};

/// Registry category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    /// A configuration parameter of the device.
    Config,
    /// A diagnostic reading (signal strength, firmware, node status, ...).
    Diagnostic,
}

/// An individually addressable capability or reading of a device.
///
/// Identifiers follow the host convention `<domain>.<object_id>`, e.g.
/// `sensor.kitchen_plug_power`.
///
/// # Examples
///
/// ```
/// use hubcard_lib::snapshot::Entity;
///
/// let entity = Entity::new("sensor.kitchen_plug_node_status", "kitchen_plug")
///     .with_translation_key("node_status");
///
/// assert_eq!(entity.domain(), Some("sensor"));
/// assert!(entity.has_translation_key("node_status"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity identifier.
    #[serde(default, alias = "entity_id")]
    pub id: String,

    /// Identifier of the owning device.
    pub device_id: String,

    /// Registry category, if any.
    #[serde(default, alias = "category")]
    pub entity_category: Option<EntityCategory>,

    /// Semantic key assigned by the integration.
    #[serde(default)]
    pub translation_key: Option<String>,
}

impl Entity {
    /// Creates an entity owned by `device_id`.
    #[must_use]
    pub fn new(id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device_id: device_id.into(),
            entity_category: None,
            translation_key: None,
        }
    }

    /// Sets the registry category.
    #[must_use]
    pub fn with_category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    /// Sets the semantic key.
    #[must_use]
    pub fn with_translation_key(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }

    /// Returns the domain prefix of the identifier.
    ///
    /// Returns `None` when the identifier has no `.` separator.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        domain_of(&self.id)
    }

    /// Returns `true` if the semantic key equals `key`.
    #[must_use]
    pub fn has_translation_key(&self, key: &str) -> bool {
        self.translation_key.as_deref() == Some(key)
    }
}

/// Extracts the `<domain>` part of an `<domain>.<object_id>` identifier.
#[must_use]
pub fn domain_of(id: &str) -> Option<&str> {
    id.split_once('.')
        .map(|(domain, _)| domain)
        .filter(|domain| !domain.is_empty())
}
