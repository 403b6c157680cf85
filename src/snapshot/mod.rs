// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat snapshot of the host's device, entity and value registries.
//!
//! A [`Snapshot`] is what the host hands over on every update. It is never
//! mutated by the derivation code; every card recomputes from the latest
//! snapshot it was given.
//!
//! All three registries are ordered maps keyed by identifier, so iteration
//! order (and therefore every derived list) is deterministic.
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::snapshot::Snapshot;
//!
//! let json = r#"{
//!     "devices": {"plug": {"name": "Kitchen Plug"}},
//!     "entities": {"sensor.plug_power": {"device_id": "plug"}},
//!     "values": {"sensor.plug_power": {"state": "12.5"}}
//! }"#;
//!
//! let snapshot = Snapshot::from_json(json).unwrap();
//! assert_eq!(snapshot.device("plug").unwrap().display_name(), "Kitchen Plug");
//! assert_eq!(snapshot.value("sensor.plug_power").unwrap().state, "12.5");
//! ```

mod device;
mod entity;
mod value;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub use device::Device;
pub use entity::{Entity, EntityCategory, domain_of};
pub use value::{Attributes, Value};

/// Devices, entities and values as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Devices keyed by device identifier.
    #[serde(default)]
    pub devices: BTreeMap<String, Device>,

    /// Entities keyed by entity identifier.
    #[serde(default)]
    pub entities: BTreeMap<String, Entity>,

    /// Current values keyed by entity identifier.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from host JSON.
    ///
    /// Records whose `id` field is missing inherit the key they are stored
    /// under. A record that carries an identifier different from its key is
    /// rejected.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Json`] if the payload is not a valid snapshot.
    /// - [`ParseError::IdMismatch`] if a device, entity or value is stored
    ///   under a key other than its own identifier.
    /// - [`ParseError::MissingField`] for an entity with an empty
    ///   `device_id`.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let mut snapshot: Self = serde_json::from_str(json)?;

        align_ids(&mut snapshot.devices, |device| &mut device.id)?;
        align_ids(&mut snapshot.entities, |entity| &mut entity.id)?;
        align_ids(&mut snapshot.values, |value| &mut value.id)?;

        if let Some((key, _)) = snapshot
            .entities
            .iter()
            .find(|(_, entity)| entity.device_id.is_empty())
        {
            return Err(ParseError::MissingField(format!("entities.{key}.device_id")));
        }
        Ok(snapshot)
    }

    /// Adds a device, keyed by its identifier.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.insert_device(device);
        self
    }

    /// Adds an entity, keyed by its identifier.
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.insert_entity(entity);
        self
    }

    /// Adds a value, keyed by its identifier.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.insert_value(value);
        self
    }

    /// Inserts or replaces a device.
    pub fn insert_device(&mut self, device: Device) {
        self.devices.insert(device.id.clone(), device);
    }

    /// Inserts or replaces an entity.
    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Inserts or replaces a value.
    pub fn insert_value(&mut self, value: Value) {
        self.values.insert(value.id.clone(), value);
    }

    /// Looks up a device.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Looks up the current value of an entity.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// Iterates over the entities owned by `device_id`, in identifier order.
    pub fn entities_of<'a>(&'a self, device_id: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .values()
            .filter(move |entity| entity.device_id == device_id)
    }

    /// Returns `true` if the snapshot holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.entities.is_empty() && self.values.is_empty()
    }

    /// Checks the referential invariants of the snapshot.
    ///
    /// Derivation tolerates every issue reported here (orphans are simply
    /// skipped), so this is a diagnostic aid rather than a gate.
    #[must_use]
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();

        for entity in self.entities.values() {
            if !self.devices.contains_key(&entity.device_id) {
                issues.push(SnapshotIssue::EntityWithoutDevice {
                    entity_id: entity.id.clone(),
                    device_id: entity.device_id.clone(),
                });
            }
        }

        for value in self.values.values() {
            if !self.entities.contains_key(&value.id) {
                issues.push(SnapshotIssue::ValueWithoutEntity {
                    value_id: value.id.clone(),
                });
            }
        }

        if !issues.is_empty() {
            tracing::debug!(count = issues.len(), "Snapshot has dangling references");
        }

        issues
    }
}

/// A referential inconsistency found by [`Snapshot::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    /// An entity points at a device that is not in the snapshot.
    EntityWithoutDevice {
        /// The dangling entity.
        entity_id: String,
        /// The device it refers to.
        device_id: String,
    },

    /// A value exists for an identifier that is not a known entity.
    ValueWithoutEntity {
        /// The orphaned value identifier.
        value_id: String,
    },
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityWithoutDevice {
                entity_id,
                device_id,
            } => write!(f, "entity {entity_id} references unknown device {device_id}"),
            Self::ValueWithoutEntity { value_id } => {
                write!(f, "value {value_id} has no matching entity")
            }
        }
    }
}

/// Fills empty record identifiers from their map keys and rejects
/// identifiers that disagree with them.
fn align_ids<T>(
    records: &mut BTreeMap<String, T>,
    id_of: impl Fn(&mut T) -> &mut String,
) -> Result<(), ParseError> {
    for (key, record) in records.iter_mut() {
        let id = id_of(record);
        if id.is_empty() {
            id.clone_from(key);
        } else if id.as_str() != key.as_str() {
            return Err(ParseError::IdMismatch {
                key: key.clone(),
                id: id.clone(),
            });
        }
    }
    Ok(())
}
