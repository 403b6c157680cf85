// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The derived per-device bundle.

use serde::Serialize;

use crate::layout::Layout;
use crate::reconcile::StructuralEq;
use crate::snapshot::Value;

/// Semantically labeled view of one device's values.
///
/// A bundle is built fresh for every classification and is never mutated
/// afterwards; cards publish it behind an `Arc` and replace it wholesale
/// when a new snapshot produces a different one.
///
/// `name` is `None` when the device was not present in the snapshot, which
/// is how a "device not found" condition reaches the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceBundle {
    /// Identifier of the classified device.
    pub device_id: String,
    /// Display name of the device.
    pub name: Option<String>,
    /// Manufacturer of the device.
    pub manufacturer: Option<String>,
    /// Model of the device.
    pub model: Option<String>,

    /// Firmware indicator.
    pub firmware: Option<Value>,
    /// Last-seen reading.
    pub last_seen: Option<Value>,
    /// Node status reading (`alive`, `asleep`, `dead`, ...).
    pub node_status: Option<Value>,
    /// Battery level.
    pub battery: Option<Value>,

    /// Values matched by the profile's named suffixes.
    pub sensors: Vec<Value>,
    /// Cumulative or sampled readings (power, energy, events).
    pub statistics: Vec<Value>,
    /// Everything else.
    pub entities: Vec<Value>,

    /// Whether the device acts as the network controller.
    pub is_controller: bool,
}

impl DeviceBundle {
    /// Creates an empty bundle for `device_id`.
    #[must_use]
    pub fn empty(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if the device was present in the snapshot.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.name.is_some()
    }

    /// Returns `true` if no value was classified into the bundle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.firmware.is_none()
            && self.last_seen.is_none()
            && self.node_status.is_none()
            && self.battery.is_none()
            && self.sensors.is_empty()
            && self.statistics.is_empty()
            && self.entities.is_empty()
    }

    /// Returns the total number of classified values.
    #[must_use]
    pub fn value_count(&self) -> usize {
        [
            &self.firmware,
            &self.last_seen,
            &self.node_status,
            &self.battery,
        ]
        .iter()
        .filter(|slot| slot.is_some())
        .count()
            + self.sensors.len()
            + self.statistics.len()
            + self.entities.len()
    }

    /// Returns the sensors to list for the given layout.
    ///
    /// In compact mode the node status and last-seen readings have no header
    /// room, so they are appended after the named sensors.
    #[must_use]
    pub fn sensors_for_layout(&self, layout: Layout) -> Vec<&Value> {
        let mut sensors: Vec<&Value> = self.sensors.iter().collect();
        if layout.is_compact() {
            sensors.extend(self.node_status.iter());
            sensors.extend(self.last_seen.iter());
        }
        sensors
    }
}

impl StructuralEq for DeviceBundle {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.device_id == other.device_id
            && self.name == other.name
            && self.manufacturer == other.manufacturer
            && self.model == other.model
            && self.is_controller == other.is_controller
            && self.firmware.structurally_eq(&other.firmware)
            && self.last_seen.structurally_eq(&other.last_seen)
            && self.node_status.structurally_eq(&other.node_status)
            && self.battery.structurally_eq(&other.battery)
            && self.sensors.structurally_eq(&other.sensors)
            && self.statistics.structurally_eq(&other.statistics)
            && self.entities.structurally_eq(&other.entities)
    }
}
