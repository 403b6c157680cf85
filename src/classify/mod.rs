// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity classification.
//!
//! The classifier scans the entities of one device and sorts their current
//! values into a [`DeviceBundle`]. Each value gets exactly one
//! [`EntityRole`], decided by a fixed-priority list of predicates:
//!
//! 1. [`EntityRole::Firmware`] - `_firmware` suffix or `firmware` device class
//! 2. [`EntityRole::LastSeen`] - `last_seen` key or `_last_seen` suffix
//! 3. [`EntityRole::NodeStatus`] - `node_status` key or `_node_status` suffix
//! 4. [`EntityRole::Battery`] - `battery` device class measured as `measurement`
//! 5. [`EntityRole::Named`] - one of the caller's suffixes
//! 6. [`EntityRole::Statistic`] - see [`is_statistic`]
//! 7. [`EntityRole::Generic`] - everything else
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::classify::classify;
//! use hubcard_lib::snapshot::{Device, Entity, Snapshot, Value};
//!
//! let snapshot = Snapshot::new()
//!     .with_device(Device::new("plug").with_name("Kitchen Plug"))
//!     .with_entity(Entity::new("sensor.plug_power", "plug"))
//!     .with_entity(Entity::new("update.plug_firmware", "plug"))
//!     .with_value(Value::new("sensor.plug_power", "40"))
//!     .with_value(Value::new("update.plug_firmware", "off"));
//!
//! let bundle = classify(&snapshot, "plug", &["sensor", "update"], &["_power"]);
//!
//! assert_eq!(bundle.firmware.unwrap().id, "update.plug_firmware");
//! assert_eq!(bundle.sensors[0].id, "sensor.plug_power");
//! ```

mod bundle;
mod controller;
mod heuristic;

use crate::profile::DeviceProfile;
use crate::snapshot::{Entity, Snapshot, Value};

pub use bundle::DeviceBundle;
pub use controller::{CONTROLLER_STATUS_KEY, controller_candidates, find_controller, is_controller};
pub use heuristic::is_statistic;

/// Identifier suffix of firmware indicators.
pub const FIRMWARE_SUFFIX: &str = "_firmware";
/// Device class of firmware indicators.
pub const FIRMWARE_DEVICE_CLASS: &str = "firmware";
/// Semantic key of last-seen readings.
pub const LAST_SEEN_KEY: &str = "last_seen";
/// Identifier suffix of last-seen readings.
pub const LAST_SEEN_SUFFIX: &str = "_last_seen";
/// Semantic key of node-status readings.
pub const NODE_STATUS_KEY: &str = "node_status";
/// Identifier suffix of node-status readings.
pub const NODE_STATUS_SUFFIX: &str = "_node_status";
/// Device class of battery readings.
pub const BATTERY_DEVICE_CLASS: &str = "battery";

/// The bucket a value is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRole {
    /// Firmware indicator.
    Firmware,
    /// Last-seen reading.
    LastSeen,
    /// Node status reading.
    NodeStatus,
    /// Battery level.
    Battery,
    /// Matched one of the profile's suffixes.
    Named,
    /// Cumulative or sampled reading.
    Statistic,
    /// Anything else.
    Generic,
}

/// Decides the role of one entity's value. First matching predicate wins.
///
/// Empty suffixes are ignored.
#[must_use]
pub fn role_of<S: AsRef<str>>(entity: &Entity, value: &Value, suffixes: &[S]) -> EntityRole {
    let id = entity.id.as_str();

    if id.ends_with(FIRMWARE_SUFFIX) || value.device_class() == Some(FIRMWARE_DEVICE_CLASS) {
        EntityRole::Firmware
    } else if entity.has_translation_key(LAST_SEEN_KEY) || id.ends_with(LAST_SEEN_SUFFIX) {
        EntityRole::LastSeen
    } else if entity.has_translation_key(NODE_STATUS_KEY) || id.ends_with(NODE_STATUS_SUFFIX) {
        EntityRole::NodeStatus
    } else if value.device_class() == Some(BATTERY_DEVICE_CLASS)
        && value.state_class() == Some("measurement")
    {
        EntityRole::Battery
    } else if suffixes
        .iter()
        .map(AsRef::<str>::as_ref)
        .any(|suffix| !suffix.is_empty() && id.ends_with(suffix))
    {
        EntityRole::Named
    } else if is_statistic(value) {
        EntityRole::Statistic
    } else {
        EntityRole::Generic
    }
}

/// Returns `true` if the entity's domain passes the allow-list.
///
/// An empty allow-list admits every entity.
fn domain_allowed<D: AsRef<str>>(entity: &Entity, allowed_domains: &[D]) -> bool {
    allowed_domains.is_empty()
        || entity
            .domain()
            .is_some_and(|domain| allowed_domains.iter().any(|d| d.as_ref() == domain))
}

/// Puts `value` into an empty slot, or hands it back if the slot is taken.
fn fill_slot(slot: &mut Option<Value>, value: Value) -> Option<Value> {
    if slot.is_none() {
        *slot = Some(value);
        None
    } else {
        Some(value)
    }
}

/// Classifies the values of `device_id` into a fresh [`DeviceBundle`].
///
/// - Only entities whose domain is in `allowed_domains` are considered (all
///   of them if the list is empty).
/// - Entities without a current value are skipped.
/// - When a singular slot (firmware, last-seen, node status, battery)
///   matches twice, the first value in snapshot order keeps the slot and the
///   later one goes to the generic bucket.
/// - An unknown device, or one without entities, yields a bundle with every
///   slot and list empty.
#[must_use]
pub fn classify<D, S>(
    snapshot: &Snapshot,
    device_id: &str,
    allowed_domains: &[D],
    suffixes: &[S],
) -> DeviceBundle
where
    D: AsRef<str>,
    S: AsRef<str>,
{
    let mut bundle = DeviceBundle::empty(device_id);

    if let Some(device) = snapshot.device(device_id) {
        bundle.name = Some(device.display_name().to_string());
        bundle.manufacturer.clone_from(&device.manufacturer);
        bundle.model.clone_from(&device.model);
    }

    for entity in snapshot
        .entities_of(device_id)
        .filter(|entity| domain_allowed(entity, allowed_domains))
    {
        if entity.has_translation_key(CONTROLLER_STATUS_KEY) {
            bundle.is_controller = true;
        }

        let Some(value) = snapshot.value(&entity.id) else {
            tracing::trace!(entity = %entity.id, "Skipping entity without value");
            continue;
        };

        let role = role_of(entity, value, suffixes);
        let value = value.clone();
        let leftover = match role {
            EntityRole::Firmware => fill_slot(&mut bundle.firmware, value),
            EntityRole::LastSeen => fill_slot(&mut bundle.last_seen, value),
            EntityRole::NodeStatus => fill_slot(&mut bundle.node_status, value),
            EntityRole::Battery => fill_slot(&mut bundle.battery, value),
            EntityRole::Named => {
                bundle.sensors.push(value);
                None
            }
            EntityRole::Statistic => {
                bundle.statistics.push(value);
                None
            }
            EntityRole::Generic => Some(value),
        };

        if let Some(value) = leftover {
            bundle.entities.push(value);
        }
    }

    tracing::debug!(
        device = %device_id,
        found = bundle.is_found(),
        sensors = bundle.sensors.len(),
        statistics = bundle.statistics.len(),
        entities = bundle.entities.len(),
        controller = bundle.is_controller,
        "Classified device"
    );

    bundle
}

/// Classifies `device_id` using a profile's domains and suffixes.
///
/// The profile's model string, when set, replaces the device-reported one.
#[must_use]
pub fn classify_with_profile(
    snapshot: &Snapshot,
    device_id: &str,
    profile: &DeviceProfile,
) -> DeviceBundle {
    let mut bundle = classify(snapshot, device_id, profile.domains(), profile.suffixes());
    if bundle.is_found()
        && let Some(model) = profile.model()
    {
        bundle.model = Some(model.to_string());
    }
    bundle
}
