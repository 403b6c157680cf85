// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller detection.

use crate::error::{Error, Result};
use crate::snapshot::{Device, Snapshot};

/// Semantic key carried by the status entity of a network controller.
pub const CONTROLLER_STATUS_KEY: &str = "controller_status";

/// Returns `true` if any entity of `device_id` carries the controller-status
/// key.
///
/// Unlike the flag computed during classification, this check ignores any
/// domain allow-list.
#[must_use]
pub fn is_controller(snapshot: &Snapshot, device_id: &str) -> bool {
    snapshot
        .entities_of(device_id)
        .any(|entity| entity.has_translation_key(CONTROLLER_STATUS_KEY))
}

/// Returns every controller-capable device, in snapshot order.
#[must_use]
pub fn controller_candidates(snapshot: &Snapshot) -> Vec<&Device> {
    snapshot
        .devices
        .values()
        .filter(|device| is_controller(snapshot, &device.id))
        .collect()
}

/// Selects the single controller of the network.
///
/// # Errors
///
/// - [`Error::DeviceNotFound`] when no device carries a controller-status
///   entity.
/// - [`Error::AmbiguousSelection`] when more than one does.
///
/// # Examples
///
/// ```
/// use hubcard_lib::classify::{CONTROLLER_STATUS_KEY, find_controller};
/// use hubcard_lib::snapshot::{Device, Entity, Snapshot};
///
/// let snapshot = Snapshot::new()
///     .with_device(Device::new("stick").with_name("USB Stick"))
///     .with_entity(
///         Entity::new("sensor.stick_status", "stick").with_translation_key(CONTROLLER_STATUS_KEY),
///     );
///
/// assert_eq!(find_controller(&snapshot).unwrap().id, "stick");
/// ```
pub fn find_controller(snapshot: &Snapshot) -> Result<&Device> {
    let candidates = controller_candidates(snapshot);

    match candidates.as_slice() {
        [] => Err(Error::DeviceNotFound(CONTROLLER_STATUS_KEY.to_string())),
        [single] => Ok(*single),
        many => {
            tracing::warn!(count = many.len(), "Multiple controllers in snapshot");
            Err(Error::AmbiguousSelection {
                candidates: many.iter().map(|device| device.id.clone()).collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Entity;

    fn with_controller(snapshot: Snapshot, id: &str) -> Snapshot {
        snapshot.with_device(Device::new(id)).with_entity(
            Entity::new(format!("sensor.{id}_status"), id)
                .with_translation_key(CONTROLLER_STATUS_KEY),
        )
    }

    #[test]
    fn detects_controller_entity() {
        let snapshot = with_controller(Snapshot::new(), "hub")
            .with_device(Device::new("plug"))
            .with_entity(Entity::new("switch.plug", "plug"));

        assert!(is_controller(&snapshot, "hub"));
        assert!(!is_controller(&snapshot, "plug"));
        assert!(!is_controller(&snapshot, "missing"));
    }

    #[test]
    fn no_controller_is_not_found() {
        let snapshot = Snapshot::new().with_device(Device::new("plug"));
        assert!(matches!(
            find_controller(&snapshot),
            Err(Error::DeviceNotFound(_))
        ));
    }

    #[test]
    fn two_controllers_are_ambiguous() {
        let snapshot = with_controller(with_controller(Snapshot::new(), "hub_b"), "hub_a");

        match find_controller(&snapshot) {
            Err(Error::AmbiguousSelection { candidates }) => {
                assert_eq!(candidates, vec!["hub_a".to_string(), "hub_b".to_string()]);
            }
            other => panic!("Expected AmbiguousSelection, got {other:?}"),
        }
    }

    #[test]
    fn single_controller_is_selected() {
        let snapshot = with_controller(Snapshot::new(), "hub").with_device(Device::new("plug"));
        assert_eq!(find_controller(&snapshot).unwrap().id, "hub");
    }
}
