// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device health records.

use serde::{Deserialize, Serialize};

use crate::classify::{EntityRole, role_of};
use crate::reconcile::StructuralEq;
use crate::snapshot::{Device, Snapshot, Value};
use crate::types::Timestamp;

/// Status string of a responsive node.
pub const STATUS_ALIVE: &str = "alive";
/// Status string of a sleeping battery node.
pub const STATUS_ASLEEP: &str = "asleep";

/// Liveness bucket of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    /// Node answered recently.
    Live,
    /// Battery node in its sleep cycle.
    Asleep,
    /// Node failed, or its status is unknown.
    Dead,
}

impl Liveness {
    /// Maps a raw status string to a bucket.
    ///
    /// Only the exact strings `alive` and `asleep` count as healthy; an
    /// absent or unrecognized status (including `unknown`) is dead.
    #[must_use]
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some(STATUS_ALIVE) => Self::Live,
            Some(STATUS_ASLEEP) => Self::Asleep,
            _ => Self::Dead,
        }
    }
}

/// A device seen from the connectivity perspective.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Identifier of the device.
    pub device_id: String,
    /// Display name of the device.
    pub name: String,
    /// Node status value, if the device has one.
    pub status: Option<Value>,
    /// Last-seen value, if the device has one.
    pub last_seen: Option<Value>,
    /// Last-seen as Unix epoch milliseconds, when it parsed.
    pub last_seen_ms: Option<i64>,
}

impl NodeRecord {
    /// Builds the record of `device` from the snapshot.
    ///
    /// The first node-status and last-seen values of the device (in
    /// snapshot order) are used. A last-seen state that does not parse as a
    /// timestamp leaves `last_seen_ms` empty.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, device: &Device) -> Self {
        const NO_SUFFIXES: &[&str] = &[];

        let mut status = None;
        let mut last_seen = None;

        for entity in snapshot.entities_of(&device.id) {
            let Some(value) = snapshot.value(&entity.id) else {
                continue;
            };
            match role_of(entity, value, NO_SUFFIXES) {
                EntityRole::NodeStatus if status.is_none() => status = Some(value.clone()),
                EntityRole::LastSeen if last_seen.is_none() => last_seen = Some(value.clone()),
                _ => {}
            }
            if status.is_some() && last_seen.is_some() {
                break;
            }
        }

        let last_seen_ms = last_seen
            .as_ref()
            .and_then(|value| Timestamp::parse(&value.state))
            .map(|ts| ts.epoch_millis());

        if last_seen.is_some() && last_seen_ms.is_none() {
            tracing::trace!(device = %device.id, "Unparseable last-seen treated as unknown");
        }

        Self {
            device_id: device.id.clone(),
            name: device.display_name().to_string(),
            status,
            last_seen,
            last_seen_ms,
        }
    }

    /// Returns the raw status string.
    #[must_use]
    pub fn status_str(&self) -> Option<&str> {
        self.status.as_ref().map(|value| value.state.as_str())
    }

    /// Returns the liveness bucket of this node.
    #[must_use]
    pub fn liveness(&self) -> Liveness {
        Liveness::from_status(self.status_str())
    }

    /// Returns the parsed last-seen instant.
    #[must_use]
    pub fn last_seen_at(&self) -> Option<Timestamp> {
        self.last_seen_ms.and_then(Timestamp::from_epoch_millis)
    }
}

impl StructuralEq for NodeRecord {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.device_id == other.device_id
            && self.name == other.name
            && self.last_seen_ms == other.last_seen_ms
            && self.status.structurally_eq(&other.status)
            && self.last_seen.structurally_eq(&other.last_seen)
    }
}
