// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet-wide node health.
//!
//! [`categorize`] sorts every device of a snapshot into one of three
//! partitions:
//!
//! - **dead**: status absent, or anything other than `alive`/`asleep`
//! - **live**: status `alive`, most recently seen first
//! - **asleep**: status `asleep`, most recently seen first
//!
//! Nodes without a usable last-seen timestamp sort after those with one and
//! keep their snapshot order among themselves. The dead partition keeps
//! snapshot order.
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::health::{HealthFilter, categorize};
//! use hubcard_lib::snapshot::{Device, Entity, Snapshot, Value};
//!
//! let snapshot = Snapshot::new()
//!     .with_device(Device::new("lamp"))
//!     .with_entity(Entity::new("sensor.lamp_node_status", "lamp"))
//!     .with_value(Value::new("sensor.lamp_node_status", "alive"))
//!     .with_device(Device::new("siren"));
//!
//! let health = categorize(&snapshot, &HealthFilter::default());
//! assert_eq!(health.live[0].device_id, "lamp");
//! assert_eq!(health.dead[0].device_id, "siren");
//! ```

mod node;

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::classify::controller_candidates;
use crate::reconcile::StructuralEq;
use crate::snapshot::Snapshot;

pub use node::{Liveness, NodeRecord, STATUS_ALIVE, STATUS_ASLEEP};

/// Post-partition filters applied by [`categorize`].
///
/// Hiding a partition empties it without touching the others. The label
/// filter narrows the considered devices before partitioning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct HealthFilter {
    /// Drop the dead partition.
    #[serde(default)]
    pub hide_dead: bool,
    /// Drop the live partition.
    #[serde(default)]
    pub hide_live: bool,
    /// Drop the asleep partition.
    #[serde(default)]
    pub hide_asleep: bool,
    /// Only consider devices carrying this label.
    #[serde(default)]
    pub label: Option<String>,
}

impl HealthFilter {
    /// Creates a filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the dead partition.
    #[must_use]
    pub fn hide_dead(mut self) -> Self {
        self.hide_dead = true;
        self
    }

    /// Drops the live partition.
    #[must_use]
    pub fn hide_live(mut self) -> Self {
        self.hide_live = true;
        self
    }

    /// Drops the asleep partition.
    #[must_use]
    pub fn hide_asleep(mut self) -> Self {
        self.hide_asleep = true;
        self
    }

    /// Restricts categorization to devices carrying `label`.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns `true` if this filter hides the given partition.
    #[must_use]
    pub fn hides(&self, liveness: Liveness) -> bool {
        match liveness {
            Liveness::Dead => self.hide_dead,
            Liveness::Live => self.hide_live,
            Liveness::Asleep => self.hide_asleep,
        }
    }
}

/// Per-partition node counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthCounts {
    /// Number of dead nodes.
    pub dead: usize,
    /// Number of live nodes.
    pub live: usize,
    /// Number of sleeping nodes.
    pub asleep: usize,
}

/// Nodes partitioned by liveness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthPartitions {
    /// Dead or unknown nodes, in snapshot order.
    pub dead: Vec<NodeRecord>,
    /// Live nodes, most recently seen first.
    pub live: Vec<NodeRecord>,
    /// Sleeping nodes, most recently seen first.
    pub asleep: Vec<NodeRecord>,
    /// Network controller, when exactly one device in the snapshot is one.
    ///
    /// Not affected by the label or hide filters.
    pub controller: Option<String>,
}

impl HealthPartitions {
    /// Returns the partition for a liveness bucket.
    #[must_use]
    pub fn partition(&self, liveness: Liveness) -> &[NodeRecord] {
        match liveness {
            Liveness::Dead => &self.dead,
            Liveness::Live => &self.live,
            Liveness::Asleep => &self.asleep,
        }
    }

    /// Returns the total number of nodes across partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dead.len() + self.live.len() + self.asleep.len()
    }

    /// Returns `true` if every partition is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the per-partition counts.
    #[must_use]
    pub fn counts(&self) -> HealthCounts {
        HealthCounts {
            dead: self.dead.len(),
            live: self.live.len(),
            asleep: self.asleep.len(),
        }
    }

    /// Finds a node and the partition it landed in.
    #[must_use]
    pub fn find(&self, device_id: &str) -> Option<(Liveness, &NodeRecord)> {
        [Liveness::Dead, Liveness::Live, Liveness::Asleep]
            .into_iter()
            .find_map(|liveness| {
                self.partition(liveness)
                    .iter()
                    .find(|record| record.device_id == device_id)
                    .map(|record| (liveness, record))
            })
    }
}

impl StructuralEq for HealthPartitions {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.dead.structurally_eq(&other.dead)
            && self.live.structurally_eq(&other.live)
            && self.asleep.structurally_eq(&other.asleep)
            && self.controller == other.controller
    }
}

/// Sorts most recent first; records without a timestamp go last, in their
/// original order.
fn sort_by_recency(records: &mut [NodeRecord]) {
    records.sort_by_key(|record| Reverse(record.last_seen_ms));
}

/// Partitions the devices of `snapshot` by liveness.
///
/// Without filters every considered device lands in exactly one partition.
#[must_use]
pub fn categorize(snapshot: &Snapshot, filter: &HealthFilter) -> HealthPartitions {
    let mut partitions = HealthPartitions::default();

    let devices = snapshot.devices.values().filter(|device| {
        filter
            .label
            .as_deref()
            .is_none_or(|label| device.has_label(label))
    });

    for device in devices {
        let record = NodeRecord::from_snapshot(snapshot, device);
        match record.liveness() {
            Liveness::Dead => partitions.dead.push(record),
            Liveness::Live => partitions.live.push(record),
            Liveness::Asleep => partitions.asleep.push(record),
        }
    }

    sort_by_recency(&mut partitions.live);
    sort_by_recency(&mut partitions.asleep);

    if let [controller] = controller_candidates(snapshot).as_slice() {
        partitions.controller = Some(controller.id.clone());
    }

    let counts = partitions.counts();
    tracing::debug!(
        dead = counts.dead,
        live = counts.live,
        asleep = counts.asleep,
        "Categorized nodes"
    );

    if filter.hide_dead {
        partitions.dead.clear();
    }
    if filter.hide_live {
        partitions.live.clear();
    }
    if filter.hide_asleep {
        partitions.asleep.clear();
    }

    partitions
}
