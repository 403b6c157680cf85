// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Card event types.

use std::sync::Arc;

use serde::Serialize;

use crate::classify::DeviceBundle;
use crate::health::HealthPartitions;
use crate::layout::Layout;

use super::CardId;

/// Events published by cards when their derived state changes.
///
/// Events are only emitted when reconciliation replaced the published value,
/// so a subscriber can re-render unconditionally on every event.
///
/// Events serialize as JSON objects tagged with `"type"` for hosts that
/// forward them to a renderer in another process.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEvent {
    /// A device card published a new bundle.
    BundleChanged {
        /// The card that produced the bundle.
        card_id: CardId,
        /// The new bundle.
        bundle: Arc<DeviceBundle>,
    },

    /// A health card published new partitions.
    HealthChanged {
        /// The card that produced the partitions.
        card_id: CardId,
        /// The new partitions.
        health: Arc<HealthPartitions>,
    },

    /// A card switched layout after a resize.
    LayoutChanged {
        /// The resized card.
        card_id: CardId,
        /// The new layout.
        layout: Layout,
    },
}

impl CardEvent {
    /// Returns the card associated with this event.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        match self {
            Self::BundleChanged { card_id, .. }
            | Self::HealthChanged { card_id, .. }
            | Self::LayoutChanged { card_id, .. } => *card_id,
        }
    }

    /// Returns `true` if this event carries derived data.
    #[must_use]
    pub fn is_data_change(&self) -> bool {
        matches!(self, Self::BundleChanged { .. } | Self::HealthChanged { .. })
    }

    /// Creates a bundle changed event.
    #[must_use]
    pub fn bundle_changed(card_id: CardId, bundle: Arc<DeviceBundle>) -> Self {
        Self::BundleChanged { card_id, bundle }
    }

    /// Creates a health changed event.
    #[must_use]
    pub fn health_changed(card_id: CardId, health: Arc<HealthPartitions>) -> Self {
        Self::HealthChanged { card_id, health }
    }

    /// Creates a layout changed event.
    #[must_use]
    pub fn layout_changed(card_id: CardId, layout: Layout) -> Self {
        Self::LayoutChanged { card_id, layout }
    }
}
