// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-device summary card.

use std::sync::Arc;

use tokio::sync::watch;

use crate::classify::{DeviceBundle, classify_with_profile};
use crate::error::Result;
use crate::event::{CardEvent, CardId, EventBus};
use crate::layout::{COMPACT_BREAKPOINT_PX, Layout, select_layout_with_breakpoint};
use crate::profile::{DeviceProfile, ProfileRegistry};
use crate::reconcile::{Reconciled, reconcile_with_outcome};
use crate::snapshot::{Snapshot, Value};

use super::CardConfig;

/// Derived state of one device card.
///
/// The card keeps the last published [`DeviceBundle`] behind an [`Arc`].
/// [`recompute`](Self::recompute) only swaps it when the new snapshot
/// changes something visible, so observers can compare pointers.
pub struct DeviceCard {
    id: CardId,
    device_id: String,
    profile: DeviceProfile,
    title: Option<String>,
    breakpoint_px: u32,
    layout: Layout,
    bundle_tx: watch::Sender<Option<Arc<DeviceBundle>>>,
    events: Option<EventBus>,
}

impl DeviceCard {
    /// Creates a card for `device_id` rendered with `profile`.
    #[must_use]
    pub fn new(device_id: impl Into<String>, profile: DeviceProfile) -> Self {
        let (bundle_tx, _) = watch::channel(None);
        Self {
            id: CardId::new(),
            device_id: device_id.into(),
            profile,
            title: None,
            breakpoint_px: COMPACT_BREAKPOINT_PX,
            layout: Layout::default(),
            bundle_tx,
            events: None,
        }
    }

    /// Creates a card from its configuration, resolving the profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid or names no device, and
    /// [`Error::UnknownProfile`](crate::Error::UnknownProfile) if the
    /// profile is not registered.
    pub fn from_config(config: &CardConfig, profiles: &ProfileRegistry) -> Result<Self> {
        config.validate()?;
        let device_id = config.require_device_id()?;
        let profile = profiles.resolve(&config.profile)?;

        let mut card = Self::new(device_id, profile);
        card.title.clone_from(&config.title);
        card.breakpoint_px = config.compact_breakpoint;
        Ok(card)
    }

    /// Publishes change events on `events`.
    #[must_use]
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the card identifier.
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Returns the device this card shows.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the device profile.
    #[must_use]
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Returns the title: the configured override, then the device name.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.title.clone().or_else(|| {
            self.bundle_tx
                .borrow()
                .as_ref()
                .and_then(|bundle| bundle.name.clone())
        })
    }

    /// Returns the last published bundle, if any snapshot has been seen.
    #[must_use]
    pub fn bundle(&self) -> Option<Arc<DeviceBundle>> {
        self.bundle_tx.borrow().clone()
    }

    /// Returns a receiver that observes every published bundle.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Arc<DeviceBundle>>> {
        self.bundle_tx.subscribe()
    }

    /// Returns `true` once a snapshot has been seen that lacks the device.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.bundle_tx
            .borrow()
            .as_ref()
            .is_some_and(|bundle| !bundle.is_found())
    }

    /// Returns the current layout.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Re-derives the bundle from `snapshot`.
    ///
    /// Returns `true` if the published bundle was replaced.
    pub fn recompute(&mut self, snapshot: &Snapshot) -> bool {
        let candidate = classify_with_profile(snapshot, &self.device_id, &self.profile);
        let previous = self.bundle_tx.borrow().clone();

        let Reconciled::Changed(bundle) = reconcile_with_outcome(previous.as_ref(), candidate)
        else {
            tracing::trace!(card = %self.id.short(), device = %self.device_id, "Bundle unchanged");
            return false;
        };

        if !bundle.is_found() {
            tracing::debug!(card = %self.id.short(), device = %self.device_id, "Device not in snapshot");
        }

        self.bundle_tx.send_replace(Some(Arc::clone(&bundle)));
        if let Some(events) = &self.events {
            events.publish(CardEvent::bundle_changed(self.id, bundle));
        }
        true
    }

    /// Applies a settled container width.
    ///
    /// Runs the layout selector with this card's breakpoint and hands the
    /// result to [`apply_layout`](Self::apply_layout). Returns `true` if the
    /// layout flipped.
    pub fn resize(&mut self, width_px: u32) -> bool {
        self.apply_layout(select_layout_with_breakpoint(width_px, self.breakpoint_px))
    }

    /// Applies a layout decided elsewhere, typically by a
    /// [`ResizeDebouncer`](crate::layout::ResizeDebouncer).
    ///
    /// Publishes [`CardEvent::LayoutChanged`] and returns `true` only when
    /// the layout differs from the current one.
    pub fn apply_layout(&mut self, layout: Layout) -> bool {
        if layout == self.layout {
            return false;
        }

        tracing::debug!(card = %self.id.short(), ?layout, "Layout changed");
        self.layout = layout;
        if let Some(events) = &self.events {
            events.publish(CardEvent::layout_changed(self.id, layout));
        }
        true
    }

    /// Returns the sensor rows for the current layout.
    #[must_use]
    pub fn sensors(&self) -> Vec<Value> {
        self.bundle_tx
            .borrow()
            .as_ref()
            .map(|bundle| {
                bundle
                    .sensors_for_layout(self.layout)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for DeviceCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCard")
            .field("id", &self.id)
            .field("device_id", &self.device_id)
            .field("profile", &self.profile.name())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
