// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet health card.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::event::{CardEvent, CardId, EventBus};
use crate::health::{HealthFilter, HealthPartitions, categorize};
use crate::reconcile::{Reconciled, reconcile_with_outcome};
use crate::snapshot::Snapshot;

use super::CardConfig;

/// Derived state of a health card.
pub struct HealthCard {
    id: CardId,
    filter: HealthFilter,
    title: Option<String>,
    health_tx: watch::Sender<Option<Arc<HealthPartitions>>>,
    events: Option<EventBus>,
}

impl HealthCard {
    /// Creates a health card with the given filter.
    #[must_use]
    pub fn new(filter: HealthFilter) -> Self {
        let (health_tx, _) = watch::channel(None);
        Self {
            id: CardId::new(),
            filter,
            title: None,
            health_tx,
            events: None,
        }
    }

    /// Creates a health card from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn from_config(config: &CardConfig) -> Result<Self> {
        config.validate()?;
        let mut card = Self::new(config.filter.clone());
        card.title.clone_from(&config.title);
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

    /// Returns the filter.
    #[must_use]
    pub fn filter(&self) -> &HealthFilter {
        &self.filter
    }

    /// Returns the configured title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the network controller of the last published partitions.
    ///
    /// `None` when there was no controller or more than one.
    #[must_use]
    pub fn controller(&self) -> Option<String> {
        self.health_tx
            .borrow()
            .as_ref()
            .and_then(|health| health.controller.clone())
    }

    /// Returns the last published partitions.
    #[must_use]
    pub fn health(&self) -> Option<Arc<HealthPartitions>> {
        self.health_tx.borrow().clone()
    }

    /// Returns a receiver that observes every published partition set.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Arc<HealthPartitions>>> {
        self.health_tx.subscribe()
    }

    /// Re-derives the partitions from `snapshot`.
    ///
    /// Returns `true` if the published partitions, including the selected
    /// controller, were replaced.
    pub fn recompute(&mut self, snapshot: &Snapshot) -> bool {
        let candidate = categorize(snapshot, &self.filter);
        let previous = self.health_tx.borrow().clone();

        let Reconciled::Changed(health) = reconcile_with_outcome(previous.as_ref(), candidate)
        else {
            tracing::trace!(card = %self.id.short(), "Health unchanged");
            return false;
        };

        self.health_tx.send_replace(Some(Arc::clone(&health)));
        if let Some(events) = &self.events {
            events.publish(CardEvent::health_changed(self.id, health));
        }
        true
    }
}

impl std::fmt::Debug for HealthCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCard")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Device, Entity, Value};

    fn snapshot(lamp_status: &str) -> Snapshot {
        Snapshot::new()
            .with_device(Device::new("hub"))
            .with_entity(Entity::new("sensor.hub_status", "hub").with_translation_key("controller_status"))
            .with_value(Value::new("sensor.hub_status", "ready"))
            .with_device(Device::new("lamp"))
            .with_entity(Entity::new("sensor.lamp_node_status", "lamp"))
            .with_value(Value::new("sensor.lamp_node_status", lamp_status))
    }

    #[test]
    fn recompute_reconciles() {
        let mut card = HealthCard::new(HealthFilter::default());
        assert!(card.recompute(&snapshot("alive")));
        let first = card.health().unwrap();
        assert_eq!(first.live[0].device_id, "lamp");

        assert!(!card.recompute(&snapshot("alive")));
        assert!(Arc::ptr_eq(&first, &card.health().unwrap()));

        assert!(card.recompute(&snapshot("asleep")));
        assert_eq!(card.health().unwrap().asleep[0].device_id, "lamp");
    }

    #[test]
    fn tracks_controller() {
        let mut card = HealthCard::new(HealthFilter::default());
        card.recompute(&snapshot("alive"));
        assert_eq!(card.controller().as_deref(), Some("hub"));

        card.recompute(&Snapshot::new());
        assert_eq!(card.controller(), None);
    }

    #[test]
    fn controller_change_alone_is_published() {
        let lamp = Snapshot::new()
            .with_device(Device::new("lamp").with_label("zwave"))
            .with_entity(Entity::new("sensor.lamp_node_status", "lamp"))
            .with_value(Value::new("sensor.lamp_node_status", "alive"))
            .with_device(Device::new("hub"));
        let with_hub = lamp.clone().with_entity(
            Entity::new("sensor.hub_status", "hub").with_translation_key("controller_status"),
        );

        let mut card = HealthCard::new(HealthFilter::new().with_label("zwave"));
        let mut rx = card.watch();
        card.recompute(&lamp);
        rx.mark_unchanged();
        let before = card.health().unwrap();

        assert!(card.recompute(&with_hub));
        assert!(rx.has_changed().unwrap());
        let after = rx.borrow_and_update().clone().unwrap();
        assert_eq!(after.live, before.live);
        assert_eq!(after.controller.as_deref(), Some("hub"));
        assert_eq!(card.controller().as_deref(), Some("hub"));
    }

    #[test]
    fn from_config_applies_filter() {
        let config = CardConfig::health()
            .with_title("Z-Wave")
            .with_filter(HealthFilter::new().hide_dead());
        let mut card = HealthCard::from_config(&config).unwrap();
        assert_eq!(card.title(), Some("Z-Wave"));

        card.recompute(&snapshot("alive"));
        assert!(card.health().unwrap().dead.is_empty());
    }

    #[tokio::test]
    async fn publishes_health_changed() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let mut card = HealthCard::new(HealthFilter::default()).with_event_bus(bus);

        card.recompute(&snapshot("alive"));
        card.recompute(&snapshot("alive"));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, CardEvent::HealthChanged { ref health, .. } if health.live.len() == 1));
        assert!(rx.try_recv().is_err());
    }
}
