// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting card events.

use tokio::sync::broadcast;

use super::CardEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Event bus for broadcasting card events to multiple subscribers.
///
/// Each subscriber gets its own copy of each event. Payloads are `Arc`s, so
/// copies are cheap and subscribers can compare them with `Arc::ptr_eq`.
///
/// # Capacity
///
/// The bus has a fixed capacity (default 64). A subscriber that falls behind
/// loses the oldest events and receives `RecvError::Lagged`; since every
/// event carries the complete derived state, catching up on the latest one
/// is enough.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CardEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to card events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CardEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to every current subscriber.
    ///
    /// Returns how many subscribers received it. An event published while
    /// nobody listens is dropped.
    pub fn publish(&self, event: CardEvent) -> usize {
        let card_id = event.card_id();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(card = %card_id.short(), delivered, "Published card event");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CardId;
    use crate::layout::Layout;
    use tokio::sync::broadcast::error::TryRecvError;

    fn layout_event(card_id: CardId, layout: Layout) -> CardEvent {
        CardEvent::layout_changed(card_id, layout)
    }

    #[test]
    fn subscriber_count_follows_receivers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let first = bus.subscribe();
        let _second = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn every_renderer_sees_the_event() {
        let bus = EventBus::default();
        let mut header = bus.subscribe();
        let mut list = bus.subscribe();

        let card_id = CardId::new();
        assert_eq!(bus.publish(layout_event(card_id, Layout::Compact)), 2);

        assert_eq!(header.recv().await.unwrap().card_id(), card_id);
        assert_eq!(list.recv().await.unwrap().card_id(), card_id);
    }

    #[test]
    fn publish_reports_delivery_count() {
        let bus = EventBus::new();
        let event = layout_event(CardId::new(), Layout::Full);
        assert_eq!(bus.publish(event.clone()), 0);

        let _rx = bus.subscribe();
        assert_eq!(bus.publish(event), 1);
    }

    #[test]
    fn slow_subscriber_lags_then_catches_up() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();
        let card_id = CardId::new();

        for layout in [Layout::Compact, Layout::Full, Layout::Compact] {
            bus.publish(layout_event(card_id, layout));
        }

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(1))));
        let latest = std::iter::from_fn(|| rx.try_recv().ok()).last().unwrap();
        assert!(matches!(
            latest,
            CardEvent::LayoutChanged {
                layout: Layout::Compact,
                ..
            }
        ));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
