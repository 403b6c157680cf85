// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for published card state.
//!
//! Cards publish a [`CardEvent`] whenever reconciliation replaces their
//! derived state. The [`EventBus`] uses tokio's broadcast channel so that
//! several renderers can follow the same cards.
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::event::{CardEvent, CardId, EventBus};
//! use hubcard_lib::layout::Layout;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(CardEvent::layout_changed(CardId::new(), Layout::Compact));
//! assert!(rx.try_recv().is_ok());
//! ```

mod card_event;
mod card_id;
mod event_bus;

pub use card_event::CardEvent;
pub use card_id::CardId;
pub use event_bus::EventBus;
