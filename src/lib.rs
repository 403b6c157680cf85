// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HubCard` Lib - state derivation for home-automation hub summary cards.
//!
//! The host hands this library a [`Snapshot`] of its device, entity and
//! value registries. The library turns it into the view models that a
//! summary card renders:
//!
//! - **Device bundles**: one device's values sorted into firmware, last
//!   seen, node status, battery, named sensors, statistics and the rest
//! - **Health partitions**: every node split into dead, live and asleep
//! - **Layout**: compact or full, from the debounced container width
//!
//! Derivation is synchronous and never fails. Re-deriving from an
//! unchanged snapshot hands back the previously published [`Arc`], so
//! consumers can skip work with a pointer comparison.
//!
//! [`Arc`]: std::sync::Arc
//!
//! # Quick Start
//!
//! ## Device Card
//!
//! ```
//! use hubcard_lib::{CardConfig, DeviceCard, ProfileRegistry, Snapshot};
//!
//! # fn main() -> hubcard_lib::Result<()> {
//! let snapshot = Snapshot::from_json(r#"{
//!     "devices": { "plug": { "name": "Kettle Plug" } },
//!     "entities": { "sensor.plug_power": { "device_id": "plug" } },
//!     "values": { "sensor.plug_power": { "state": "1200" } }
//! }"#)?;
//!
//! let config = CardConfig::from_json(r#"{"device_id": "plug", "profile": "smart-plug"}"#)?;
//! let mut card = DeviceCard::from_config(&config, &ProfileRegistry::with_builtin())?;
//!
//! card.recompute(&snapshot);
//! assert_eq!(card.sensors()[0].state, "1200");
//!
//! // Nothing changed, nothing to re-render
//! assert!(!card.recompute(&snapshot));
//! # Ok(())
//! # }
//! ```
//!
//! ## Health Card
//!
//! ```
//! use hubcard_lib::{HealthFilter, Snapshot, categorize};
//! use hubcard_lib::snapshot::{Device, Entity, Value};
//!
//! let snapshot = Snapshot::new()
//!     .with_device(Device::new("lamp"))
//!     .with_entity(Entity::new("sensor.lamp_node_status", "lamp"))
//!     .with_value(Value::new("sensor.lamp_node_status", "asleep"));
//!
//! let health = categorize(&snapshot, &HealthFilter::new().hide_dead());
//! assert_eq!(health.asleep.len(), 1);
//! ```
//!
//! ## Change Events
//!
//! Cards publish [`CardEvent`]s on a shared [`EventBus`] whenever their
//! derived value or layout actually changes:
//!
//! ```
//! use hubcard_lib::{CardEvent, DeviceCard, DeviceProfile, EventBus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new();
//! let mut events = bus.subscribe();
//!
//! let mut card = DeviceCard::new("plug", DeviceProfile::smart_plug()).with_event_bus(bus);
//! card.resize(320);
//!
//! assert!(matches!(events.recv().await, Ok(CardEvent::LayoutChanged { .. })));
//! # }
//! ```

pub mod card;
pub mod classify;
pub mod error;
pub mod event;
pub mod health;
pub mod layout;
pub mod profile;
pub mod reconcile;
pub mod snapshot;
pub mod types;

pub use card::{CardConfig, DeviceCard, HealthCard};
pub use classify::{DeviceBundle, EntityRole, classify, classify_with_profile, find_controller, is_statistic};
pub use error::{ConfigError, Error, ParseError, Result};
pub use event::{CardEvent, CardId, EventBus};
pub use health::{HealthFilter, HealthPartitions, Liveness, NodeRecord, categorize};
pub use layout::{Layout, ResizeDebouncer, select_layout};
pub use profile::{DeviceProfile, DeviceProfileBuilder, ProfileRegistry};
pub use reconcile::{Reconciled, StructuralEq, reconcile};
pub use snapshot::{Device, Entity, Snapshot, Value};
pub use types::Timestamp;
