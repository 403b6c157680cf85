// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Card front ends.
//!
//! A card owns its configuration and the last value it published. Feeding
//! it a fresh [`Snapshot`](crate::snapshot::Snapshot) re-derives that value
//! and replaces it only when something visible changed.
//!
//! - [`DeviceCard`] shows one device through a
//!   [`DeviceProfile`](crate::profile::DeviceProfile)
//! - [`HealthCard`] shows every node partitioned by liveness

mod config;
mod device_card;
mod health_card;

pub use config::CardConfig;
pub use device_card::DeviceCard;
pub use health_card::HealthCard;
