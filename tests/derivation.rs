// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the derivation functions over JSON snapshots.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use hubcard_lib::classify::{classify, find_controller, is_statistic};
use hubcard_lib::health::{HealthFilter, categorize};
use hubcard_lib::layout::{Layout, select_layout};
use hubcard_lib::reconcile::{StructuralEq, reconcile};
use hubcard_lib::snapshot::{Snapshot, Value};
use hubcard_lib::{Error, Timestamp};
use serde_json::json;

const DOMAINS: &[&str] = &["sensor", "switch", "update", "event"];
const NO_SUFFIXES: &[&str] = &[];

fn snapshot(value: &serde_json::Value) -> Snapshot {
    Snapshot::from_json(&value.to_string()).unwrap()
}

/// A node with an optional status and last-seen reading.
fn node(
    devices: &mut serde_json::Map<String, serde_json::Value>,
    entities: &mut serde_json::Map<String, serde_json::Value>,
    values: &mut serde_json::Map<String, serde_json::Value>,
    id: &str,
    status: Option<&str>,
    last_seen: Option<String>,
) {
    devices.insert(id.to_string(), json!({ "name": id }));
    if let Some(status) = status {
        let entity_id = format!("sensor.{id}_node_status");
        entities.insert(entity_id.clone(), json!({ "device_id": id }));
        values.insert(entity_id, json!({ "state": status }));
    }
    if let Some(seen) = last_seen {
        let entity_id = format!("sensor.{id}_last_seen");
        entities.insert(entity_id.clone(), json!({ "device_id": id }));
        values.insert(entity_id, json!({ "state": seen }));
    }
}

fn fleet(nodes: &[(&str, Option<&str>, Option<String>)]) -> Snapshot {
    let mut devices = serde_json::Map::new();
    let mut entities = serde_json::Map::new();
    let mut values = serde_json::Map::new();
    for (id, status, seen) in nodes {
        node(&mut devices, &mut entities, &mut values, id, *status, seen.clone());
    }
    snapshot(&json!({ "devices": devices, "entities": entities, "values": values }))
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn dead_node_without_last_seen() {
        let snapshot = fleet(&[("n1", Some("dead"), None)]);
        let health = categorize(&snapshot, &HealthFilter::default());

        assert_eq!(health.dead.len(), 1);
        assert_eq!(health.dead[0].device_id, "n1");
        assert!(health.dead[0].last_seen_ms.is_none());
        assert!(health.dead[0].last_seen.is_none());
    }

    #[test]
    fn live_nodes_order_by_recency() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let snapshot = fleet(&[
            ("a", Some("alive"), Some((now - Duration::hours(2)).to_rfc3339())),
            ("b", Some("alive"), Some(now.to_rfc3339())),
            ("c", Some("alive"), Some((now - Duration::hours(1)).to_rfc3339())),
        ]);

        let health = categorize(&snapshot, &HealthFilter::default());
        let order: Vec<_> = health.live.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(health.live[0].last_seen_ms, Some(now.timestamp_millis()));
    }

    #[test]
    fn climate_readings_are_not_statistics() {
        let temperature = Value::new("sensor.t", "21.5")
            .with_attribute("device_class", "temperature")
            .with_attribute("state_class", "measurement");
        let power = Value::new("sensor.p", "40")
            .with_attribute("device_class", "power")
            .with_attribute("state_class", "measurement");

        assert!(!is_statistic(&temperature));
        assert!(is_statistic(&power));
    }

    #[test]
    fn device_without_matching_entities_yields_empty_bundle() {
        let snapshot = snapshot(&json!({
            "devices": { "lonely": { "name": "Lonely" } },
            "entities": { "light.lonely": { "device_id": "lonely" } },
            "values": { "light.lonely": { "state": "on" } }
        }));

        let bundle = classify(&snapshot, "lonely", DOMAINS, NO_SUFFIXES);
        assert!(bundle.is_empty());
        assert!(bundle.firmware.is_none());
        assert!(bundle.last_seen.is_none());
        assert!(bundle.node_status.is_none());
        assert!(bundle.battery.is_none());
        assert!(!bundle.is_controller);
    }

    #[test]
    fn added_generic_entity_replaces_bundle() {
        let before = snapshot(&json!({
            "devices": { "plug": {} },
            "entities": { "switch.plug": { "device_id": "plug" } },
            "values": { "switch.plug": { "state": "on" } }
        }));
        let after = snapshot(&json!({
            "devices": { "plug": {} },
            "entities": {
                "switch.plug": { "device_id": "plug" },
                "switch.plug_led": { "device_id": "plug" }
            },
            "values": {
                "switch.plug": { "state": "on" },
                "switch.plug_led": { "state": "off" }
            }
        }));

        let previous = Arc::new(classify(&before, "plug", DOMAINS, NO_SUFFIXES));
        let candidate = classify(&after, "plug", DOMAINS, NO_SUFFIXES);
        let result = reconcile(Some(&previous), candidate);

        assert!(!Arc::ptr_eq(&previous, &result));
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn layout_threshold() {
        assert_eq!(select_layout(449), Layout::Compact);
        assert_eq!(select_layout(450), Layout::Full);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;

    fn mixed_fleet() -> Snapshot {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let statuses = [Some("alive"), Some("asleep"), Some("dead"), None, Some("unknown")];
        let nodes: Vec<(String, Option<&str>, Option<String>)> = (0_i64..40)
            .zip(statuses.iter().cycle())
            .map(|(i, status)| {
                let seen = match i % 4 {
                    0 => None,
                    1 => Some("not a date".to_string()),
                    _ => Some((base + Duration::minutes((i * 37) % 90)).to_rfc3339()),
                };
                (format!("node_{i:02}"), *status, seen)
            })
            .collect();
        let borrowed: Vec<_> = nodes
            .iter()
            .map(|(id, status, seen)| (id.as_str(), *status, seen.clone()))
            .collect();
        fleet(&borrowed)
    }

    #[test]
    fn partitions_cover_every_device_once() {
        let snapshot = mixed_fleet();
        let health = categorize(&snapshot, &HealthFilter::default());

        let mut ids: Vec<_> = health
            .dead
            .iter()
            .chain(&health.live)
            .chain(&health.asleep)
            .map(|r| r.device_id.clone())
            .collect();
        assert_eq!(ids.len(), snapshot.devices.len());
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), snapshot.devices.len());
    }

    #[test]
    fn live_and_asleep_sorted_descending_with_unknown_last() {
        let health = categorize(&mixed_fleet(), &HealthFilter::default());

        for partition in [&health.live, &health.asleep] {
            let stamps: Vec<_> = partition.iter().map(|r| r.last_seen_ms).collect();
            let first_unknown = stamps.iter().position(Option::is_none).unwrap_or(stamps.len());
            assert!(stamps[first_unknown..].iter().all(Option::is_none));
            assert!(stamps[..first_unknown].windows(2).all(|w| w[0] >= w[1]));

            let unknown_ids: Vec<_> = partition[first_unknown..]
                .iter()
                .map(|r| r.device_id.as_str())
                .collect();
            let mut sorted = unknown_ids.clone();
            sorted.sort_unstable();
            assert_eq!(unknown_ids, sorted, "unknown last-seen keeps snapshot order");
        }
    }

    #[test]
    fn classify_is_deterministic() {
        let snapshot = mixed_fleet();
        for id in snapshot.devices.keys() {
            let a = classify(&snapshot, id, DOMAINS, NO_SUFFIXES);
            let b = classify(&snapshot, id, DOMAINS, NO_SUFFIXES);
            assert_eq!(a, b);
            assert!(a.structurally_eq(&b));
        }
    }

    #[test]
    fn reconcile_keeps_equal_health() {
        let snapshot = mixed_fleet();
        let first = Arc::new(categorize(&snapshot, &HealthFilter::default()));
        let second = reconcile(Some(&first), categorize(&snapshot, &HealthFilter::default()));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn malformed_last_seen_is_unknown() {
        assert!(Timestamp::parse("not a date").is_none());
        let snapshot = fleet(&[("x", Some("alive"), Some("yesterday-ish".to_string()))]);
        let health = categorize(&snapshot, &HealthFilter::default());
        assert!(health.live[0].last_seen.is_some());
        assert!(health.live[0].last_seen_ms.is_none());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let snapshot = snapshot(&json!({}));
        assert!(snapshot.is_empty());
        assert!(categorize(&snapshot, &HealthFilter::default()).is_empty());
        assert!(classify(&snapshot, "any", DOMAINS, NO_SUFFIXES).is_empty());
    }
}

// ============================================================================
// Controller Selection
// ============================================================================

mod controller {
    use super::*;

    fn with_controllers(ids: &[&str]) -> Snapshot {
        let mut devices = serde_json::Map::new();
        let mut entities = serde_json::Map::new();
        let mut values = serde_json::Map::new();
        for id in ids {
            let entity_id = format!("sensor.{id}_status");
            devices.insert((*id).to_string(), json!({}));
            entities.insert(
                entity_id.clone(),
                json!({ "device_id": id, "translation_key": "controller_status" }),
            );
            values.insert(entity_id, json!({ "state": "ready" }));
        }
        snapshot(&json!({ "devices": devices, "entities": entities, "values": values }))
    }

    #[test]
    fn single_controller_found_and_flagged() {
        let snapshot = with_controllers(&["hub"]);
        assert_eq!(find_controller(&snapshot).unwrap().id, "hub");
        assert!(classify(&snapshot, "hub", DOMAINS, NO_SUFFIXES).is_controller);
    }

    #[test]
    fn no_controller_is_not_found() {
        let err = find_controller(&with_controllers(&[])).unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
    }

    #[test]
    fn several_controllers_are_ambiguous() {
        let err = find_controller(&with_controllers(&["hub_b", "hub_a"])).unwrap_err();
        match err {
            Error::AmbiguousSelection { candidates } => {
                assert_eq!(candidates, vec!["hub_a", "hub_b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
