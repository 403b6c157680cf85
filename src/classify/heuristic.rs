// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Statistic-vs-status heuristic.

use crate::snapshot::Value;

/// State classes that mark a cumulative or sampled reading.
const STATISTIC_STATE_CLASSES: [&str; 2] = ["measurement", "total_increasing"];

/// Device classes that stay on the card as status readings even when
/// they are measurements.
const CLIMATE_DEVICE_CLASSES: [&str; 2] = ["temperature", "humidity"];

/// Returns `true` if `value` belongs in the statistics bucket.
///
/// Rules, first match wins:
///
/// 1. `state_class` is `measurement` or `total_increasing`: a statistic,
///    unless the `device_class` is `temperature` or `humidity`;
/// 2. `device_class` is `heat`;
/// 3. the value lives in the `event` domain;
/// 4. anything else is a status entity.
///
/// # Examples
///
/// ```
/// use hubcard_lib::classify::is_statistic;
/// use hubcard_lib::snapshot::Value;
///
/// let power = Value::new("sensor.plug_power", "40")
///     .with_attribute("device_class", "power")
///     .with_attribute("state_class", "measurement");
/// let temperature = Value::new("sensor.hall_temperature", "21")
///     .with_attribute("device_class", "temperature")
///     .with_attribute("state_class", "measurement");
///
/// assert!(is_statistic(&power));
/// assert!(!is_statistic(&temperature));
/// ```
#[must_use]
pub fn is_statistic(value: &Value) -> bool {
    let device_class = value.device_class();

    if value
        .state_class()
        .is_some_and(|class| STATISTIC_STATE_CLASSES.contains(&class))
    {
        return !device_class.is_some_and(|class| CLIMATE_DEVICE_CLASSES.contains(&class));
    }

    if device_class == Some("heat") {
        return true;
    }

    value.domain() == Some("event")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: &str, device_class: Option<&str>, state_class: Option<&str>) -> Value {
        let mut value = Value::new(id, "1");
        if let Some(class) = device_class {
            value = value.with_attribute("device_class", class);
        }
        if let Some(class) = state_class {
            value = value.with_attribute("state_class", class);
        }
        value
    }

    #[test]
    fn power_measurement_is_statistic() {
        let value = reading("sensor.p", Some("power"), Some("measurement"));
        assert!(is_statistic(&value));
    }

    #[test]
    fn energy_total_increasing_is_statistic() {
        let value = reading("sensor.e", Some("energy"), Some("total_increasing"));
        assert!(is_statistic(&value));
    }

    #[test]
    fn measurement_without_device_class_is_statistic() {
        assert!(is_statistic(&reading("sensor.x", None, Some("measurement"))));
    }

    #[test]
    fn climate_measurements_stay_status() {
        for class in ["temperature", "humidity"] {
            for state_class in ["measurement", "total_increasing"] {
                let value = reading("sensor.c", Some(class), Some(state_class));
                assert!(!is_statistic(&value), "{class}/{state_class}");
            }
        }
    }

    #[test]
    fn heat_without_state_class_is_statistic() {
        assert!(is_statistic(&reading("sensor.h", Some("heat"), None)));
    }

    #[test]
    fn event_domain_is_statistic() {
        assert!(is_statistic(&reading("event.button_press", None, None)));
    }

    #[test]
    fn plain_status_is_not_statistic() {
        assert!(!is_statistic(&reading("sensor.s", None, None)));
        assert!(!is_statistic(&reading("sensor.s", Some("power"), Some("total"))));
        assert!(!is_statistic(&reading("binary_sensor.door", Some("door"), None)));
    }

    #[test]
    fn same_input_same_output() {
        let value = reading("sensor.p", Some("power"), Some("measurement"));
        assert_eq!(is_statistic(&value), is_statistic(&value.clone()));
    }
}
