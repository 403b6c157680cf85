// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Card configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParseError, Result};
use crate::health::HealthFilter;
use crate::layout::{COMPACT_BREAKPOINT_PX, DEFAULT_DEBOUNCE_WINDOW, ResizeDebouncer};

/// Configuration of one card, as written by the dashboard author.
///
/// Every field has a default, so a minimal configuration only names the
/// device.
///
/// # Examples
///
/// ```
/// use hubcard_lib::card::CardConfig;
///
/// // Parsed from the host
/// let config = CardConfig::from_json(r#"{"device_id": "plug", "profile": "smart-plug"}"#).unwrap();
/// assert_eq!(config.profile, "smart-plug");
///
/// // Built in code
/// let config = CardConfig::device("plug")
///     .with_profile("smart-plug")
///     .with_title("Kettle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Device shown by a device card. Not used by health cards.
    pub device_id: Option<String>,
    /// Name of the device profile.
    pub profile: String,
    /// Title override.
    pub title: Option<String>,
    /// Partition filters for health cards.
    #[serde(flatten)]
    pub filter: HealthFilter,
    /// Widths below this value render compact.
    pub compact_breakpoint: u32,
    /// Quiet window for resize coalescing, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            profile: "generic".to_string(),
            title: None,
            filter: HealthFilter::default(),
            compact_breakpoint: COMPACT_BREAKPOINT_PX,
            debounce_ms: u64::try_from(DEFAULT_DEBOUNCE_WINDOW.as_millis()).unwrap_or(100),
        }
    }
}

impl CardConfig {
    /// Creates a configuration for a device card.
    #[must_use]
    pub fn device(device_id: impl Into<String>) -> Self {
        Self {
            device_id: Some(device_id.into()),
            ..Self::default()
        }
    }

    /// Creates a configuration for a health card.
    #[must_use]
    pub fn health() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) for malformed JSON and
    /// [`Error::Config`](crate::Error::Config) for invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the device profile name.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the title override.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the health filter.
    #[must_use]
    pub fn with_filter(mut self, filter: HealthFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the compact breakpoint.
    #[must_use]
    pub fn with_compact_breakpoint(mut self, width_px: u32) -> Self {
        self.compact_breakpoint = width_px;
        self
    }

    /// Sets the resize debounce window.
    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Checks the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWidth`] for a zero breakpoint.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.compact_breakpoint == 0 {
            return Err(ConfigError::InvalidWidth(self.compact_breakpoint));
        }
        Ok(())
    }

    /// Returns the device identifier, which device cards require.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDeviceId`] if none is set or it is
    /// empty.
    pub fn require_device_id(&self) -> std::result::Result<&str, ConfigError> {
        self.device_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingDeviceId)
    }

    /// Returns the resize debounce window.
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Creates a resize debouncer matching this configuration.
    #[must_use]
    pub fn resize_debouncer(&self) -> ResizeDebouncer {
        ResizeDebouncer::new()
            .with_window(self.debounce_window())
            .with_breakpoint(self.compact_breakpoint)
    }
}
