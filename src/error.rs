// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `HubCard` library.
//!
//! Derivation itself never fails: classification and categorization degrade
//! to empty results on odd input. The errors below cover the operations that
//! must pick exactly one thing (a controller, a profile) and the parsing of
//! host-supplied JSON and card configuration.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Card configuration was rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Host input could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No device matched the selection.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// More than one device matched where exactly one was expected.
    #[error("ambiguous selection: {} candidates ({})", .candidates.len(), .candidates.join(", "))]
    AmbiguousSelection {
        /// Identifiers of every matching device, in snapshot order.
        candidates: Vec<String>,
    },

    /// The requested device profile is not registered.
    #[error("unknown device profile: {0}")]
    UnknownProfile(String),
}

/// Errors raised while parsing host input (snapshots, card configuration).
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the input.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A record's identifier disagrees with the key it is stored under.
    #[error("identifier mismatch: {key} holds a record for {id}")]
    IdMismatch {
        /// Map key the record was stored under.
        key: String,
        /// Identifier embedded in the record.
        id: String,
    },
}

/// Errors related to card configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A device card was configured without a device identifier.
    #[error("device card requires a device_id")]
    MissingDeviceId,

    /// The compact breakpoint must be a positive width.
    #[error("invalid compact breakpoint: {0}px")]
    InvalidWidth(u32),

    /// A profile suffix was empty and would match every entity.
    #[error("entity suffix must not be empty")]
    EmptySuffix,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_selection_display() {
        let err = Error::AmbiguousSelection {
            candidates: vec!["hub_a".to_string(), "hub_b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous selection: 2 candidates (hub_a, hub_b)"
        );
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::MissingDeviceId.into();
        assert!(matches!(err, Error::Config(ConfigError::MissingDeviceId)));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("devices".to_string());
        assert_eq!(err.to_string(), "missing field: devices");
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = ParseError::from(json_err).into();
        assert!(err.to_string().starts_with("parse error: JSON parse error"));
    }

    #[test]
    fn id_mismatch_display() {
        let err = ParseError::IdMismatch {
            key: "sensor.a".to_string(),
            id: "event.b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "identifier mismatch: sensor.a holds a record for event.b"
        );
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::InvalidWidth(0).to_string(),
            "invalid compact breakpoint: 0px"
        );
    }
}
