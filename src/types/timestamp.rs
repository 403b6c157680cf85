// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamps reported by last-seen entities.
//!
//! The host reports last-seen readings as strings. Depending on the
//! integration they arrive in one of these formats:
//!
//! - ISO 8601 with timezone: `"2024-01-15T10:30:00+01:00"` or `"...Z"`
//! - ISO 8601 without timezone: `"2024-01-15T10:30:00"` (read as UTC)
//! - Unix epoch seconds: `"1705318200"`
//! - Unix epoch milliseconds: `"1705318200000"`
//!
//! Epoch values need at least nine digits (March 1973 onwards). Shorter
//! digit runs such as `"20240115"` are rejected rather than read as a
//! moment in 1970.
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::types::Timestamp;
//!
//! let ts: Timestamp = "2024-01-15T10:30:00Z".parse().unwrap();
//! assert_eq!(ts.epoch_millis(), 1_705_314_600_000);
//!
//! // Anything else is simply unknown
//! assert!(Timestamp::parse("unavailable").is_none());
//! ```

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Fewest digits accepted as a Unix epoch.
const MIN_EPOCH_DIGITS: usize = 9;

/// Error returned when parsing a timestamp string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParseError {
    input: String,
}

impl TimestampParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// Returns the input string that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to parse timestamp: '{}' (expected ISO 8601 or Unix epoch)",
            self.input
        )
    }
}

impl std::error::Error for TimestampParseError {}

/// A point in time, normalized to UTC.
///
/// Ordering follows the instant, so timestamps can be compared directly
/// when sorting nodes by recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses a timestamp string, returning `None` when it is not
    /// recognized.
    ///
    /// For error details, use the `FromStr` implementation instead.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Creates a timestamp from Unix epoch milliseconds.
    #[must_use]
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the instant as Unix epoch milliseconds.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying UTC datetime.
    #[must_use]
    pub const fn to_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    fn from_epoch_digits(s: &str) -> Option<Self> {
        let timestamp: i64 = s.parse().ok()?;

        // Seconds have at most 10 digits until 2286; anything larger is ms
        if timestamp > 9_999_999_999 {
            Self::from_epoch_millis(timestamp)
        } else {
            Utc.timestamp_opt(timestamp, 0).single().map(Self)
        }
    }

    fn from_rfc3339(s: &str) -> Option<Self> {
        let datetime = DateTime::parse_from_rfc3339(s).ok()?;
        Some(Self(datetime.with_timezone(&Utc)))
    }

    fn from_naive_utc(s: &str) -> Option<Self> {
        let formats = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
        ];

        formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.len() >= MIN_EPOCH_DIGITS
            && s.chars().all(|c| c.is_ascii_digit())
            && let Some(ts) = Self::from_epoch_digits(s)
        {
            return Ok(ts);
        }

        if let Some(ts) = Self::from_rfc3339(s) {
            return Ok(ts);
        }

        Self::from_naive_utc(s).ok_or_else(|| TimestampParseError::new(s))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
