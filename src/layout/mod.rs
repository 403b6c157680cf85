// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Responsive layout selection.
//!
//! Cards render either a full layout, with node status and last-seen shown
//! as dedicated header fields, or a compact one where those readings are
//! folded into the sensor list (see
//! [`DeviceBundle::sensors_for_layout`](crate::classify::DeviceBundle::sensors_for_layout)).
//!
//! # Examples
//!
//! ```
//! use hubcard_lib::layout::{Layout, select_layout};
//!
//! assert_eq!(select_layout(449), Layout::Compact);
//! assert_eq!(select_layout(450), Layout::Full);
//! ```

mod debounce;

use serde::{Deserialize, Serialize};

pub use debounce::{DEFAULT_DEBOUNCE_WINDOW, ResizeDebouncer};

/// Widths strictly below this value select [`Layout::Compact`].
pub const COMPACT_BREAKPOINT_PX: u32 = 450;

/// Card layout mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Narrow card; status readings fold into the sensor list.
    Compact,
    /// Wide card with dedicated header fields.
    #[default]
    Full,
}

impl Layout {
    /// Returns `true` for [`Layout::Compact`].
    #[must_use]
    pub const fn is_compact(self) -> bool {
        matches!(self, Self::Compact)
    }
}

/// Maps a measured width to a layout using the default breakpoint.
#[must_use]
pub const fn select_layout(width_px: u32) -> Layout {
    select_layout_with_breakpoint(width_px, COMPACT_BREAKPOINT_PX)
}

/// Maps a measured width to a layout using a custom breakpoint.
#[must_use]
pub const fn select_layout_with_breakpoint(width_px: u32, breakpoint_px: u32) -> Layout {
    if width_px < breakpoint_px {
        Layout::Compact
    } else {
        Layout::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_boundary() {
        assert_eq!(select_layout(0), Layout::Compact);
        assert_eq!(select_layout(449), Layout::Compact);
        assert_eq!(select_layout(450), Layout::Full);
        assert_eq!(select_layout(1920), Layout::Full);
    }

    #[test]
    fn custom_breakpoint() {
        assert_eq!(select_layout_with_breakpoint(500, 600), Layout::Compact);
        assert_eq!(select_layout_with_breakpoint(600, 600), Layout::Full);
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Layout::Compact).unwrap(), "\"compact\"");
        let layout: Layout = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(layout, Layout::Full);
    }
}
