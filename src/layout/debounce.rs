// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coalescing of resize notifications.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{COMPACT_BREAKPOINT_PX, Layout, select_layout_with_breakpoint};

/// Default quiet period before a burst of widths is evaluated.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Collapses bursts of width measurements into layout decisions.
///
/// Hosts report a new width on every resize frame. The debouncer waits until
/// no measurement has arrived for the configured window, evaluates only the
/// last width of the burst, and forwards the resulting [`Layout`] when it
/// differs from the one it emitted before.
///
/// # Examples
///
/// ```
/// use hubcard_lib::layout::{Layout, ResizeDebouncer};
/// use tokio::sync::mpsc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (width_tx, width_rx) = mpsc::channel(16);
/// let (layout_tx, mut layout_rx) = mpsc::channel(4);
/// tokio::spawn(ResizeDebouncer::new().run(width_rx, layout_tx));
///
/// for width in [900, 620, 380] {
///     width_tx.send(width).await.unwrap();
/// }
/// assert_eq!(layout_rx.recv().await, Some(Layout::Compact));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    breakpoint_px: u32,
}

impl ResizeDebouncer {
    /// Creates a debouncer with the default window and breakpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: DEFAULT_DEBOUNCE_WINDOW,
            breakpoint_px: COMPACT_BREAKPOINT_PX,
        }
    }

    /// Sets the quiet window.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the compact breakpoint.
    #[must_use]
    pub fn with_breakpoint(mut self, breakpoint_px: u32) -> Self {
        self.breakpoint_px = breakpoint_px;
        self
    }

    /// Returns the quiet window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Consumes widths until the sender side is dropped.
    ///
    /// Returns early if the layout receiver is dropped. A burst that is still
    /// pending when the width channel closes is flushed first.
    pub async fn run(self, mut widths: mpsc::Receiver<u32>, layouts: mpsc::Sender<Layout>) {
        let mut current: Option<Layout> = None;

        while let Some(mut width) = widths.recv().await {
            let mut coalesced = 0_usize;
            let mut closed = false;

            loop {
                match tokio::time::timeout(self.window, widths.recv()).await {
                    Ok(Some(next)) => {
                        width = next;
                        coalesced += 1;
                    }
                    Ok(None) => {
                        closed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }

            let layout = select_layout_with_breakpoint(width, self.breakpoint_px);
            tracing::trace!(width, coalesced, ?layout, "Resize burst settled");

            if current != Some(layout) {
                current = Some(layout);
                if layouts.send(layout).await.is_err() {
                    tracing::debug!("Layout receiver dropped, stopping debouncer");
                    return;
                }
            }

            if closed {
                break;
            }
        }
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
