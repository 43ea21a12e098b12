//! Auto-scroll bookkeeping for the message list.
//!
//! The browser reports its scroll geometry; the controller decides whether new
//! content should pull the viewport to the bottom and whether the
//! "jump to bottom" button is visible.

use serde::{Deserialize, Serialize};

/// Distance from the bottom, in CSS pixels, under which the list keeps following.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 100.0;

/// Scroll geometry of the message viewport, as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current `scrollTop` of the viewport.
    pub scroll_top: f64,
    /// Total `scrollHeight` of the content.
    pub scroll_height: f64,
    /// Visible `clientHeight` of the viewport.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Remaining distance between the bottom of the viewport and the end of the content.
    #[must_use]
    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    /// All three values are finite numbers.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.scroll_top.is_finite() && self.scroll_height.is_finite() && self.client_height.is_finite()
    }
}

/// Follow-the-tail state for one message list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollController {
    auto_scroll: bool,
    threshold: f64,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollController {
    /// Create a controller that starts out following new content.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            auto_scroll: true,
            threshold,
        }
    }

    /// Whether new content should move the viewport to the bottom.
    #[must_use]
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// The jump-to-bottom button is shown exactly when auto-scroll is off.
    #[must_use]
    pub fn show_jump_button(&self) -> bool {
        !self.auto_scroll
    }

    /// Recompute auto-scroll from a manual scroll event.
    ///
    /// Returns `true` when the value changed.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        let near_bottom = metrics.distance_from_bottom() < self.threshold;
        let changed = near_bottom != self.auto_scroll;
        self.auto_scroll = near_bottom;
        changed
    }
}
