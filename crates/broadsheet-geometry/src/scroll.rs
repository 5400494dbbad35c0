#![forbid(unsafe_code)]

//! One-dimensional scroll window state.
//!
//! [`ScrollWindow`] tracks the visible extent, total content extent, and
//! current offset along a single axis, keeping the offset clamped to
//! `[0, max_scroll]` across scrolls and resizes. [`ScrollWindow::puck`] ties
//! the window to the pure puck math in [`crate::puck`], answering the
//! hide-or-draw question before any arithmetic that assumes a scrollable
//! track.

use crate::puck::{calc_puck_offset, calc_puck_size, puck_visible};

/// Computed puck rectangle along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puck {
    /// Puck length in pixels.
    pub size: f64,
    /// Offset from the track base in pixels.
    pub offset: f64,
}

/// Scroll state for one axis of a scrollable container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWindow {
    visible_size: f64,
    total_size: f64,
    offset: f64,
}

impl ScrollWindow {
    /// Create a window with the given visible and total extents, scrolled to
    /// the start. Negative extents are treated as zero.
    #[must_use]
    pub fn new(visible_size: f64, total_size: f64) -> Self {
        Self {
            visible_size: visible_size.max(0.0),
            total_size: total_size.max(0.0),
            offset: 0.0,
        }
    }

    /// Visible extent in pixels.
    #[must_use]
    pub fn visible_size(&self) -> f64 {
        self.visible_size
    }

    /// Total content extent in pixels.
    #[must_use]
    pub fn total_size(&self) -> f64 {
        self.total_size
    }

    /// Current scroll offset in `[0, max_scroll]`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Maximum scrollable offset: `total - visible`, floored at zero.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.total_size - self.visible_size).max(0.0)
    }

    /// Scroll by a signed delta, clamping to the valid range.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.offset + delta);
    }

    /// Scroll to an absolute offset, clamping to the valid range.
    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_scroll());
    }

    /// Scroll forward by one viewport.
    pub fn page_forward(&mut self) {
        self.scroll_by(self.visible_size);
    }

    /// Scroll back by one viewport.
    pub fn page_back(&mut self) {
        self.scroll_by(-self.visible_size);
    }

    /// Whether the window is scrolled to the start.
    #[must_use]
    pub fn at_start(&self) -> bool {
        self.offset <= 0.0
    }

    /// Whether the window is scrolled to the end.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.offset >= self.max_scroll()
    }

    /// Update the content extent, re-clamping the offset. Content shrinking
    /// below the current offset pulls the window back.
    pub fn set_total_size(&mut self, total_size: f64) {
        self.total_size = total_size.max(0.0);
        self.scroll_to(self.offset);
    }

    /// Update the visible extent, re-clamping the offset.
    pub fn set_visible_size(&mut self, visible_size: f64) {
        self.visible_size = visible_size.max(0.0);
        self.scroll_to(self.offset);
    }

    /// Puck geometry for this window with the given track margin, or `None`
    /// when the scrollbar should be hidden (content fits, or the puck cannot
    /// fit on the track).
    #[must_use]
    pub fn puck(&self, track_margin: f64) -> Option<Puck> {
        if !puck_visible(self.visible_size, self.total_size, track_margin) {
            return None;
        }
        Some(Puck {
            size: calc_puck_size(self.visible_size, self.total_size, track_margin),
            offset: calc_puck_offset(
                self.visible_size,
                self.total_size,
                self.offset,
                track_margin,
            ),
        })
    }
}
