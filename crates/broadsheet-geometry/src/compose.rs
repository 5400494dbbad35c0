#![forbid(unsafe_code)]

//! Auto-grow sizing for the comment reply box.
//!
//! The reply box collapses to a single-line height when unfocused, grows with
//! its content while focused (two-line floor, ten-line ceiling), and only
//! shows its own scrollbar once the content exceeds the ceiling. The submit
//! control is enabled only while the draft contains non-whitespace text.

/// Maximum reply box height in pixels (10 lines).
pub const REPLY_MAX_HEIGHT: f64 = 236.0;
/// Height of the collapsed, unfocused reply box.
pub const REPLY_MIN_HEIGHT_COLLAPSED: f64 = 47.0;
/// Minimum height while focused (2 lines).
pub const REPLY_MIN_HEIGHT_FOCUSED: f64 = 68.0;
/// Vertical border accounted for on top of the measured content height.
pub const REPLY_VERTICAL_BORDER: f64 = 2.0;

/// Reply box draft and sizing state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyBox {
    draft: String,
    focused: bool,
    content_height: f64,
}

impl ReplyBox {
    /// An empty, unfocused reply box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft text.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Whether the box currently has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give the box focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Drop focus. The box collapses regardless of content.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Record the measured content height (the host measures the rendered
    /// text; this crate only does the arithmetic).
    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height.max(0.0);
    }

    /// Minimum height the box should request.
    ///
    /// Unfocused boxes always collapse. Focused boxes grow with content plus
    /// border, floored at the two-line minimum and capped at the ten-line
    /// maximum.
    #[must_use]
    pub fn min_height(&self) -> f64 {
        if !self.focused {
            return REPLY_MIN_HEIGHT_COLLAPSED;
        }
        (self.content_height + REPLY_VERTICAL_BORDER)
            .min(REPLY_MAX_HEIGHT)
            .max(REPLY_MIN_HEIGHT_FOCUSED)
    }

    /// Explicit height override, set only while unfocused so a manually
    /// resized box still collapses.
    #[must_use]
    pub fn forced_height(&self) -> Option<f64> {
        (!self.focused).then_some(REPLY_MIN_HEIGHT_COLLAPSED)
    }

    /// Whether the box should show its own scrollbar (content has hit the
    /// height ceiling).
    #[must_use]
    pub fn shows_scrollbar(&self) -> bool {
        self.min_height() >= REPLY_MAX_HEIGHT
    }

    /// Whether the draft can be submitted (non-blank).
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Take the draft for submission, leaving the box empty.
    #[must_use]
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }
}
