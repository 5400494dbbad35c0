#![forbid(unsafe_code)]

//! Scroll-puck sizing and positioning.
//!
//! A custom scrollbar draws a draggable *puck* (thumb) on a *track* inset by
//! `track_margin` pixels at each end. The puck's size is proportional to how
//! much of the content is visible; its offset is proportional to how far the
//! user has scrolled.
//!
//! # Contract
//!
//! All functions require `total_size > 0`. Callers must not invoke them with
//! zero total size (division by zero); hide the scrollbar instead — see
//! [`puck_visible`]. Meaningful output additionally assumes
//! `total_size >= visible_size` and `2 * track_margin <= visible_size`.

/// Size of the scroll puck in pixels, given the visible extent of the
/// viewport and the total extent of the content along one axis.
///
/// Computed as `(visible - 2 * margin) / total * visible`, rounded, and capped
/// at `visible_size`. Under the contract above the result lies in
/// `[0, visible_size]`; as `total_size` approaches `visible_size` the puck
/// grows toward filling the track, at which point the scrollbar should be
/// hidden rather than drawn (see [`puck_visible`]).
#[must_use]
pub fn calc_puck_size(visible_size: f64, total_size: f64, track_margin: f64) -> f64 {
    debug_assert!(total_size != 0.0, "puck math requires total_size > 0");
    ((visible_size - track_margin * 2.0) / total_size * visible_size)
        .round()
        .min(visible_size)
}

/// Offset of the scroll puck from the base of the track, in pixels.
///
/// `scroll_amount` is the current scroll offset in `[0, total - visible]`.
/// The raw position `visible * scroll_amount / total` is rounded, then bounded
/// above by `max_offset = visible - puck - 2 * margin` and below by
/// `track_margin`, so `scroll_amount = 0` pins the puck to the margin and the
/// maximum scroll pins it to `max_offset` (within rounding).
///
/// When `max_offset < track_margin` (the track cannot fit the puck) the floor
/// wins and the result stays pinned at `track_margin`; callers are expected to
/// have hidden the scrollbar via [`puck_visible`] before that point.
#[must_use]
pub fn calc_puck_offset(
    visible_size: f64,
    total_size: f64,
    scroll_amount: f64,
    track_margin: f64,
) -> f64 {
    let puck_size = calc_puck_size(visible_size, total_size, track_margin);
    let max_offset = visible_size - puck_size - track_margin * 2.0;
    let proportion_scrolled = scroll_amount / total_size;
    (visible_size * proportion_scrolled)
        .round()
        .min(max_offset)
        .max(track_margin)
}

/// Whether a scrollbar should be drawn at all.
///
/// Returns `false` when the content fits in the viewport, or when the puck
/// would not fit on the track with the requested margin (the region where the
/// offset clamp in [`calc_puck_offset`] inverts). Also the guard that keeps
/// callers away from the `total_size == 0` contract violation.
#[must_use]
pub fn puck_visible(visible_size: f64, total_size: f64, track_margin: f64) -> bool {
    if total_size <= visible_size || total_size <= 0.0 {
        return false;
    }
    let puck_size = calc_puck_size(visible_size, total_size, track_margin);
    visible_size - puck_size - track_margin * 2.0 >= track_margin
}
