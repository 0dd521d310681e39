#![forbid(unsafe_code)]

//! Bounds clamping.

use griddeck_core::{CellRect, GridBounds, Layout};

/// Constrain a rectangle to lie inside the container bounds.
///
/// `x` is forced into `[0, max_x - w]` and `y` into `[0, max_y - h]`. An
/// item wider or taller than the container itself is forced to the origin
/// on that axis and allowed to overhang; the engine does not attempt to
/// resolve that degenerate case further.
#[must_use]
pub fn clamp_rect(rect: CellRect, bounds: GridBounds) -> CellRect {
    let hi_x = bounds.max_x.saturating_sub(rect.w).max(0);
    let hi_y = bounds.max_y.saturating_sub(rect.h).max(0);
    CellRect {
        x: rect.x.clamp(0, hi_x),
        y: rect.y.clamp(0, hi_y),
        ..rect
    }
}

/// Clamp every item of a layout in place.
pub fn clamp_layout(layout: &mut Layout, bounds: GridBounds) {
    for item in layout.items_mut() {
        item.rect = clamp_rect(item.rect, bounds);
    }
}
