#![forbid(unsafe_code)]

//! Cell-space geometric primitives.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in grid cell units.
///
/// Coordinates are signed on purpose: a raw gesture proposal may place a
/// rectangle partially outside the surface before clamping pulls it back.
/// Committed layouts never contain negative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub w: i32,
    /// Height in cells.
    pub h: i32,
}

impl CellRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Area in cells. Zero for degenerate rectangles.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.w as i64 * self.h as i64
        }
    }

    /// Whether the rectangle has no positive area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Whether two rectangles intersect with positive area.
    ///
    /// Touching edges do not count as overlap. Degenerate rectangles
    /// overlap nothing.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &CellRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom())
    }

    /// The rectangle shifted by a cell delta.
    #[inline]
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            w: self.w,
            h: self.h,
        }
    }

    /// The rectangle moved to a new top-left corner, size unchanged.
    #[inline]
    #[must_use]
    pub const fn at(&self, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            w: self.w,
            h: self.h,
        }
    }

    /// The rectangle resized in place, top-left corner unchanged.
    #[inline]
    #[must_use]
    pub const fn sized(&self, w: i32, h: i32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            w,
            h,
        }
    }

    /// The rectangle with both dimensions raised to at least one cell.
    ///
    /// Degenerate sizes are expected from interactive input and are
    /// corrected here rather than rejected.
    #[inline]
    #[must_use]
    pub const fn with_min_size(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            w: if self.w < 1 { 1 } else { self.w },
            h: if self.h < 1 { 1 } else { self.h },
        }
    }
}
