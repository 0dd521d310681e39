#![forbid(unsafe_code)]

//! Grid metrics: cell size, render scale, and pixel↔cell conversion.
//!
//! Snapping continuous pointer motion to discrete cells is lossy by
//! design. All conversion happens here so the rest of the engine only
//! ever sees cell units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default cell edge length in pixels.
pub const DEFAULT_CELL_SIZE: i32 = 30;

/// A rational render scale applied between screen pixels and surface
/// pixels.
///
/// The surface may be rendered zoomed; incoming pixel measurements are
/// divided by this factor before cell snapping. Both terms are validated
/// non-zero at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderScale {
    numerator: u32,
    denominator: u32,
}

impl RenderScale {
    /// Create a scale of `numerator / denominator`.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, MetricsError> {
        if numerator == 0 || denominator == 0 {
            return Err(MetricsError::ZeroScaleTerm {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The identity scale (1:1).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
        }
    }

    /// Whether this scale is a no-op.
    #[inline]
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.numerator == self.denominator
    }

    #[inline]
    #[must_use]
    pub const fn numerator(&self) -> u32 {
        self.numerator
    }

    #[inline]
    #[must_use]
    pub const fn denominator(&self) -> u32 {
        self.denominator
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self::identity()
    }
}

/// Cell size and render scale for one grid surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMetrics {
    cell_size: i32,
    scale: RenderScale,
}

impl GridMetrics {
    /// Create metrics with the given cell size (pixels) and identity scale.
    pub fn new(cell_size: i32) -> Result<Self, MetricsError> {
        Self::with_scale(cell_size, RenderScale::identity())
    }

    /// Create metrics with an explicit render scale.
    pub fn with_scale(cell_size: i32, scale: RenderScale) -> Result<Self, MetricsError> {
        if cell_size <= 0 {
            return Err(MetricsError::NonPositiveCellSize { cell_size });
        }
        Ok(Self { cell_size, scale })
    }

    /// Cell edge length in pixels.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// The configured render scale.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> RenderScale {
        self.scale
    }

    /// Convert a cell count to screen pixels.
    #[must_use]
    pub fn cell_to_pixel(&self, cells: i32) -> i32 {
        let surface = i64::from(cells) * i64::from(self.cell_size) * i64::from(self.scale.numerator);
        div_round_half_away(surface, i64::from(self.scale.denominator)) as i32
    }

    /// Snap a screen-pixel measurement to whole cells.
    ///
    /// Rounds half away from zero: at cell size 30, +45 px snaps to +2
    /// cells and −45 px to −2.
    #[must_use]
    pub fn pixel_to_cell(&self, pixels: i32) -> i32 {
        let scaled = i64::from(pixels) * i64::from(self.scale.denominator);
        div_round_half_away(
            scaled,
            i64::from(self.cell_size) * i64::from(self.scale.numerator),
        ) as i32
    }
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            scale: RenderScale::identity(),
        }
    }
}

/// Container bounds in whole cells.
///
/// Derived from a fresh pixel-size query per resolve call; the container
/// may be resized between interactions, so bounds are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Cell columns available.
    pub max_x: i32,
    /// Cell rows available.
    pub max_y: i32,
}

impl GridBounds {
    /// Create bounds from explicit cell counts.
    #[inline]
    #[must_use]
    pub const fn new(max_x: i32, max_y: i32) -> Self {
        Self { max_x, max_y }
    }

    /// Derive bounds from the container's pixel dimensions.
    ///
    /// Partial trailing cells are unusable: floor division.
    #[must_use]
    pub fn from_pixel_size(metrics: &GridMetrics, width_px: u32, height_px: u32) -> Self {
        let denom = i64::from(metrics.cell_size()) * i64::from(metrics.scale().numerator());
        let max_x = i64::from(width_px) * i64::from(metrics.scale().denominator()) / denom;
        let max_y = i64::from(height_px) * i64::from(metrics.scale().denominator()) / denom;
        Self {
            max_x: max_x.min(i64::from(i32::MAX)) as i32,
            max_y: max_y.min(i64::from(i32::MAX)) as i32,
        }
    }
}

/// Integer division rounding half away from zero.
///
/// `d` must be positive; callers guarantee this via validated metrics.
fn div_round_half_away(n: i64, d: i64) -> i64 {
    debug_assert!(d > 0);
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        (2 * n - d) / (2 * d)
    }
}

/// Errors from metrics construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    /// Cell size must be a positive pixel count.
    NonPositiveCellSize { cell_size: i32 },
    /// Render scale terms must both be non-zero.
    ZeroScaleTerm { numerator: u32, denominator: u32 },
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveCellSize { cell_size } => {
                write!(f, "cell size must be positive, got {cell_size}")
            }
            Self::ZeroScaleTerm {
                numerator,
                denominator,
            } => {
                write!(
                    f,
                    "render scale terms must be non-zero, got {numerator}/{denominator}"
                )
            }
        }
    }
}

impl std::error::Error for MetricsError {}
