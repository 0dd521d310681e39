#![forbid(unsafe_code)]

//! Core: cell geometry, grid metrics, and the item model.
//!
//! # Role in GridDeck
//! `griddeck-core` is the data layer. It owns the cell-space rectangle
//! type, pixel↔cell conversion, container bounds derivation, and the
//! keyed item collection that the resolver and runtime operate on.
//!
//! # Primary responsibilities
//! - **CellRect**: signed cell-space rectangles with the overlap predicate.
//! - **GridMetrics**: cell size, render scale, and snapping conversions.
//! - **GridBounds**: container bounds derived from pixel dimensions.
//! - **Layout**: id-keyed item map with deterministic iteration and
//!   invariant reporting.
//!
//! # How it fits in the system
//! `griddeck-layout` consumes these types to clamp and reflow proposals;
//! `griddeck-runtime` consumes both to drive the interaction lifecycle.
//! Nothing in this crate performs I/O or holds interaction state.

pub mod geometry;
pub mod item;
pub mod metrics;

pub use geometry::CellRect;
pub use item::{
    GridItem, ItemId, Layout, LayoutInvariantCode, LayoutInvariantIssue, LayoutInvariantReport,
    LayoutInvariantSeverity,
};
pub use metrics::{GridBounds, GridMetrics, MetricsError, RenderScale};
