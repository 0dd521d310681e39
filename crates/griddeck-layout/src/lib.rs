#![forbid(unsafe_code)]

//! Collision, reflow, and bounds resolution for GridDeck layouts.
//!
//! # Role in GridDeck
//! `griddeck-layout` turns a raw geometry proposal for one item into a
//! consistent layout: the proposal is clamped to the container, colliding
//! items are pushed down by the cascading reflow, and the result is
//! clamped again.
//!
//! # Primary responsibilities
//! - **collision**: pairwise and set-wide overlap queries.
//! - **reflow**: the breadth-first push-down cascade with a divergence
//!   guard.
//! - **clamp**: constraining rectangles to the container bounds.
//! - **resolver**: the clamp → reflow → clamp pipeline, the single entry
//!   point interaction code uses.
//!
//! # How it fits in the system
//! `griddeck-runtime` calls [`resolver::resolve`] on every gesture tick
//! and commit. Everything here is pure: inputs are never mutated, no I/O,
//! every call runs to completion synchronously.

pub mod clamp;
pub mod collision;
pub mod reflow;
pub mod resolver;

pub use griddeck_core::{CellRect, GridBounds, GridItem, ItemId, Layout};

pub use clamp::{clamp_layout, clamp_rect};
pub use collision::{all_overlaps, any_overlap};
pub use reflow::{ReflowError, ReflowStats, reflow, reflow_with_budget};
pub use resolver::{ResolveNoopReason, ResolveOutcome, resolve, resolve_with_budget};
