#![forbid(unsafe_code)]

//! Grid items and the keyed layout collection.
//!
//! A [`Layout`] maps [`ItemId`]s to [`GridItem`]s. The map is ordered by
//! id, which is what makes every scan over it reproducible regardless of
//! insertion order; reflow determinism depends on this.
//!
//! # Invariants
//!
//! On any committed layout:
//! 1. Every item lies fully inside the container bounds.
//! 2. No two distinct items overlap (touching edges allowed).
//! 3. Every item is at least one cell in each dimension.
//!
//! Preview layouts must satisfy 1 and 3 at all times; 2 holds at the end
//! of every reflow pass. [`Layout::invariant_report`] makes violations
//! observable for diagnostics and tests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::CellRect;
use crate::metrics::GridBounds;

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Opaque unique item identity, stable for the item's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// ---------------------------------------------------------------------------
// GridItem
// ---------------------------------------------------------------------------

/// One rectangular item on the grid surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    /// Stable identity.
    pub id: ItemId,
    /// Position and size in cells.
    pub rect: CellRect,
}

impl GridItem {
    /// Create an item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, rect: CellRect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Id-keyed item collection with id-ascending iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    items: BTreeMap<ItemId, GridItem>,
}

impl Layout {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from items. Later duplicates of an id replace
    /// earlier ones; the map keeps keys unique.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = GridItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    /// Insert or replace an item, keyed by its id.
    pub fn insert(&mut self, item: GridItem) {
        self.items.insert(item.id.clone(), item);
    }

    /// Remove an item by id.
    pub fn remove(&mut self, id: &ItemId) -> Option<GridItem> {
        self.items.remove(id)
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&GridItem> {
        self.items.get(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut GridItem> {
        self.items.get_mut(id)
    }

    /// Whether an item with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the layout holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &GridItem> {
        self.items.values()
    }

    /// Mutable items in ascending id order.
    ///
    /// Callers mutate geometry only; rewriting an item's id through this
    /// iterator would desynchronize it from its map key.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut GridItem> {
        self.items.values_mut()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    /// Structured invariant findings against the given bounds.
    #[must_use]
    pub fn invariant_report(&self, bounds: GridBounds) -> LayoutInvariantReport {
        let mut issues = Vec::new();

        for item in self.items.values() {
            let rect = item.rect;
            if rect.w < 1 || rect.h < 1 {
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::NonPositiveSize,
                    severity: LayoutInvariantSeverity::Error,
                    item: Some(item.id.clone()),
                    related_item: None,
                    message: format!("item {} has size {}x{}", item.id, rect.w, rect.h),
                });
                continue;
            }
            if rect.w > bounds.max_x || rect.h > bounds.max_y {
                // An item larger than the container cannot be placed inside
                // it; clamping forces it to the origin and lets it overhang.
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::OversizedItem,
                    severity: LayoutInvariantSeverity::Warning,
                    item: Some(item.id.clone()),
                    related_item: None,
                    message: format!(
                        "item {} is {}x{} in a {}x{} container",
                        item.id, rect.w, rect.h, bounds.max_x, bounds.max_y
                    ),
                });
            } else if rect.x < 0
                || rect.y < 0
                || rect.right() > bounds.max_x
                || rect.bottom() > bounds.max_y
            {
                issues.push(LayoutInvariantIssue {
                    code: LayoutInvariantCode::OutOfBounds,
                    severity: LayoutInvariantSeverity::Error,
                    item: Some(item.id.clone()),
                    related_item: None,
                    message: format!(
                        "item {} at ({},{}) {}x{} escapes {}x{} bounds",
                        item.id, rect.x, rect.y, rect.w, rect.h, bounds.max_x, bounds.max_y
                    ),
                });
            }
        }

        let items: Vec<&GridItem> = self.items.values().collect();
        for (i, a) in items.iter().enumerate() {
            for b in items.iter().skip(i + 1) {
                if a.rect.overlaps(&b.rect) {
                    issues.push(LayoutInvariantIssue {
                        code: LayoutInvariantCode::Overlap,
                        severity: LayoutInvariantSeverity::Error,
                        item: Some(a.id.clone()),
                        related_item: Some(b.id.clone()),
                        message: format!("items {} and {} overlap", a.id, b.id),
                    });
                }
            }
        }

        LayoutInvariantReport { issues }
    }

    /// `Result` form of [`invariant_report`](Self::invariant_report):
    /// `Err` with the report when any error-level finding exists.
    pub fn validate(&self, bounds: GridBounds) -> Result<(), LayoutInvariantReport> {
        let report = self.invariant_report(bounds);
        if report.has_errors() { Err(report) } else { Ok(()) }
    }
}

impl FromIterator<GridItem> for Layout {
    fn from_iter<T: IntoIterator<Item = GridItem>>(iter: T) -> Self {
        Self::from_items(iter)
    }
}

// ---------------------------------------------------------------------------
// Invariant reporting
// ---------------------------------------------------------------------------

/// Severity for one invariant finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantCode {
    /// Item width or height below one cell.
    NonPositiveSize,
    /// Item escapes the container bounds.
    OutOfBounds,
    /// Item larger than the container itself; overhang is tolerated.
    OversizedItem,
    /// Two distinct items intersect with positive area.
    Overlap,
}

/// One actionable invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantIssue {
    pub code: LayoutInvariantCode,
    pub severity: LayoutInvariantSeverity,
    pub item: Option<ItemId>,
    pub related_item: Option<ItemId>,
    pub message: String,
}

/// Structured invariant report over a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub issues: Vec<LayoutInvariantIssue>,
}

impl LayoutInvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == LayoutInvariantSeverity::Error)
    }

    /// Findings with a specific code, for targeted assertions.
    pub fn with_code(
        &self,
        code: LayoutInvariantCode,
    ) -> impl Iterator<Item = &LayoutInvariantIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
