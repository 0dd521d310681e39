#![forbid(unsafe_code)]

//! Cascading push-down reflow.
//!
//! Given the id of the item that just moved or resized (the anchor), the
//! reflow pushes every item that collides with it straight down, then
//! repeats from each pushed item until no collisions remain along any
//! chain. Only vertical displacement is used: a horizontal position set
//! by the user survives reflow.
//!
//! # Invariants
//!
//! 1. The anchor is never displaced; its proposal is authoritative.
//! 2. Candidate items are scanned in ascending id order, so outcomes are
//!    reproducible regardless of how the layout was built.
//! 3. Every push moves an item strictly downward. Pushed items land at or
//!    below the anchor's bottom edge, so a cascade can never circle back
//!    onto the anchor.
//! 4. Each item may be pushed at most `push_budget` times per invocation;
//!    exceeding the budget fails the whole pass instead of looping.
//!
//! # Failure Modes
//!
//! - Unknown anchor id: [`ReflowError::AnchorMissing`]. The layout is not
//!   touched.
//! - Budget exhaustion: [`ReflowError::Divergence`]. The layout is left
//!   mid-cascade; callers discard it and fall back to the last committed
//!   layout.

use std::collections::VecDeque;
use std::fmt;

use griddeck_core::{ItemId, Layout};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Counters from one reflow pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReflowStats {
    /// Total number of pushes applied.
    pub pushes: usize,
    /// Number of distinct items displaced.
    pub items_moved: usize,
}

/// Resolve all overlaps caused by the anchor's new geometry.
///
/// Uses the default push budget: each item may be pushed at most as many
/// times as there are items in the layout.
pub fn reflow(layout: &mut Layout, anchor: &ItemId) -> Result<ReflowStats, ReflowError> {
    let budget = layout.len();
    reflow_with_budget(layout, anchor, budget)
}

/// [`reflow`] with an explicit per-item push budget.
///
/// The budget exists as a hard stop for cascades that fail to settle;
/// tests use small budgets to exercise the failure path deterministically.
pub fn reflow_with_budget(
    layout: &mut Layout,
    anchor: &ItemId,
    push_budget: usize,
) -> Result<ReflowStats, ReflowError> {
    if !layout.contains(anchor) {
        return Err(ReflowError::AnchorMissing { id: anchor.clone() });
    }

    let ids: Vec<ItemId> = layout.ids().cloned().collect();
    let mut push_counts: FxHashMap<ItemId, usize> = FxHashMap::default();
    let mut queue: VecDeque<ItemId> = VecDeque::new();
    queue.push_back(anchor.clone());

    let mut pushes = 0usize;

    while let Some(current) = queue.pop_front() {
        let Some(cur_rect) = layout.get(&current).map(|item| item.rect) else {
            continue;
        };

        for id in &ids {
            if id == &current || id == anchor {
                // The anchor is structurally exempt from displacement.
                // Every pushed item lands at or below the anchor's bottom
                // edge, so skipping it here never leaves an overlap behind.
                continue;
            }
            let Some(other) = layout.get_mut(id) else {
                continue;
            };
            if cur_rect.overlaps(&other.rect) {
                other.rect.y = cur_rect.bottom();

                let count = push_counts.entry(id.clone()).or_insert(0);
                *count += 1;
                if *count > push_budget {
                    return Err(ReflowError::Divergence {
                        id: id.clone(),
                        budget: push_budget,
                    });
                }
                pushes += 1;
                queue.push_back(id.clone());
            }
        }
    }

    Ok(ReflowStats {
        pushes,
        items_moved: push_counts.len(),
    })
}

/// Errors from a reflow pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReflowError {
    /// The anchor id is not present in the layout.
    AnchorMissing { id: ItemId },
    /// An item exceeded its push budget; the cascade failed to settle.
    Divergence { id: ItemId, budget: usize },
}

impl fmt::Display for ReflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnchorMissing { id } => {
                write!(f, "reflow anchor {id} is not present in the layout")
            }
            Self::Divergence { id, budget } => {
                write!(
                    f,
                    "reflow diverged: item {id} exceeded its push budget of {budget}"
                )
            }
        }
    }
}

impl std::error::Error for ReflowError {}
