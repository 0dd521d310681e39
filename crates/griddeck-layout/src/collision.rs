#![forbid(unsafe_code)]

//! Overlap queries over a layout.

use griddeck_core::{GridItem, ItemId, Layout};
use rustc_hash::FxHashSet;

/// Whether `item` overlaps any other item in `layout`.
///
/// The item itself is excluded by id, so passing an item that is already
/// stored in the layout never reports a self-collision.
#[must_use]
pub fn any_overlap(item: &GridItem, layout: &Layout) -> bool {
    layout
        .items()
        .any(|other| other.id != item.id && item.rect.overlaps(&other.rect))
}

/// Every overlapping pair of distinct items, each pair ordered ascending
/// by id.
///
/// Verification and test surface; the hot path uses [`any_overlap`] and
/// the reflow scan instead.
#[must_use]
pub fn all_overlaps(layout: &Layout) -> FxHashSet<(ItemId, ItemId)> {
    let items: Vec<&GridItem> = layout.items().collect();
    let mut pairs = FxHashSet::default();
    for (i, a) in items.iter().enumerate() {
        for b in items.iter().skip(i + 1) {
            if a.rect.overlaps(&b.rect) {
                pairs.insert((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}
