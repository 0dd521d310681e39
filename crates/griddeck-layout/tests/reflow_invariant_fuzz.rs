//! Fuzz-style invariants for the resolve pipeline.
//!
//! This suite drives random move/resize streams through the public
//! resolver API and asserts post-resolve invariants after every step:
//! the anchor keeps its clamped proposal, no overlaps remain, and every
//! item stays inside the container.

use griddeck_layout::{
    CellRect, GridBounds, GridItem, ItemId, Layout, ResolveOutcome, all_overlaps, clamp_rect,
    resolve,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        if min == max {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

// Tall enough that a worst-case cascade (every item piled into one
// column) never saturates vertically; saturation behavior has its own
// unit coverage in the resolver.
const BOUNDS: GridBounds = GridBounds::new(24, 200);

/// Build a starting layout of `n` items stacked in separate rows.
fn stacked_layout(n: usize) -> Layout {
    Layout::from_items((0..n).map(|i| {
        GridItem::new(
            format!("widget-{i:02}"),
            CellRect::new(((i % 4) * 5) as i32, ((i / 4) * 5) as i32, 4, 4),
        )
    }))
}

fn random_proposal(rng: &mut Lcg, current: CellRect) -> CellRect {
    if rng.choose_bool() {
        // Move: anywhere in (and slightly beyond) the container.
        CellRect::new(
            rng.next_i32_range(-4, BOUNDS.max_x + 4),
            rng.next_i32_range(-4, 40),
            current.w,
            current.h,
        )
    } else {
        // Resize: keep the corner, pick a new size.
        current.sized(rng.next_i32_range(1, 8), rng.next_i32_range(1, 8))
    }
}

fn assert_consistent(layout: &Layout, step: usize, seed: u64) {
    assert!(
        all_overlaps(layout).is_empty(),
        "overlaps after step {step} (seed {seed}): {layout:?}"
    );
    for item in layout.items() {
        let rect = item.rect;
        assert!(
            rect.x >= 0 && rect.y >= 0 && rect.right() <= BOUNDS.max_x,
            "item {} escaped horizontally after step {step} (seed {seed})",
            item.id
        );
        assert!(
            rect.bottom() <= BOUNDS.max_y,
            "item {} escaped vertically after step {step} (seed {seed})",
            item.id
        );
        assert!(rect.w >= 1 && rect.h >= 1);
    }
}

fn run_stream(seed: u64, items: usize, steps: usize) {
    let mut rng = Lcg::new(seed);
    let mut layout = stacked_layout(items);
    let ids: Vec<ItemId> = layout.ids().cloned().collect();

    for step in 0..steps {
        let anchor = ids[rng.choose_index(ids.len())].clone();
        let current = layout.get(&anchor).unwrap().rect;
        let proposal = random_proposal(&mut rng, current);

        let mut base = layout.clone();
        base.get_mut(&anchor).unwrap().rect = proposal;

        match resolve(&base, &anchor, BOUNDS).unwrap() {
            ResolveOutcome::Resolved { layout: next, .. } => {
                // The anchor lands exactly where the clamp put it.
                let expected = clamp_rect(proposal.with_min_size(), BOUNDS);
                assert_eq!(
                    next.get(&anchor).unwrap().rect,
                    expected,
                    "anchor displaced at step {step} (seed {seed})"
                );
                assert_consistent(&next, step, seed);
                layout = next;
            }
            ResolveOutcome::Noop { reason, .. } => {
                panic!("unexpected noop ({reason}) at step {step} (seed {seed})");
            }
        }
    }
}

#[test]
fn random_streams_small_layouts() {
    for seed in 0..16 {
        run_stream(seed, 4, 60);
    }
}

#[test]
fn random_streams_medium_layouts() {
    for seed in 16..28 {
        run_stream(seed, 9, 40);
    }
}

#[test]
fn random_streams_dense_layouts() {
    // Sixteen 4x4 items in a 24-wide container leave little slack; the
    // tall bounds keep the cascade from saturating vertically.
    for seed in 100..108 {
        run_stream(seed, 16, 30);
    }
}

#[test]
fn identical_seeds_identical_outcomes() {
    let run = |seed: u64| {
        let mut rng = Lcg::new(seed);
        let mut layout = stacked_layout(6);
        let ids: Vec<ItemId> = layout.ids().cloned().collect();
        for _ in 0..25 {
            let anchor = ids[rng.choose_index(ids.len())].clone();
            let current = layout.get(&anchor).unwrap().rect;
            let proposal = random_proposal(&mut rng, current);
            let mut base = layout.clone();
            base.get_mut(&anchor).unwrap().rect = proposal;
            layout = resolve(&base, &anchor, BOUNDS).unwrap().into_layout();
        }
        layout
    };
    assert_eq!(run(42), run(42));
}
