#![forbid(unsafe_code)]

//! The interaction lifecycle state machine.
//!
//! ```text
//! Idle -> Selected -> Dragging  -> Selected (commit/cancel/abort)
//!                \--> Resizing  -> Selected (commit/cancel/abort)
//! ```
//!
//! [`InteractionController`] owns the committed layout, the ephemeral
//! preview layout, and the selection. Raw gesture events go in; each one
//! yields a deterministic [`Transition`] record. On every tick the
//! committed layout is used as the base for a fresh resolve, so ticks are
//! pure with respect to committed state and the preview is always a full
//! candidate replacement, never a diff.
//!
//! # Invariants
//!
//! 1. The committed layout changes only on commit transitions (gesture
//!    end, nudge). Observers never see a partially-reflowed state.
//! 2. A preview layout exists exactly while a gesture is active.
//! 3. Selection survives gesture end, cancellation, and aborts.
//! 4. Unexpected event orderings produce `Noop` effects with a stated
//!    reason, never panics and never state corruption.
//!
//! # Failure Modes
//!
//! - Reflow divergence aborts the interaction: the preview is discarded,
//!   the committed layout stands, selection is preserved, and the error
//!   rides out in the transition effect.

use std::fmt;

use griddeck_core::{CellRect, GridBounds, GridMetrics, ItemId, Layout};
use griddeck_layout::reflow::{ReflowError, ReflowStats};
use griddeck_layout::resolver::{ResolveOutcome, resolve_with_budget};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::gesture::{CancelReason, GestureEvent, GestureEventError};
use crate::probe::SurfaceProbe;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Lifecycle state of the interaction surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    /// Nothing selected.
    Idle,
    /// An item is selected; no gesture is running.
    Selected { id: ItemId },
    /// A drag is in progress on the selected item.
    Dragging {
        id: ItemId,
        /// The item's committed rect when the drag began; pixel deltas
        /// are applied against this.
        origin: CellRect,
        /// The last cell-space proposal, for the tick short-circuit.
        last_proposal: CellRect,
    },
    /// A resize is in progress on the selected item.
    Resizing {
        id: ItemId,
        origin: CellRect,
        last_proposal: CellRect,
    },
}

impl InteractionState {
    /// The selected item id, in any state that has one.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Selected { id }
            | Self::Dragging { id, .. }
            | Self::Resizing { id, .. } => Some(id),
        }
    }

    /// Whether a drag or resize is running.
    #[must_use]
    pub const fn is_gesture_active(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Resizing { .. })
    }
}

/// Which kind of gesture is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    Drag,
    Resize,
}

// ---------------------------------------------------------------------------
// Effects and transitions
// ---------------------------------------------------------------------------

/// Explicit diagnostics for events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionNoopReason {
    /// No item is selected.
    NoSelection,
    /// The named item does not exist in the committed layout.
    UnknownItem,
    /// A gesture is already running; the event cannot interleave.
    GestureInProgress,
    /// Gesture start named an item other than the selected one.
    NotSelectedItem,
    /// A tick or end arrived with no gesture running.
    NoActiveGesture,
    /// A drag event arrived during a resize, or vice versa.
    GestureMismatch,
    /// The snapped proposal equals the previous one; resolution skipped.
    ProposalUnchanged,
    /// The resolver reported the anchor missing mid-gesture.
    AnchorMissing,
}

/// Effect emitted by one applied event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    Selected {
        id: ItemId,
    },
    SelectionCleared,
    GestureStarted {
        id: ItemId,
        mode: GestureMode,
    },
    /// The preview layout was replaced. `rect` is where the anchor
    /// actually landed after clamping.
    PreviewUpdated {
        id: ItemId,
        rect: CellRect,
        stats: ReflowStats,
    },
    /// The preview became the committed layout.
    Committed {
        id: ItemId,
        rect: CellRect,
        stats: ReflowStats,
    },
    /// A keyboard nudge was resolved straight into the committed layout.
    NudgeApplied {
        id: ItemId,
        rect: CellRect,
        stats: ReflowStats,
    },
    Canceled {
        id: ItemId,
        reason: CancelReason,
    },
    /// The resolver failed; the interaction was aborted and the committed
    /// layout stands.
    Aborted {
        id: ItemId,
        error: ReflowError,
    },
    Noop {
        reason: InteractionNoopReason,
    },
}

/// One state-machine transition with a deterministic sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub sequence: u64,
    pub from: InteractionState,
    pub to: InteractionState,
    pub effect: InteractionEffect,
}

/// Caller-contract violations surfaced by [`InteractionController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionError {
    /// The event payload failed validation.
    InvalidEvent(GestureEventError),
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEvent(source) => write!(f, "invalid gesture event: {source}"),
        }
    }
}

impl std::error::Error for InteractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEvent(source) => Some(source),
        }
    }
}

impl From<GestureEventError> for InteractionError {
    fn from(source: GestureEventError) -> Self {
        Self::InvalidEvent(source)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Selection + drag/resize lifecycle over a committed layout.
#[derive(Debug, Clone)]
pub struct InteractionController {
    committed: Layout,
    preview: Option<Layout>,
    state: InteractionState,
    metrics: GridMetrics,
    push_budget: Option<usize>,
    sequence: u64,
}

impl InteractionController {
    /// Create a controller over an initial committed layout.
    #[must_use]
    pub fn new(committed: Layout, metrics: GridMetrics) -> Self {
        Self {
            committed,
            preview: None,
            state: InteractionState::Idle,
            metrics,
            push_budget: None,
            sequence: 0,
        }
    }

    /// Override the reflow push budget (default: the item count).
    ///
    /// Tests use tiny budgets to exercise the divergence path.
    #[must_use]
    pub fn with_push_budget(mut self, budget: usize) -> Self {
        self.push_budget = Some(budget);
        self
    }

    /// The authoritative layout.
    #[must_use]
    pub fn committed(&self) -> &Layout {
        &self.committed
    }

    /// The in-progress candidate layout, if a gesture is running.
    #[must_use]
    pub fn preview(&self) -> Option<&Layout> {
        self.preview.as_ref()
    }

    /// What a render layer should draw right now.
    #[must_use]
    pub fn visible(&self) -> &Layout {
        self.preview.as_ref().unwrap_or(&self.committed)
    }

    /// The selected item id, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.state.selected_id()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The grid metrics this controller snaps against.
    #[must_use]
    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Apply one gesture event, yielding a transition record.
    ///
    /// `surface` is queried for the container size on every resolving
    /// event; bounds are never cached across ticks.
    pub fn apply(
        &mut self,
        event: &GestureEvent,
        surface: &dyn SurfaceProbe,
    ) -> Result<Transition, InteractionError> {
        event.validate()?;

        let from = self.state.clone();
        let effect = match *event {
            GestureEvent::Select { ref id } => self.on_select(id),
            GestureEvent::ClearSelection => self.on_clear_selection(),
            GestureEvent::DragStart { ref id } => self.on_gesture_start(id, GestureMode::Drag),
            GestureEvent::ResizeStart { ref id } => self.on_gesture_start(id, GestureMode::Resize),
            GestureEvent::DragTick { dx_px, dy_px } => {
                self.on_drag_update(dx_px, dy_px, false, surface)
            }
            GestureEvent::DragEnd { dx_px, dy_px } => {
                self.on_drag_update(dx_px, dy_px, true, surface)
            }
            GestureEvent::ResizeTick {
                width_px,
                height_px,
            } => self.on_resize_update(width_px, height_px, false, surface),
            GestureEvent::ResizeEnd {
                width_px,
                height_px,
            } => self.on_resize_update(width_px, height_px, true, surface),
            GestureEvent::Cancel { reason } => self.on_cancel(reason),
            GestureEvent::Nudge { dx_cells, dy_cells } => {
                self.on_nudge(dx_cells, dy_cells, surface)
            }
        };

        self.sequence += 1;
        let transition = Transition {
            sequence: self.sequence,
            from,
            to: self.state.clone(),
            effect,
        };

        match &transition.effect {
            InteractionEffect::PreviewUpdated { id, rect, stats } => {
                trace!(item = %id, x = rect.x, y = rect.y, pushes = stats.pushes, "preview updated");
            }
            InteractionEffect::Noop { .. } => {}
            effect => {
                debug!(sequence = transition.sequence, ?effect, "interaction transition");
            }
        }

        Ok(transition)
    }

    /// Unconditionally abandon any active gesture, for RAII cleanup paths
    /// where building a proper [`GestureEvent::Cancel`] is not possible.
    ///
    /// Returns `None` when no gesture is running.
    pub fn force_cancel(&mut self) -> Option<Transition> {
        let id = match &self.state {
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => {
                id.clone()
            }
            _ => return None,
        };
        let from = self.state.clone();
        self.preview = None;
        self.state = InteractionState::Selected { id: id.clone() };
        self.sequence += 1;
        Some(Transition {
            sequence: self.sequence,
            from,
            to: self.state.clone(),
            effect: InteractionEffect::Canceled {
                id,
                reason: CancelReason::Programmatic,
            },
        })
    }

    // -- Event handlers -----------------------------------------------------

    fn on_select(&mut self, id: &ItemId) -> InteractionEffect {
        if self.state.is_gesture_active() {
            return noop(InteractionNoopReason::GestureInProgress);
        }
        if !self.committed.contains(id) {
            return noop(InteractionNoopReason::UnknownItem);
        }
        self.state = InteractionState::Selected { id: id.clone() };
        InteractionEffect::Selected { id: id.clone() }
    }

    fn on_clear_selection(&mut self) -> InteractionEffect {
        match self.state {
            InteractionState::Idle => noop(InteractionNoopReason::NoSelection),
            InteractionState::Selected { .. } => {
                self.state = InteractionState::Idle;
                InteractionEffect::SelectionCleared
            }
            _ => noop(InteractionNoopReason::GestureInProgress),
        }
    }

    fn on_gesture_start(&mut self, id: &ItemId, mode: GestureMode) -> InteractionEffect {
        let selected = match &self.state {
            InteractionState::Idle => return noop(InteractionNoopReason::NoSelection),
            InteractionState::Selected { id } => id.clone(),
            _ => return noop(InteractionNoopReason::GestureInProgress),
        };
        if &selected != id {
            return noop(InteractionNoopReason::NotSelectedItem);
        }
        let Some(origin) = self.committed.get(id).map(|item| item.rect) else {
            return noop(InteractionNoopReason::UnknownItem);
        };
        self.state = match mode {
            GestureMode::Drag => InteractionState::Dragging {
                id: id.clone(),
                origin,
                last_proposal: origin,
            },
            GestureMode::Resize => InteractionState::Resizing {
                id: id.clone(),
                origin,
                last_proposal: origin,
            },
        };
        // The preview exists for the whole gesture; until the first
        // effective tick it is simply a copy of the committed layout.
        self.preview = Some(self.committed.clone());
        InteractionEffect::GestureStarted {
            id: id.clone(),
            mode,
        }
    }

    fn on_drag_update(
        &mut self,
        dx_px: i32,
        dy_px: i32,
        commit: bool,
        surface: &dyn SurfaceProbe,
    ) -> InteractionEffect {
        let (id, origin, last) = match &self.state {
            InteractionState::Dragging {
                id,
                origin,
                last_proposal,
            } => (id.clone(), *origin, *last_proposal),
            InteractionState::Resizing { .. } => {
                return noop(InteractionNoopReason::GestureMismatch);
            }
            _ => return noop(InteractionNoopReason::NoActiveGesture),
        };

        let proposal = origin.translated(
            self.metrics.pixel_to_cell(dx_px),
            self.metrics.pixel_to_cell(dy_px),
        );
        if !commit && proposal == last {
            return noop(InteractionNoopReason::ProposalUnchanged);
        }
        self.resolve_gesture(id, origin, proposal, GestureMode::Drag, commit, surface)
    }

    fn on_resize_update(
        &mut self,
        width_px: i32,
        height_px: i32,
        commit: bool,
        surface: &dyn SurfaceProbe,
    ) -> InteractionEffect {
        let (id, origin, last) = match &self.state {
            InteractionState::Resizing {
                id,
                origin,
                last_proposal,
            } => (id.clone(), *origin, *last_proposal),
            InteractionState::Dragging { .. } => {
                return noop(InteractionNoopReason::GestureMismatch);
            }
            _ => return noop(InteractionNoopReason::NoActiveGesture),
        };

        // Minimum item size is one cell each way.
        let proposal = origin.sized(
            self.metrics.pixel_to_cell(width_px).max(1),
            self.metrics.pixel_to_cell(height_px).max(1),
        );
        if !commit && proposal == last {
            return noop(InteractionNoopReason::ProposalUnchanged);
        }
        self.resolve_gesture(id, origin, proposal, GestureMode::Resize, commit, surface)
    }

    fn on_cancel(&mut self, reason: CancelReason) -> InteractionEffect {
        let id = match &self.state {
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => {
                id.clone()
            }
            _ => return noop(InteractionNoopReason::NoActiveGesture),
        };
        self.preview = None;
        self.state = InteractionState::Selected { id: id.clone() };
        InteractionEffect::Canceled { id, reason }
    }

    fn on_nudge(&mut self, dx_cells: i32, dy_cells: i32, surface: &dyn SurfaceProbe) -> InteractionEffect {
        let id = match &self.state {
            InteractionState::Idle => return noop(InteractionNoopReason::NoSelection),
            InteractionState::Selected { id } => id.clone(),
            _ => return noop(InteractionNoopReason::GestureInProgress),
        };
        let Some(origin) = self.committed.get(&id).map(|item| item.rect) else {
            return noop(InteractionNoopReason::UnknownItem);
        };
        if dx_cells == 0 && dy_cells == 0 {
            return noop(InteractionNoopReason::ProposalUnchanged);
        }

        let proposal = origin.translated(dx_cells, dy_cells);
        let bounds = self.bounds(surface);
        let mut base = self.committed.clone();
        if let Some(item) = base.get_mut(&id) {
            item.rect = proposal;
        }
        let budget = self.push_budget.unwrap_or(base.len());

        match resolve_with_budget(&base, &id, bounds, budget) {
            Ok(ResolveOutcome::Resolved { layout, stats }) => {
                let rect = layout.get(&id).map_or(proposal, |item| item.rect);
                self.committed = layout;
                InteractionEffect::NudgeApplied { id, rect, stats }
            }
            Ok(ResolveOutcome::Noop { .. }) => {
                warn!(item = %id, "resolve reported a missing anchor during nudge");
                noop(InteractionNoopReason::AnchorMissing)
            }
            Err(error) => {
                warn!(item = %id, %error, "reflow diverged; nudge dropped");
                InteractionEffect::Aborted { id, error }
            }
        }
    }

    // -- Resolution ---------------------------------------------------------

    fn resolve_gesture(
        &mut self,
        id: ItemId,
        origin: CellRect,
        proposal: CellRect,
        mode: GestureMode,
        commit: bool,
        surface: &dyn SurfaceProbe,
    ) -> InteractionEffect {
        let bounds = self.bounds(surface);
        let mut base = self.committed.clone();
        if let Some(item) = base.get_mut(&id) {
            item.rect = proposal;
        }
        let budget = self.push_budget.unwrap_or(base.len());

        match resolve_with_budget(&base, &id, bounds, budget) {
            Ok(ResolveOutcome::Resolved { layout, stats }) => {
                let rect = layout.get(&id).map_or(proposal, |item| item.rect);
                if commit {
                    self.committed = layout;
                    self.preview = None;
                    self.state = InteractionState::Selected { id: id.clone() };
                    InteractionEffect::Committed { id, rect, stats }
                } else {
                    self.preview = Some(layout);
                    self.state = match mode {
                        GestureMode::Drag => InteractionState::Dragging {
                            id: id.clone(),
                            origin,
                            last_proposal: proposal,
                        },
                        GestureMode::Resize => InteractionState::Resizing {
                            id: id.clone(),
                            origin,
                            last_proposal: proposal,
                        },
                    };
                    InteractionEffect::PreviewUpdated { id, rect, stats }
                }
            }
            Ok(ResolveOutcome::Noop { .. }) => {
                // The anchor was validated at gesture start; reaching this
                // means the committed layout changed underneath the gesture.
                self.preview = None;
                self.state = InteractionState::Selected { id: id.clone() };
                warn!(item = %id, "resolve reported a missing anchor mid-gesture");
                noop(InteractionNoopReason::AnchorMissing)
            }
            Err(error) => {
                self.preview = None;
                self.state = InteractionState::Selected { id: id.clone() };
                warn!(item = %id, %error, "reflow diverged; interaction aborted");
                InteractionEffect::Aborted { id, error }
            }
        }
    }

    fn bounds(&self, surface: &dyn SurfaceProbe) -> GridBounds {
        let (width_px, height_px) = surface.size_px();
        GridBounds::from_pixel_size(&self.metrics, width_px, height_px)
    }
}

const fn noop(reason: InteractionNoopReason) -> InteractionEffect {
    InteractionEffect::Noop { reason }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
