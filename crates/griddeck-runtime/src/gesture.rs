#![forbid(unsafe_code)]

//! The gesture-provider input contract.
//!
//! [`GestureEvent`] is what the host's pointer layer feeds the
//! controller. Payloads are raw pixel measurements in surface screen
//! space; the provider knows nothing about cells, and all snapping
//! happens inside the controller.
//!
//! # Invariants
//!
//! 1. Drag deltas accumulate from the gesture's start position, so each
//!    tick carries the total displacement, not an increment.
//! 2. Resize payloads are the item's proposed total pixel size, never
//!    negative.
//! 3. Every gesture sequence is well-formed from the controller's view:
//!    malformed orderings (a tick with no active gesture, a start without
//!    selection) are absorbed as explicit no-ops, never panics.

use std::fmt;

use griddeck_core::ItemId;
use serde::{Deserialize, Serialize};

/// Why an active gesture was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The user pressed Escape (or an equivalent abort key).
    UserEscape,
    /// The surface lost focus mid-gesture.
    FocusLost,
    /// Host-initiated cleanup (teardown, guard drop).
    Programmatic,
}

/// One raw input event from the gesture provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    /// The user picked an item.
    Select { id: ItemId },
    /// The user clicked outside any item.
    ClearSelection,
    /// A drag handle went down on the selected item.
    DragStart { id: ItemId },
    /// Live drag update: total pixel displacement since the drag began.
    DragTick { dx_px: i32, dy_px: i32 },
    /// Drag release: final total pixel displacement.
    DragEnd { dx_px: i32, dy_px: i32 },
    /// A resize handle went down on the selected item.
    ResizeStart { id: ItemId },
    /// Live resize update: proposed total pixel size.
    ResizeTick { width_px: i32, height_px: i32 },
    /// Resize release: final proposed pixel size.
    ResizeEnd { width_px: i32, height_px: i32 },
    /// Abandon the active gesture.
    Cancel { reason: CancelReason },
    /// Move the selected item by whole cells (keyboard arrows).
    Nudge { dx_cells: i32, dy_cells: i32 },
}

impl GestureEvent {
    /// Check provider-contract constraints on the payload.
    pub fn validate(&self) -> Result<(), GestureEventError> {
        match *self {
            Self::ResizeTick {
                width_px,
                height_px,
            }
            | Self::ResizeEnd {
                width_px,
                height_px,
            } => {
                if width_px < 0 || height_px < 0 {
                    return Err(GestureEventError::NegativeResize {
                        width_px,
                        height_px,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Contract violations in a provider event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureEventError {
    /// A resize payload carried a negative dimension.
    NegativeResize { width_px: i32, height_px: i32 },
}

impl fmt::Display for GestureEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeResize {
                width_px,
                height_px,
            } => {
                write!(
                    f,
                    "resize payload must be non-negative, got {width_px}x{height_px}"
                )
            }
        }
    }
}

impl std::error::Error for GestureEventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_resize_rejected() {
        let event = GestureEvent::ResizeTick {
            width_px: -10,
            height_px: 40,
        };
        assert!(matches!(
            event.validate(),
            Err(GestureEventError::NegativeResize { .. })
        ));
        let event = GestureEvent::ResizeEnd {
            width_px: 40,
            height_px: -1,
        };
        assert!(event.validate().is_err());
    }

    #[test]
    fn drags_and_nudges_accept_any_delta() {
        assert!(
            GestureEvent::DragTick {
                dx_px: -500,
                dy_px: 10_000
            }
            .validate()
            .is_ok()
        );
        assert!(
            GestureEvent::Nudge {
                dx_cells: -3,
                dy_cells: 0
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn event_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&GestureEvent::DragTick { dx_px: 3, dy_px: -4 }).unwrap();
        assert!(json.contains("\"drag_tick\""));
        let back: GestureEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GestureEvent::DragTick { dx_px: 3, dy_px: -4 });
    }
}
