#![forbid(unsafe_code)]

//! GridDeck Runtime
//!
//! This crate ties the geometry and resolution crates into the
//! interaction lifecycle a dashboard surface actually runs: select an
//! item, drag or resize it through a live preview, commit on release.
//!
//! # Key Components
//!
//! - [`InteractionController`] - the selection + drag/resize state machine
//! - [`GestureEvent`] - the gesture-provider input contract (raw pixels)
//! - [`SurfaceProbe`] - the container-size query contract
//!
//! # Role in GridDeck
//! `griddeck-runtime` is the orchestrator. It consumes raw gesture events
//! from whatever pointer layer the host embeds, snaps them to cells via
//! `griddeck-core`, resolves proposals via `griddeck-layout`, and exposes
//! the committed and preview layouts for a render layer to consume.
//! Rendering consumes this state; it never drives it.

pub mod controller;
pub mod gesture;
pub mod probe;

pub use controller::{
    GestureMode, InteractionController, InteractionEffect, InteractionError,
    InteractionNoopReason, InteractionState, Transition,
};
pub use gesture::{CancelReason, GestureEvent, GestureEventError};
pub use probe::{FixedSurface, SurfaceProbe};
