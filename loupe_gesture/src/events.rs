// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use smallvec::SmallVec;

/// Where the current scale sits relative to the initial scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScaleState {
    /// Current scale equals the initial scale for the active display mode.
    #[default]
    NoScale,
    /// Current scale is above the initial scale.
    ScaleUp,
    /// Current scale is below the initial scale.
    ScaleDown,
}

/// Events emitted by the controller for the embedding host.
///
/// Mutating operations push events here instead of invoking listener
/// interfaces; the host drains them with
/// [`take_events`](crate::ZoomPanController::take_events) after each call, on
/// the same serialized thread that performed the mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// The rounded scale crossed the initial scale in either direction.
    ScaleStateChanged(ScaleState),
    /// New content was assigned (or cleared).
    ContentChanged,
    /// The fit was recomputed after a viewport, content, or display-mode
    /// change; carries the viewport rectangle the fit was computed against.
    LayoutChanged(Rect),
    /// A fling with nowhere to scroll was reinterpreted as a dismissal.
    FlingClose,
}

/// Drained event queue; inline up to the handful of events one operation can
/// produce.
pub type Events = SmallVec<[GestureEvent; 4]>;
