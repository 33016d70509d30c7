// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Which way the next double-tap toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum DoubleTapDirection {
    /// Next double-tap zooms in to the configured target.
    #[default]
    ZoomIn,
    /// Next double-tap returns to the fit scale.
    ZoomOut,
}

/// Transient state for one continuous gesture.
///
/// Created implicitly at gesture start and cleared at gesture end; never
/// persisted. The pinch flags gate concurrent scroll/fling input, and
/// `user_scaled` records whether the user changed the zoom since the last
/// layout pass (which decides between reset-to-default and
/// preserve-visual-zoom on resize).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GestureSession {
    /// A pinch gesture is between its begin and end notifications.
    pub(crate) pinch_active: bool,
    /// The first pinch step of the session was seen; later steps apply.
    pub(crate) pinch_armed: bool,
    /// Pointers currently down on the surface.
    pub(crate) pointer_count: u32,
    /// The user scaled or scrolled since the last layout pass.
    pub(crate) user_scaled: bool,
    /// Double-tap toggle direction, flipped on each zoom-in.
    pub(crate) double_tap_direction: DoubleTapDirection,
    /// A double-tap transition is in flight for the current touch.
    pub(crate) double_tapping: bool,
}

impl GestureSession {
    /// Clears the pinch-session flags.
    pub(crate) fn end_pinch(&mut self) {
        self.pinch_active = false;
        self.pinch_armed = false;
    }
}
