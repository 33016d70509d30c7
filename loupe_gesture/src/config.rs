// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bitflags::bitflags;

bitflags! {
    /// Which gesture families the controller responds to.
    ///
    /// Operations whose family is disabled refuse with a no-op `false`
    /// return; they never error.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GestureFlags: u8 {
        /// Pinch-zoom steps.
        const SCALE = 1 << 0;
        /// Pan and fling scrolling.
        const SCROLL = 1 << 1;
        /// Double-tap zoom toggling.
        const DOUBLE_TAP = 1 << 2;
    }
}

impl Default for GestureFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Tunable constants of the zoom/pan engine.
///
/// The velocity threshold and the max-scale floor are empirical values tuned
/// against a particular display density; their derivation is undocumented
/// upstream, so they are carried here as tunables rather than re-derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Velocity (units/s) above which a fling with nowhere to scroll is
    /// reinterpreted as a dismissal gesture, and below which a fling is not
    /// animated at all.
    pub fling_close_velocity: f64,
    /// Lower bound applied to the computed maximum scale. The ratio-based
    /// formula collapses below 1 for content small relative to the viewport,
    /// which would otherwise disable zoom-in entirely.
    pub max_scale_floor: f64,
    /// Multiplier on the larger content/viewport ratio when computing the
    /// default maximum scale.
    pub max_scale_ratio: f64,
    /// How far below the minimum scale a pinch may transiently push before
    /// being floored, to avoid jitter at the boundary mid-gesture.
    pub pinch_undershoot: f64,
    /// Scales within this distance of the minimum are treated as "resting at
    /// minimum" when rescaling across a layout change.
    pub min_snap_epsilon: f64,
    /// The zoomed-in target of the double-tap toggle.
    pub double_tap_scale: f64,
    /// Duration of the double-tap zoom transition.
    pub double_tap_duration_ms: f64,
    /// Duration of the decelerating scroll after a fling release.
    pub fling_duration_ms: f64,
    /// Duration of the snap-back applied when a gesture ends below the
    /// minimum scale.
    pub snap_duration_ms: f64,
    /// Slack in viewport pixels before an edge counts as scrollable in
    /// [`can_scroll`](crate::ZoomPanController::can_scroll).
    pub scroll_slack: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            fling_close_velocity: 800.0,
            max_scale_floor: 4.0,
            max_scale_ratio: 8.0,
            pinch_undershoot: 0.1,
            min_snap_epsilon: 0.001,
            double_tap_scale: 2.0,
            double_tap_duration_ms: 200.0,
            fling_duration_ms: 300.0,
            snap_duration_ms: 50.0,
            scroll_slack: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureConfig, GestureFlags};

    #[test]
    fn all_gestures_enabled_by_default() {
        let flags = GestureFlags::default();
        assert!(flags.contains(GestureFlags::SCALE));
        assert!(flags.contains(GestureFlags::SCROLL));
        assert!(flags.contains(GestureFlags::DOUBLE_TAP));
    }

    #[test]
    fn default_config_carries_the_empirical_constants() {
        let config = GestureConfig::default();
        assert_eq!(config.fling_close_velocity, 800.0);
        assert_eq!(config.max_scale_floor, 4.0);
        assert_eq!(config.double_tap_scale, 2.0);
    }
}
