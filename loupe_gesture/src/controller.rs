// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use loupe_animation::{AnimationDriver, Easing, Step};
use loupe_transform::{
    DisplayMode, GeometryKind, InvalidGeometry, TransformState, content_rect, default_scale,
    fit_matrix, round_scale,
};

use crate::bounds::ScaleBounds;
use crate::config::{GestureConfig, GestureFlags};
use crate::events::{Events, GestureEvent, ScaleState};
use crate::session::{DoubleTapDirection, GestureSession};

/// The animation currently driven by [`ZoomPanController::animation_tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum ActiveAnimation {
    /// Eased zoom toward a target scale about a fixed focal point.
    ZoomTo {
        focal: Point,
    },
    /// Decelerating scroll release; `applied` tracks how much of the eased
    /// total displacement has been panned so far.
    Fling {
        total: Vec2,
        applied: Vec2,
    },
}

/// Gesture-driven zoom/pan controller over a content surface in a viewport.
///
/// The controller consumes pre-classified gesture intents (pan deltas, pinch
/// steps, flings, double-taps) and layout events, mutates the underlying
/// [`TransformState`] under scale and bound constraints, and exposes the
/// composed transform for rendering. All operations are expected on a single
/// logical thread of gesture dispatch; the controller holds no locks and the
/// host reads a snapshot after each call.
///
/// Gesture refusals (disabled family, multiple pointers, mid-pinch, no
/// content) are reported as no-op `false` returns. The only hard failure is
/// [`InvalidGeometry`] at the two boundary operations.
#[derive(Clone, Debug)]
pub struct ZoomPanController {
    config: GestureConfig,
    gestures: GestureFlags,
    viewport: Size,
    content: Option<Size>,
    mode: DisplayMode,
    transform: TransformState,
    bounds: ScaleBounds,
    session: GestureSession,
    init_scale: f64,
    scale_state: ScaleState,
    driver: AnimationDriver,
    animation: Option<ActiveAnimation>,
    next_matrix: Option<Affine>,
    content_changed: bool,
    mode_changed: bool,
    events: Events,
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomPanController {
    /// Creates an idle controller with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Creates an idle controller with an explicit configuration.
    #[must_use]
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            gestures: GestureFlags::default(),
            viewport: Size::ZERO,
            content: None,
            mode: DisplayMode::default(),
            transform: TransformState::new(),
            bounds: ScaleBounds::default(),
            session: GestureSession::default(),
            init_scale: 1.0,
            scale_state: ScaleState::default(),
            driver: AnimationDriver::new(),
            animation: None,
            next_matrix: None,
            content_changed: false,
            mode_changed: false,
            events: Events::new(),
        }
    }

    /// Returns the current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Returns the intrinsic content size, if content is set.
    #[must_use]
    pub fn content(&self) -> Option<Size> {
        self.content
    }

    /// Returns the active display mode.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Returns the enabled gesture families.
    #[must_use]
    pub fn gestures(&self) -> GestureFlags {
        self.gestures
    }

    /// Replaces the enabled gesture families.
    pub fn set_gestures(&mut self, gestures: GestureFlags) {
        self.gestures = gestures;
    }

    /// Returns the tunable configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Mutable access to the tunable configuration.
    pub fn config_mut(&mut self) -> &mut GestureConfig {
        &mut self.config
    }

    /// Returns the composed content-to-viewport transform for rendering.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform.composed()
    }

    /// Returns the supplementary pan/zoom matrix.
    ///
    /// Re-supply this as `initial` to the next [`set_content`] call to
    /// restore the same visual state for new content.
    ///
    /// [`set_content`]: Self::set_content
    #[must_use]
    pub fn display_matrix(&self) -> Affine {
        self.transform.supplementary()
    }

    /// Returns the current (rounded) user scale; `1.0` is "exactly the fit".
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    /// Returns the scale established by the last layout pass.
    #[must_use]
    pub fn init_scale(&self) -> f64 {
        self.init_scale
    }

    /// Returns the effective minimum scale.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        let base_scale = self.content.map(|_| self.transform.base_scale());
        self.bounds.min_scale(base_scale)
    }

    /// Returns the effective maximum scale.
    #[must_use]
    pub fn max_scale(&self) -> f64 {
        self.bounds.max_scale(
            self.viewport,
            self.content,
            self.config.max_scale_ratio,
            self.config.max_scale_floor,
        )
    }

    /// Pins both scale limits, normalizing their order.
    ///
    /// Pinned limits survive content, viewport, and display-mode changes
    /// until [`set_content`](Self::set_content) replaces or drops them.
    pub fn set_scale_limits(&mut self, min: f64, max: f64) {
        self.bounds.pin(min, max, self.mode);
    }

    /// Returns where the current scale sits relative to the initial scale.
    #[must_use]
    pub fn scale_state(&self) -> ScaleState {
        self.scale_state
    }

    /// Returns `true` while an eased transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Drains the events produced since the last call.
    pub fn take_events(&mut self) -> Events {
        mem::take(&mut self.events)
    }

    /// Replaces the content, optionally restoring a previous pan/zoom state
    /// and pinning explicit scale limits.
    ///
    /// Passing `None` content clears the surface. When `initial` is given,
    /// the supplementary matrix is reconstructed from it instead of reset to
    /// identity, preserving pan/zoom across content swaps. Explicit limits
    /// are only pinned when both are supplied; otherwise any previous pins
    /// are dropped and limits fall back to derived values.
    ///
    /// The fit recompute runs immediately when the viewport is known, or is
    /// deferred to the first [`on_viewport_changed`](Self::on_viewport_changed)
    /// otherwise.
    pub fn set_content(
        &mut self,
        content: Option<Size>,
        initial: Option<Affine>,
        min_scale: Option<f64>,
        max_scale: Option<f64>,
    ) -> Result<(), InvalidGeometry> {
        if let Some(size) = content {
            InvalidGeometry::check(GeometryKind::Content, size)?;
        }

        self.content = content;
        if content.is_none() {
            self.transform.reset();
        }

        match (min_scale, max_scale) {
            (Some(min), Some(max)) => self.bounds.pin(min, max, self.mode),
            _ => self.bounds.unpin(),
        }

        self.next_matrix = if content.is_some() { initial } else { None };
        self.content_changed = true;
        if self.viewport_is_valid() {
            self.relayout(false, Vec2::ZERO);
        }
        Ok(())
    }

    /// Changes the display mode, scheduling a fit recompute.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.session.user_scaled = false;
        self.mode_changed = true;
        if self.viewport_is_valid() {
            self.relayout(false, Vec2::ZERO);
        }
    }

    /// Handles a resize of the hosting surface.
    ///
    /// Recomputes the base fit. If the user has not scaled since the last
    /// layout the scale resets to the display mode's default; otherwise the
    /// *visual* zoom level is preserved across the base-scale change, except
    /// that a scale resting at the old minimum snaps to the new minimum. The
    /// result is then clamped and re-centered.
    pub fn on_viewport_changed(&mut self, width: u32, height: u32) -> Result<(), InvalidGeometry> {
        let new = Size::new(f64::from(width), f64::from(height));
        InvalidGeometry::check(GeometryKind::Viewport, new)?;

        let changed = new != self.viewport;
        let delta = if self.viewport_is_valid() && changed {
            Vec2::new(new.width - self.viewport.width, new.height - self.viewport.height)
        } else {
            Vec2::ZERO
        };
        self.viewport = new;
        self.relayout(changed, delta);
        Ok(())
    }

    /// Pans the content by `(dx, dy)` viewport pixels, clamped to bounds.
    ///
    /// Per axis, content that already fits stays centered (the delta is
    /// zeroed); overflowing content scrolls until its edge reaches the
    /// viewport edge. Returns `false` without effect when scrolling is
    /// disabled, more than one pointer is down, a pinch is in progress, or no
    /// content is set.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.gestures.contains(GestureFlags::SCROLL)
            || self.session.pointer_count > 1
            || self.session.pinch_active
            || self.content.is_none()
        {
            return false;
        }
        self.session.user_scaled = true;
        self.pan_by(Vec2::new(dx, dy));
        true
    }

    /// Marks the start of a pinch session.
    pub fn pinch_begin(&mut self) {
        self.session.pinch_active = true;
        self.session.pinch_armed = false;
    }

    /// Applies one incremental pinch step about `focal`.
    ///
    /// The target scale is the current scale times `scale_factor`, floored at
    /// `min_scale - pinch_undershoot` (the transient mid-gesture tolerance)
    /// and capped at `max_scale`. The first step of a session only arms the
    /// pinch, and steps with zero span delta are ignored.
    pub fn pinch_step(&mut self, scale_factor: f64, focal: Point, span_delta: f64) -> bool {
        if !self.gestures.contains(GestureFlags::SCALE)
            || !self.session.pinch_active
            || self.content.is_none()
        {
            return false;
        }
        if !self.session.pinch_armed {
            self.session.pinch_armed = true;
            return false;
        }
        if span_delta == 0.0 {
            return false;
        }

        self.session.user_scaled = true;
        let floor = self.min_scale() - self.config.pinch_undershoot;
        let max = self.max_scale();
        let mut target = self.scale() * scale_factor;
        if target < floor {
            target = floor;
        }
        if target > max {
            target = max;
        }
        self.zoom_to_about(target, focal);
        self.session.double_tap_direction = DoubleTapDirection::ZoomIn;
        self.update_scale_state();
        true
    }

    /// Marks the end of a pinch session.
    ///
    /// If the gesture left the scale below the minimum, an animated snap back
    /// to the minimum is started.
    pub fn pinch_end(&mut self, now_ms: f64) {
        self.session.end_pinch();
        self.snap_to_min_scale(now_ms);
    }

    /// Handles a fling release with the given velocity and total finger
    /// displacement.
    ///
    /// A fast fling while the content sits at its minimum scale has nowhere
    /// to scroll and is reinterpreted as a dismissal: [`GestureEvent::FlingClose`]
    /// is emitted and `false` is returned (the fling is not consumed as a
    /// pan). Otherwise a fast fling starts a decelerating scroll over half
    /// the displacement and returns `true`.
    pub fn fling_by(
        &mut self,
        velocity_x: f64,
        velocity_y: f64,
        displacement_x: f64,
        displacement_y: f64,
        now_ms: f64,
    ) -> bool {
        if self.content.is_none() {
            return false;
        }
        let fast = velocity_x.abs() > self.config.fling_close_velocity
            || velocity_y.abs() > self.config.fling_close_velocity;
        if fast && self.scale() == self.min_scale() {
            self.events.push(GestureEvent::FlingClose);
            return false;
        }
        if !self.gestures.contains(GestureFlags::SCROLL)
            || self.session.pointer_count > 1
            || self.session.pinch_active
            || self.scale() == 1.0
            || !fast
        {
            return false;
        }

        self.session.user_scaled = true;
        let total = Vec2::new(displacement_x / 2.0, displacement_y / 2.0);
        self.driver.start(0.0, 1.0, now_ms, self.config.fling_duration_ms, Easing::CubicOut);
        self.animation = Some(ActiveAnimation::Fling {
            total,
            applied: Vec2::ZERO,
        });
        true
    }

    /// Toggles the double-tap zoom about `focal` and returns the target
    /// scale.
    ///
    /// From the non-zoomed state the first double-tap zooms to the configured
    /// target, the next returns to the fit, alternating independently of any
    /// intermediate pinch zoom (which resets the toggle to zoom-in). The
    /// target is clamped into the scale bounds before the transition starts.
    pub fn double_tap_zoom(&mut self, focal: Point, now_ms: f64) -> f64 {
        self.session.double_tapping = true;
        if !self.gestures.contains(GestureFlags::DOUBLE_TAP) || self.content.is_none() {
            return self.scale();
        }

        self.session.user_scaled = true;
        let mut target = self.next_double_tap_scale();
        let min = self.min_scale();
        let max = self.max_scale();
        if target < min {
            target = min;
        }
        if target > max {
            target = max;
        }
        self.start_zoom_animation(
            target,
            focal,
            self.config.double_tap_duration_ms,
            Easing::CubicInOut,
            now_ms,
        );
        target
    }

    /// Starts an eased zoom to `scale` about the viewport center.
    pub fn zoom_to_animated(&mut self, scale: f64, duration_ms: f64, now_ms: f64) {
        self.start_zoom_animation(
            scale,
            self.viewport_center(),
            duration_ms,
            Easing::CubicInOut,
            now_ms,
        );
    }

    /// Notifies the controller that a touch went down.
    ///
    /// Cancels an in-flight zoom transition so the user takes over from the
    /// current visual state, unless the transition is the double-tap the
    /// touch belongs to.
    pub fn touch_began(&mut self) {
        if !self.session.double_tapping
            && matches!(self.animation, Some(ActiveAnimation::ZoomTo { .. }))
        {
            self.driver.cancel();
            self.animation = None;
        }
    }

    /// Notifies the controller that the last touch lifted.
    ///
    /// Snaps the scale back to the minimum (animated) if a gesture left it
    /// below, and closes the double-tap session.
    pub fn touch_ended(&mut self, now_ms: f64) {
        self.snap_to_min_scale(now_ms);
        self.session.double_tapping = false;
    }

    /// Updates the number of pointers currently down.
    pub fn set_pointer_count(&mut self, count: u32) {
        self.session.pointer_count = count;
    }

    /// Advances the active animation, applying one eased step.
    ///
    /// Returns `true` while a run remains active (the host should schedule
    /// another tick). On zoom completion the scale is re-snapped to the
    /// minimum if a transient excursion left it below; on fling completion
    /// the content settles with a final clamp-and-center.
    pub fn animation_tick(&mut self, now_ms: f64) -> bool {
        let Some(kind) = self.animation else {
            return false;
        };
        match self.driver.tick(now_ms) {
            None => {
                self.animation = None;
                false
            }
            Some(Step::Running(value)) => {
                self.apply_animation_value(kind, value);
                true
            }
            Some(Step::Finished(value)) => {
                self.apply_animation_value(kind, value);
                self.animation = None;
                match kind {
                    ActiveAnimation::ZoomTo { .. } => {
                        self.snap_to_min_scale(now_ms);
                        self.update_scale_state();
                    }
                    ActiveAnimation::Fling { .. } => {
                        self.center(true, true);
                    }
                }
                self.animation.is_some()
            }
        }
    }

    /// Reports whether content remains beyond the viewport edge in the given
    /// horizontal direction.
    ///
    /// Positive `direction` asks for headroom past the right edge (content
    /// moving left), negative past the left edge. Useful for embedding in
    /// paged containers that need to know when to take over a swipe.
    #[must_use]
    pub fn can_scroll(&self, direction: i32) -> bool {
        let Some(content) = self.content else {
            return false;
        };
        let rect = content_rect(&self.transform.composed(), content);
        if direction > 0 {
            rect.max_x() - self.viewport.width > self.config.scroll_slack
        } else {
            -rect.min_x() > self.config.scroll_slack
        }
    }

    fn viewport_is_valid(&self) -> bool {
        self.viewport.width > 0.0 && self.viewport.height > 0.0
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn viewport_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.viewport)
    }

    /// The layout pass: recomputes the base fit and reconciles the
    /// supplementary scale with it.
    fn relayout(&mut self, size_changed: bool, delta: Vec2) {
        if !(size_changed || self.content_changed || self.mode_changed) {
            return;
        }
        let viewport_rect = self.viewport_rect();

        let Some(content) = self.content else {
            if self.content_changed {
                self.events.push(GestureEvent::ContentChanged);
            }
            self.events.push(GestureEvent::LayoutChanged(viewport_rect));
            self.content_changed = false;
            self.mode_changed = false;
            return;
        };

        let old_base_scale = self.transform.base_scale();
        let old_scale = self.transform.scale();
        let old_min_scale = round_scale((1.0 / old_base_scale).min(1.0));

        self.transform.set_base(fit_matrix(self.viewport, content));
        let new_base_scale = self.transform.base_scale();

        let target = if self.content_changed || self.mode_changed {
            if let Some(matrix) = self.next_matrix.take() {
                self.transform.set_supplementary(matrix);
                self.transform.scale()
            } else {
                self.transform.reset_supplementary();
                let target = default_scale(self.mode, new_base_scale);
                if round_scale(target) != self.transform.scale() {
                    self.zoom_to_clamped(target);
                }
                target
            }
        } else {
            // Only the viewport size changed.
            self.transform.post_translate(-delta);
            let target = if !self.session.user_scaled {
                default_scale(self.mode, new_base_scale)
            } else if (old_scale - old_min_scale).abs() <= self.config.min_snap_epsilon {
                // Resting at the old minimum: snap to the new minimum instead
                // of drifting through the ratio formula.
                self.min_scale()
            } else {
                (old_base_scale / new_base_scale) * old_scale
            };
            self.zoom_to_clamped(target);
            target
        };

        self.session.user_scaled = false;

        let scale = self.scale();
        if scale > self.max_scale() || scale < self.min_scale() {
            self.zoom_to_clamped(scale);
        }
        self.center(true, true);

        if self.content_changed {
            self.events.push(GestureEvent::ContentChanged);
        }
        self.events.push(GestureEvent::LayoutChanged(viewport_rect));
        self.content_changed = false;
        self.mode_changed = false;

        self.init_scale = round_scale(target);
        self.scale_state = self.compare_scale_state();
    }

    /// Zooms to `scale` clamped into both bounds, about the viewport center.
    fn zoom_to_clamped(&mut self, scale: f64) {
        let min = self.min_scale();
        let max = self.max_scale();
        let mut scale = scale;
        if scale > max {
            scale = max;
        }
        if scale < min {
            scale = min;
        }
        self.zoom_to_about(scale, self.viewport_center());
    }

    /// Zooms to `scale` (capped at the maximum only) about `focal`, then
    /// re-centers.
    fn zoom_to_about(&mut self, scale: f64, focal: Point) {
        let max = self.max_scale();
        let target = if scale > max { max } else { scale };
        let old = self.scale();
        if old > 0.0 {
            self.transform.post_scale(target / old, focal);
        }
        self.center(true, true);
    }

    /// Translates by `delta` clamped against the viewport, then re-centers
    /// whichever axis the content fully fits.
    fn pan_by(&mut self, delta: Vec2) {
        let Some(content) = self.content else {
            return;
        };
        let rect = content_rect(&self.transform.composed(), content);
        let clamped = self.clamped_pan_delta(rect, delta);
        self.transform.post_translate(clamped);
        self.center(true, true);
    }

    /// The bounds-clamp rule, applied per axis to a proposed scroll delta.
    fn clamped_pan_delta(&self, rect: Rect, delta: Vec2) -> Vec2 {
        let vw = self.viewport.width;
        let vh = self.viewport.height;
        let mut dx = delta.x;
        let mut dy = delta.y;

        // An axis the content already fits is centered, not pannable.
        if rect.min_x() >= 0.0 && rect.max_x() <= vw {
            dx = 0.0;
        } else {
            if rect.min_x() + dx > 0.0 {
                dx = -rect.min_x();
            }
            if rect.max_x() + dx < vw {
                dx = vw - rect.max_x();
            }
        }
        if rect.min_y() >= 0.0 && rect.max_y() <= vh {
            dy = 0.0;
        } else {
            if rect.min_y() + dy > 0.0 {
                dy = -rect.min_y();
            }
            if rect.max_y() + dy < vh {
                dy = vh - rect.max_y();
            }
        }
        Vec2::new(dx, dy)
    }

    /// Translates so the content is centered on any axis it fits, and never
    /// reveals empty space on an axis it overflows.
    fn center(&mut self, horizontal: bool, vertical: bool) {
        let offset = self.center_offset(horizontal, vertical);
        self.transform.post_translate(offset);
    }

    fn center_offset(&self, horizontal: bool, vertical: bool) -> Vec2 {
        let Some(content) = self.content else {
            return Vec2::ZERO;
        };
        let rect = content_rect(&self.transform.composed(), content);
        let mut dx = 0.0;
        let mut dy = 0.0;
        if vertical {
            let vh = self.viewport.height;
            if rect.height() < vh {
                dy = (vh - rect.height()) / 2.0 - rect.min_y();
            } else if rect.min_y() > 0.0 {
                dy = -rect.min_y();
            } else if rect.max_y() < vh {
                dy = vh - rect.max_y();
            }
        }
        if horizontal {
            let vw = self.viewport.width;
            if rect.width() < vw {
                dx = (vw - rect.width()) / 2.0 - rect.min_x();
            } else if rect.min_x() > 0.0 {
                dx = -rect.min_x();
            } else if rect.max_x() < vw {
                dx = vw - rect.max_x();
            }
        }
        Vec2::new(dx, dy)
    }

    fn next_double_tap_scale(&mut self) -> f64 {
        match self.session.double_tap_direction {
            DoubleTapDirection::ZoomIn => {
                if self.scale() > 1.0 {
                    1.0
                } else {
                    self.session.double_tap_direction = DoubleTapDirection::ZoomOut;
                    self.config.double_tap_scale
                }
            }
            DoubleTapDirection::ZoomOut => {
                self.session.double_tap_direction = DoubleTapDirection::ZoomIn;
                1.0
            }
        }
    }

    fn start_zoom_animation(
        &mut self,
        target: f64,
        focal: Point,
        duration_ms: f64,
        easing: Easing,
        now_ms: f64,
    ) {
        let max = self.max_scale();
        let end = if target > max { max } else { target };
        let start = self.scale();
        self.driver.start(start, end, now_ms, duration_ms, easing);
        self.animation = Some(ActiveAnimation::ZoomTo { focal });
    }

    /// Starts an animated snap back to the minimum scale if the current
    /// scale rests below it and no such snap is already in flight.
    fn snap_to_min_scale(&mut self, now_ms: f64) {
        let min = self.min_scale();
        if self.scale() >= min {
            return;
        }
        if matches!(self.animation, Some(ActiveAnimation::ZoomTo { .. }))
            && self.driver.end_value() == Some(min)
        {
            return;
        }
        self.start_zoom_animation(
            min,
            self.viewport_center(),
            self.config.snap_duration_ms,
            Easing::CubicInOut,
            now_ms,
        );
    }

    fn apply_animation_value(&mut self, kind: ActiveAnimation, value: f64) {
        match kind {
            ActiveAnimation::ZoomTo { focal } => self.zoom_to_about(value, focal),
            ActiveAnimation::Fling { total, applied } => {
                let eased = Vec2::new(total.x * value, total.y * value);
                self.pan_by(eased - applied);
                if let Some(ActiveAnimation::Fling { applied: a, .. }) = &mut self.animation {
                    *a = eased;
                }
            }
        }
    }

    fn compare_scale_state(&self) -> ScaleState {
        let scale = self.scale();
        if scale == self.init_scale {
            ScaleState::NoScale
        } else if scale > self.init_scale {
            ScaleState::ScaleUp
        } else {
            ScaleState::ScaleDown
        }
    }

    fn update_scale_state(&mut self) {
        let state = self.compare_scale_state();
        if state != self.scale_state {
            self.scale_state = state;
            self.events.push(GestureEvent::ScaleStateChanged(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use loupe_transform::{DisplayMode, GeometryKind, content_rect, scale_of};

    use super::ZoomPanController;
    use crate::config::GestureFlags;
    use crate::events::{GestureEvent, ScaleState};

    fn fitted(vw: u32, vh: u32, cw: f64, ch: f64, mode: DisplayMode) -> ZoomPanController {
        let mut controller = ZoomPanController::new();
        controller.set_display_mode(mode);
        controller
            .set_content(Some(Size::new(cw, ch)), None, None, None)
            .unwrap();
        controller.on_viewport_changed(vw, vh).unwrap();
        controller.take_events();
        controller
    }

    fn rect_of(controller: &ZoomPanController) -> Rect {
        content_rect(&controller.transform(), controller.content().unwrap())
    }

    /// Pinches to `factor` in one armed step about the viewport center.
    fn pinch_once(controller: &mut ZoomPanController, factor: f64) {
        let center = Point::new(
            controller.viewport().width / 2.0,
            controller.viewport().height / 2.0,
        );
        controller.pinch_begin();
        assert!(!controller.pinch_step(factor, center, 1.0), "first step only arms");
        assert!(controller.pinch_step(factor, center, 1.0));
    }

    #[test]
    fn default_scale_per_display_mode() {
        // `None` presents content at intrinsic size: supplementary undoes the fit.
        let controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        assert_eq!(controller.scale(), 2.0);
        assert_eq!(scale_of(&controller.transform()), 1.0);

        // `FitToScreen` rests at the fit.
        let controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        assert_eq!(controller.scale(), 1.0);
        assert_eq!(scale_of(&controller.transform()), 0.5);

        // `FitIfBigger` only shrinks: small content stays intrinsic.
        let controller = fitted(1000, 1000, 500.0, 500.0, DisplayMode::FitIfBigger);
        assert_eq!(controller.scale(), 0.5);
        assert_eq!(scale_of(&controller.transform()), 1.0);
        let controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitIfBigger);
        assert_eq!(controller.scale(), 1.0);
    }

    #[test]
    fn fit_centers_content() {
        let controller = fitted(1000, 1000, 2000.0, 500.0, DisplayMode::FitToScreen);
        let rect = rect_of(&controller);
        // Width fits exactly; height centers at (1000 - 250) / 2.
        assert!((rect.min_x() - 0.0).abs() < 1e-9);
        assert!((rect.max_x() - 1000.0).abs() < 1e-9);
        assert!((rect.min_y() - 375.0).abs() < 1e-9);
        assert!((rect.max_y() - 625.0).abs() < 1e-9);
    }

    #[test]
    fn boundary_rejects_invalid_geometry() {
        let mut controller = ZoomPanController::new();

        let err = controller
            .set_content(Some(Size::new(0.0, 100.0)), None, None, None)
            .unwrap_err();
        assert_eq!(err.kind, GeometryKind::Content);

        let err = controller.on_viewport_changed(0, 600).unwrap_err();
        assert_eq!(err.kind, GeometryKind::Viewport);

        // Nothing leaked into the state.
        assert!(controller.content().is_none());
        assert_eq!(controller.viewport(), Size::ZERO);
        assert!(controller.take_events().is_empty());
    }

    #[test]
    fn scroll_pans_until_the_edge_meets_the_viewport() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        // Intrinsic 2000x2000 centered in 1000x1000: rect (-500,-500)..(1500,1500).

        assert!(controller.scroll_by(100.0, 0.0));
        assert!((rect_of(&controller).min_x() + 400.0).abs() < 1e-9);

        // A huge delta clamps at the leading edge.
        assert!(controller.scroll_by(10_000.0, 0.0));
        assert!((rect_of(&controller).min_x() - 0.0).abs() < 1e-9);

        assert!(controller.scroll_by(0.0, 10_000.0));
        assert!((rect_of(&controller).min_y() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn scroll_zero_delta_is_a_no_op() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        controller.scroll_by(123.0, -77.0);

        let before = controller.transform();
        assert!(controller.scroll_by(0.0, 0.0));
        assert_eq!(controller.transform(), before);
    }

    #[test]
    fn fitting_axis_stays_centered_under_scroll() {
        // Wide content: after the default zoom the height (500) fits, the
        // width (4000) overflows.
        let mut controller = fitted(1000, 1000, 2000.0, 500.0, DisplayMode::None);
        let before = rect_of(&controller);
        assert!((before.min_y() - 250.0).abs() < 1e-9);

        assert!(controller.scroll_by(100.0, 300.0));
        let after = rect_of(&controller);
        assert!((after.min_y() - 250.0).abs() < 1e-9, "fitting axis must not pan");
        assert!((after.min_x() - (before.min_x() + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn scroll_refusals_are_silent_no_ops() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);

        controller.pinch_begin();
        assert!(!controller.scroll_by(10.0, 0.0), "mid-pinch");
        controller.pinch_end(0.0);

        controller.set_pointer_count(2);
        assert!(!controller.scroll_by(10.0, 0.0), "multi-pointer");
        controller.set_pointer_count(1);

        controller.set_gestures(GestureFlags::empty());
        assert!(!controller.scroll_by(10.0, 0.0), "scroll disabled");
        controller.set_gestures(GestureFlags::all());

        assert!(controller.scroll_by(10.0, 0.0));

        let mut empty = ZoomPanController::new();
        assert!(!empty.scroll_by(10.0, 0.0), "no content");
    }

    #[test]
    fn fling_at_minimum_scale_reinterprets_as_close() {
        // 1000x1000 content locked at the fit: nowhere to scroll.
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        assert_eq!(controller.scale(), controller.min_scale());

        let handled = controller.fling_by(900.0, 0.0, -120.0, 0.0, 0.0);
        assert!(!handled, "not consumed as a pan");
        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::FlingClose));
        assert!(!controller.is_animating());
    }

    #[test]
    fn slow_fling_is_refused_without_close() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        assert!(!controller.fling_by(100.0, 0.0, -120.0, 0.0, 0.0));
        assert!(controller.take_events().is_empty());
    }

    #[test]
    fn fling_decelerates_over_half_the_displacement() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        assert!((rect_of(&controller).min_x() + 500.0).abs() < 1e-9);

        assert!(controller.fling_by(-900.0, 0.0, -400.0, 0.0, 0.0));
        assert!(controller.is_animating());

        // Cubic ease-out covers 87.5% of the distance at half time.
        assert!(controller.animation_tick(150.0));
        assert!((rect_of(&controller).min_x() + 675.0).abs() < 1e-9);

        assert!(!controller.animation_tick(300.0));
        assert!((rect_of(&controller).min_x() + 700.0).abs() < 1e-9);
        assert!(!controller.animation_tick(316.0));
    }

    #[test]
    fn fling_gates_mirror_scroll_gates() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);

        controller.pinch_begin();
        assert!(!controller.fling_by(900.0, 0.0, -100.0, 0.0, 0.0));
        controller.pinch_end(0.0);

        controller.set_pointer_count(2);
        assert!(!controller.fling_by(900.0, 0.0, -100.0, 0.0, 0.0));
        controller.set_pointer_count(0);

        // At supplementary scale 1 there is no fling scrolling either. Small
        // content keeps the minimum below 1, so this is not the close path.
        let mut at_fit = fitted(1000, 1000, 500.0, 500.0, DisplayMode::FitToScreen);
        assert_eq!(at_fit.min_scale(), 0.5);
        assert!(!at_fit.fling_by(900.0, 0.0, -100.0, 0.0, 0.0));
        assert!(at_fit.take_events().is_empty());
    }

    #[test]
    fn double_tap_alternates_from_the_fit() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        let focal = Point::new(500.0, 500.0);

        assert_eq!(controller.double_tap_zoom(focal, 0.0), 2.0);
        assert_eq!(controller.double_tap_zoom(focal, 10.0), 1.0);
        assert_eq!(controller.double_tap_zoom(focal, 20.0), 2.0);
    }

    #[test]
    fn double_tap_transition_lands_exactly_on_target() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        let target = controller.double_tap_zoom(Point::new(500.0, 500.0), 0.0);
        assert_eq!(target, 2.0);

        // Ease-in-out midpoint: halfway between start and target.
        assert!(controller.animation_tick(100.0));
        assert_eq!(controller.scale(), 1.5);

        assert!(!controller.animation_tick(200.0));
        assert_eq!(controller.scale(), 2.0);

        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ScaleStateChanged(ScaleState::ScaleUp)));
    }

    #[test]
    fn double_tap_target_is_clamped_into_bounds() {
        let mut controller = ZoomPanController::new();
        controller
            .set_content(Some(Size::new(1000.0, 1000.0)), None, Some(1.2), Some(1.5))
            .unwrap();
        controller.on_viewport_changed(1000, 1000).unwrap();

        // Toggle target 1.0 is below the pinned minimum.
        let target = controller.double_tap_zoom(Point::new(500.0, 500.0), 0.0);
        assert_eq!(target, 1.2);
    }

    #[test]
    fn pinch_zooms_about_the_focal_point_within_bounds() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        assert_eq!(controller.min_scale(), 1.0);
        assert_eq!(controller.max_scale(), 16.0);

        pinch_once(&mut controller, 1.2);
        assert_eq!(controller.scale(), 1.2);

        // Zooming far below the floor stops at min - undershoot mid-gesture.
        assert!(controller.pinch_step(0.1, Point::new(500.0, 500.0), -1.0));
        assert_eq!(controller.scale(), 0.9);

        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ScaleStateChanged(ScaleState::ScaleUp)));
        assert!(events.contains(&GestureEvent::ScaleStateChanged(ScaleState::ScaleDown)));
    }

    #[test]
    fn pinch_end_snaps_back_above_the_minimum() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        pinch_once(&mut controller, 0.95);
        assert_eq!(controller.scale(), 0.95);

        controller.pinch_end(1000.0);
        assert!(controller.is_animating());
        // touch-up arrives while the snap is in flight; it must not restart it.
        controller.touch_ended(1010.0);

        assert!(!controller.animation_tick(1050.0));
        assert_eq!(controller.scale(), 1.0);

        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ScaleStateChanged(ScaleState::NoScale)));
    }

    #[test]
    fn pinch_resets_the_double_tap_direction() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        let focal = Point::new(500.0, 500.0);

        // First double-tap flips the toggle to zoom-out...
        assert_eq!(controller.double_tap_zoom(focal, 0.0), 2.0);
        controller.touch_ended(5.0);
        controller.touch_began();

        // ...but a pinch above the fit resets it, so the next double-tap
        // returns to the fit rather than zooming in again.
        pinch_once(&mut controller, 1.5);
        assert_eq!(controller.double_tap_zoom(focal, 100.0), 1.0);
    }

    #[test]
    fn resize_preserves_visual_zoom_when_user_scaled() {
        let mut controller = fitted(1000, 1000, 2000.0, 1000.0, DisplayMode::FitToScreen);
        pinch_once(&mut controller, 2.0);
        assert_eq!(controller.scale(), 2.0);
        assert_eq!(scale_of(&controller.transform()), 1.0);
        controller.pinch_end(0.0);

        controller.on_viewport_changed(500, 500).unwrap();
        // Base scale halved, so the supplementary doubles: same on-screen size.
        assert_eq!(controller.scale(), 4.0);
        assert_eq!(scale_of(&controller.transform()), 1.0);
    }

    #[test]
    fn resize_resets_to_default_without_user_scaling() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        controller.on_viewport_changed(500, 500).unwrap();
        assert_eq!(controller.scale(), 1.0);
        assert_eq!(scale_of(&controller.transform()), 0.25);
    }

    #[test]
    fn resize_snaps_to_the_new_minimum_when_resting_at_the_old_one() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        assert_eq!(controller.scale(), controller.min_scale());
        // Any scroll marks the session user-scaled, even a clamped one.
        controller.scroll_by(5.0, 5.0);

        controller.on_viewport_changed(500, 500).unwrap();
        // The ratio formula would say 2.0 here; resting-at-minimum wins.
        assert_eq!(controller.scale(), 1.0);
        assert_eq!(scale_of(&controller.transform()), 0.25);
    }

    #[test]
    fn content_swap_with_initial_matrix_preserves_the_visual_state() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        controller.scroll_by(-120.0, 40.0);
        assert_eq!(controller.scale(), 2.0);

        let saved = controller.display_matrix();
        controller
            .set_content(Some(Size::new(1500.0, 1500.0)), Some(saved), None, None)
            .unwrap();

        assert_eq!(controller.scale(), 2.0);
        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ContentChanged));
        assert!(
            events
                .iter()
                .any(|event| matches!(event, GestureEvent::LayoutChanged(_)))
        );
    }

    #[test]
    fn content_set_before_layout_defers_the_fit() {
        let mut controller = ZoomPanController::new();
        controller
            .set_content(Some(Size::new(2000.0, 2000.0)), None, None, None)
            .unwrap();
        assert!(controller.take_events().is_empty(), "fit deferred until layout");

        controller.on_viewport_changed(1000, 1000).unwrap();
        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ContentChanged));
        assert!(events.contains(&GestureEvent::LayoutChanged(Rect::new(
            0.0, 0.0, 1000.0, 1000.0
        ))));
        assert!(controller.take_events().is_empty(), "queue drains");
    }

    #[test]
    fn clearing_content_resets_the_transform() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        controller.set_content(None, None, None, None).unwrap();

        assert!(controller.content().is_none());
        assert_eq!(controller.transform(), kurbo::Affine::IDENTITY);
        let events = controller.take_events();
        assert!(events.contains(&GestureEvent::ContentChanged));
    }

    #[test]
    fn touch_down_cancels_a_zoom_transition() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        controller.zoom_to_animated(3.0, 200.0, 0.0);
        assert!(controller.is_animating());

        controller.touch_began();
        assert!(!controller.is_animating());
        assert!(!controller.animation_tick(100.0));
        assert_eq!(controller.scale(), 1.0, "no step was ever applied");
    }

    #[test]
    fn touch_down_spares_the_double_tap_transition() {
        let mut controller = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        controller.double_tap_zoom(Point::new(500.0, 500.0), 0.0);

        // The down of the double-tap's own second touch.
        controller.touch_began();
        assert!(controller.is_animating());
    }

    #[test]
    fn display_mode_change_refits() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        assert_eq!(controller.scale(), 2.0);

        controller.set_display_mode(DisplayMode::FitToScreen);
        assert_eq!(controller.scale(), 1.0);
        assert!(
            controller
                .take_events()
                .iter()
                .any(|event| matches!(event, GestureEvent::LayoutChanged(_)))
        );
    }

    #[test]
    fn can_scroll_tracks_horizontal_headroom() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::None);
        assert!(controller.can_scroll(1));
        assert!(controller.can_scroll(-1));

        // Scrolled hard against the leading edge: no more headroom there.
        controller.scroll_by(10_000.0, 0.0);
        assert!(!controller.can_scroll(-1));
        assert!(controller.can_scroll(1));

        let fit = fitted(1000, 1000, 1000.0, 1000.0, DisplayMode::None);
        assert!(!fit.can_scroll(1));
        assert!(!fit.can_scroll(-1));
    }

    #[test]
    fn bounds_hold_after_a_gesture_storm() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        let focal = Point::new(700.0, 300.0);

        controller.pinch_begin();
        controller.pinch_step(1.5, focal, 1.0);
        for factor in [3.0, 4.0, 0.2, 0.1, 5.0, 0.3] {
            controller.pinch_step(factor, focal, 1.0);
        }
        controller.pinch_end(0.0);
        while controller.animation_tick(1_000.0) {}

        controller.scroll_by(-3_000.0, 250.0);
        controller.scroll_by(9_999.0, -9_999.0);

        let scale = controller.scale();
        assert!(scale >= controller.min_scale());
        assert!(scale <= controller.max_scale());

        // Content never reveals empty space on an overflowing axis.
        let rect = rect_of(&controller);
        if rect.width() >= 1000.0 {
            assert!(rect.min_x() <= 1e-9);
            assert!(rect.max_x() >= 1000.0 - 1e-9);
        }
        if rect.height() >= 1000.0 {
            assert!(rect.min_y() <= 1e-9);
            assert!(rect.max_y() >= 1000.0 - 1e-9);
        }
    }

    #[test]
    fn scale_state_events_fire_only_on_transitions() {
        let mut controller = fitted(1000, 1000, 2000.0, 2000.0, DisplayMode::FitToScreen);
        pinch_once(&mut controller, 1.2);
        controller.pinch_step(1.2, Point::new(500.0, 500.0), 1.0);

        let events = controller.take_events();
        let ups = events
            .iter()
            .filter(|event| matches!(event, GestureEvent::ScaleStateChanged(ScaleState::ScaleUp)))
            .count();
        assert_eq!(ups, 1, "two up-steps, one transition");
    }
}
