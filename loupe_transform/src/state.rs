// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

use crate::matrix::{compose, scale_of};

/// Owns the base-fit matrix and the supplementary pan/zoom on top of it.
///
/// The base matrix maps the content's native coordinate space into the
/// viewport under the active fit (see [`crate::fit_matrix`]); the
/// supplementary matrix accumulates the user's pan/zoom in viewport space.
/// Mutation happens through value-level operations with a single writer; the
/// composed transform is read back as a snapshot after each operation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformState {
    base: Affine,
    supplementary: Affine,
}

impl TransformState {
    /// Creates a state with both matrices at identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the base-fit matrix.
    #[must_use]
    pub fn base(&self) -> Affine {
        self.base
    }

    /// Returns the supplementary pan/zoom matrix.
    #[must_use]
    pub fn supplementary(&self) -> Affine {
        self.supplementary
    }

    /// Returns the composed content-to-viewport transform.
    #[must_use]
    pub fn composed(&self) -> Affine {
        compose(self.base, self.supplementary)
    }

    /// Replaces the base-fit matrix, leaving the supplementary untouched.
    pub fn set_base(&mut self, base: Affine) {
        self.base = base;
    }

    /// Replaces the supplementary matrix wholesale.
    ///
    /// Used to restore a previously externalized pan/zoom state across a
    /// content swap.
    pub fn set_supplementary(&mut self, supplementary: Affine) {
        self.supplementary = supplementary;
    }

    /// Resets the supplementary matrix to identity.
    pub fn reset_supplementary(&mut self) {
        self.supplementary = Affine::IDENTITY;
    }

    /// Resets both matrices to identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Translates the supplementary matrix by `delta` in viewport space.
    pub fn post_translate(&mut self, delta: Vec2) {
        if delta.x != 0.0 || delta.y != 0.0 {
            self.supplementary = Affine::translate(delta) * self.supplementary;
        }
    }

    /// Scales the supplementary matrix by `factor` about `focal`, which stays
    /// fixed in viewport space.
    pub fn post_scale(&mut self, factor: f64, focal: Point) {
        let f = focal.to_vec2();
        self.supplementary =
            Affine::translate(f) * Affine::scale(factor) * Affine::translate(-f) * self.supplementary;
    }

    /// Returns the rounded scale of the base-fit matrix.
    #[must_use]
    pub fn base_scale(&self) -> f64 {
        scale_of(&self.base)
    }

    /// Returns the rounded scale of the supplementary matrix.
    ///
    /// This is the user-facing zoom level: `1.0` means "exactly the fit".
    #[must_use]
    pub fn scale(&self) -> f64 {
        scale_of(&self.supplementary)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Vec2};

    use super::TransformState;

    #[test]
    fn new_state_is_identity() {
        let state = TransformState::new();
        assert_eq!(state.composed(), Affine::IDENTITY);
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn post_scale_keeps_the_focal_point_fixed() {
        let mut state = TransformState::new();
        state.set_base(Affine::scale(0.5));

        let focal = Point::new(320.0, 240.0);
        let before = state.composed().inverse() * focal;
        state.post_scale(2.0, focal);
        let after = state.composed().inverse() * focal;

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn post_translate_moves_in_viewport_space() {
        let mut state = TransformState::new();
        state.set_base(Affine::scale(0.25));
        state.post_translate(Vec2::new(12.0, -8.0));

        let p = state.composed() * Point::new(0.0, 0.0);
        assert!((p.x - 12.0).abs() < 1e-9);
        assert!((p.y + 8.0).abs() < 1e-9);
    }

    #[test]
    fn zero_translate_is_a_no_op() {
        let mut state = TransformState::new();
        state.post_scale(1.5, Point::new(10.0, 10.0));
        let before = state;
        state.post_translate(Vec2::ZERO);
        assert_eq!(state, before);
    }

    #[test]
    fn supplementary_restore_round_trips() {
        let mut state = TransformState::new();
        state.set_base(Affine::scale(0.5));
        state.post_scale(3.0, Point::new(100.0, 50.0));
        state.post_translate(Vec2::new(-20.0, 5.0));

        let saved = state.supplementary();
        let mut restored = TransformState::new();
        restored.set_base(state.base());
        restored.set_supplementary(saved);

        assert_eq!(restored.composed(), state.composed());
        assert_eq!(restored.scale(), state.scale());
    }

    #[test]
    fn scale_reflects_supplementary_only() {
        let mut state = TransformState::new();
        state.set_base(Affine::scale(0.5));
        assert_eq!(state.base_scale(), 0.5);
        assert_eq!(state.scale(), 1.0);

        state.post_scale(2.0, Point::new(0.0, 0.0));
        assert_eq!(state.scale(), 2.0);
        assert_eq!(state.base_scale(), 0.5);
    }
}
