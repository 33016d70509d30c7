// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Rect, Size};

/// Rounds a scale factor to three decimal places.
///
/// Repeated matrix compositions accumulate floating-point drift; every scale
/// comparison in the engine (bound clamping, gesture gating, scale-state
/// detection) goes through this rounding so that equality checks remain
/// meaningful. The rounding is idempotent.
///
/// Scale factors are strictly positive, so a cast-based round-half-up is
/// sufficient and keeps this crate free of `std`/`libm` float intrinsics.
#[must_use]
pub fn round_scale(scale: f64) -> f64 {
    ((scale * 1000.0 + 0.5) as i64) as f64 / 1000.0
}

/// Computes the base-fit matrix mapping `content` into `viewport`.
///
/// The content is uniformly scaled by `min(vw/cw, vh/ch)` (whichever axis
/// yields the smaller scale, preserving aspect ratio) and then centered in the
/// other axis via translation. The result depends only on the inputs.
///
/// Both sizes must have strictly positive, finite dimensions; the controller
/// rejects anything else at its boundary before calling in here.
#[must_use]
pub fn fit_matrix(viewport: Size, content: Size) -> Affine {
    debug_assert!(
        viewport.width > 0.0 && viewport.height > 0.0,
        "viewport must have positive dimensions"
    );
    debug_assert!(
        content.width > 0.0 && content.height > 0.0,
        "content must have positive dimensions"
    );

    let scale = (viewport.width / content.width).min(viewport.height / content.height);
    let tx = (viewport.width - content.width * scale) / 2.0;
    let ty = (viewport.height - content.height * scale) / 2.0;
    Affine::translate((tx, ty)) * Affine::scale(scale)
}

/// Composes the base-fit matrix with the supplementary pan/zoom.
///
/// The supplementary matrix is post-concatenated: it operates in viewport
/// space, on the already-fitted content.
#[must_use]
pub fn compose(base: Affine, supplementary: Affine) -> Affine {
    supplementary * base
}

/// Extracts the x-axis scale factor of `matrix`, rounded via [`round_scale`].
#[must_use]
pub fn scale_of(matrix: &Affine) -> f64 {
    round_scale(matrix.as_coeffs()[0])
}

/// Maps the content's intrinsic rectangle through a composed transform.
///
/// For the axis-aligned scale+translate transforms used by this engine the
/// bounding box of the mapped rectangle is the mapped rectangle itself.
#[must_use]
pub fn content_rect(matrix: &Affine, content: Size) -> Rect {
    matrix.transform_rect_bbox(Rect::from_origin_size((0.0, 0.0), content))
}
