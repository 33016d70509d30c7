// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Size;

/// Which input rectangle carried the invalid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    /// The intrinsic content size.
    Content,
    /// The hosting viewport size.
    Viewport,
}

/// A content or viewport size with a non-positive or non-finite dimension was
/// supplied to a fit computation.
///
/// This is rejected at the boundary (`set_content` / `on_viewport_changed`)
/// rather than propagated: a NaN or infinity that reaches the composed matrix
/// silently corrupts all subsequent centering math and cannot be recovered
/// locally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidGeometry {
    /// Which input was invalid.
    pub kind: GeometryKind,
    /// The offending width.
    pub width: f64,
    /// The offending height.
    pub height: f64,
}

impl InvalidGeometry {
    /// Checks `size` for strictly positive, finite dimensions.
    pub fn check(kind: GeometryKind, size: Size) -> Result<(), Self> {
        let ok = size.width > 0.0
            && size.height > 0.0
            && size.width.is_finite()
            && size.height.is_finite();
        if ok {
            Ok(())
        } else {
            Err(Self {
                kind,
                width: size.width,
                height: size.height,
            })
        }
    }
}

impl fmt::Display for InvalidGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            GeometryKind::Content => "content",
            GeometryKind::Viewport => "viewport",
        };
        write!(
            f,
            "{} size {}x{} must have positive finite dimensions",
            what, self.width, self.height
        )
    }
}

impl core::error::Error for InvalidGeometry {}
