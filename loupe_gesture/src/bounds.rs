// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

use loupe_transform::{DisplayMode, round_scale};

/// Scale limits, either pinned by the caller or derived from the current
/// content/viewport pair.
///
/// Derived values are computed on demand from whatever geometry is current,
/// so a content, viewport, or display-mode change invalidates them for free;
/// only pinned values survive such changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ScaleBounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl ScaleBounds {
    /// Pins both limits, normalizing their order.
    ///
    /// Under the fit display modes the supplementary scale domain is
    /// normalized around 1 ("exactly the fit"), so a pinned minimum of 1 or
    /// more, or a pinned maximum of 1 or less, would make the whole zoom
    /// range degenerate; such pins are discarded and the limit stays derived.
    pub(crate) fn pin(&mut self, min: f64, max: f64, mode: DisplayMode) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = Some(min);
        self.max = Some(max);

        if matches!(mode, DisplayMode::FitToScreen | DisplayMode::FitIfBigger) {
            if min >= 1.0 {
                self.min = None;
            }
            if max <= 1.0 {
                self.max = None;
            }
        }
    }

    /// Drops both pins; limits fall back to derived values.
    pub(crate) fn unpin(&mut self) {
        self.min = None;
        self.max = None;
    }

    /// The effective minimum scale: the pin, or `min(1, 1/base_scale)` when
    /// content is present, or 1 otherwise. Rounded.
    pub(crate) fn min_scale(&self, base_scale: Option<f64>) -> f64 {
        let value = self
            .min
            .unwrap_or_else(|| base_scale.map_or(1.0, |base| (1.0 / base).min(1.0)));
        round_scale(value)
    }

    /// The effective maximum scale: the pin, or `ratio` times the larger
    /// content/viewport dimension ratio, floored at `floor`. Rounded.
    pub(crate) fn max_scale(
        &self,
        viewport: Size,
        content: Option<Size>,
        ratio: f64,
        floor: f64,
    ) -> f64 {
        let value = self.max.unwrap_or_else(|| match content {
            Some(content) if viewport.width > 0.0 && viewport.height > 0.0 => {
                let fw = content.width / viewport.width;
                let fh = content.height / viewport.height;
                (ratio * fw.max(fh)).max(floor)
            }
            _ => 1.0,
        });
        round_scale(value)
    }
}
