// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Transform: the affine transform model behind pinch-zoom surfaces.
//!
//! This crate provides the leaf-level matrix model for a zoomable content
//! surface inside a fixed viewport:
//! - A pure base-fit computation ([`fit_matrix`]) that centers and scales
//!   content into a viewport, preserving aspect ratio.
//! - A [`TransformState`] that composes the base fit with the user's
//!   supplementary pan/zoom.
//! - Drift-absorbing scale extraction ([`scale_of`], [`round_scale`]) that
//!   keeps scale-equality comparisons stable across repeated compositions.
//! - The [`InvalidGeometry`] hard-failure type rejected at the engine
//!   boundary.
//!
//! It does **not** interpret gestures, own scale bounds, or schedule
//! animations; those live in the controller layer built on top of this crate.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use loupe_transform::{fit_matrix, scale_of, TransformState};
//!
//! // A 4:3 photo in a landscape viewport.
//! let viewport = Size::new(800.0, 600.0);
//! let content = Size::new(4000.0, 3000.0);
//!
//! let mut state = TransformState::new();
//! state.set_base(fit_matrix(viewport, content));
//! assert_eq!(state.base_scale(), 0.2);
//!
//! // Pinch in 2x about the viewport center.
//! state.post_scale(2.0, Point::new(400.0, 300.0));
//! assert_eq!(state.scale(), 2.0);
//! assert_eq!(scale_of(&state.composed()), 0.4);
//! ```
//!
//! ## Design notes
//!
//! - Transforms are axis-aligned with a **uniform** scale; rotation is out of
//!   scope for the engine.
//! - The supplementary matrix operates in viewport space (post-concatenation),
//!   so a translation of `(10, 0)` always moves content ten viewport pixels
//!   regardless of the base fit.
//! - Scale values are rounded to three decimals on read. Without this,
//!   equality comparisons used for gesture disambiguation and bound clamping
//!   spuriously fail after long gesture sequences.
//!
//! This crate is `no_std`.

#![no_std]

mod error;
mod matrix;
mod modes;
mod state;

pub use error::{GeometryKind, InvalidGeometry};
pub use matrix::{compose, content_rect, fit_matrix, round_scale, scale_of};
pub use modes::{default_scale, DisplayMode};
pub use state::TransformState;
