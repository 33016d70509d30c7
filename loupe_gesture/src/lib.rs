// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Gesture: a headless zoom/pan controller for content in a viewport.
//!
//! This crate turns pre-classified gesture intents into a constrained,
//! composed affine transform:
//! - Pinch-zoom about a focal point with transient undershoot tolerance and
//!   animated snap-back at gesture end.
//! - Bounded scrolling: content that fits an axis stays centered; content
//!   that overflows scrolls until its edge meets the viewport edge.
//! - Double-tap zoom toggling between the fit and a configured target.
//! - Fling handling, including the reinterpretation of a fast fling with
//!   nowhere to scroll as a dismissal gesture.
//! - Layout-change reconciliation that preserves the visual zoom level (or
//!   snaps back to the fit) across viewport resizes and content swaps.
//!
//! The controller never sees raw pointer streams, never renders, and owns no
//! platform types. Hosts feed it classified gestures and layout events, drive
//! [`ZoomPanController::animation_tick`] from their frame clock, drain
//! [`ZoomPanController::take_events`], and pull
//! [`ZoomPanController::transform`] for drawing.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use loupe_gesture::{DisplayMode, ZoomPanController};
//!
//! let mut controller = ZoomPanController::new();
//! controller.set_display_mode(DisplayMode::FitToScreen);
//! controller
//!     .set_content(Some(Size::new(4000.0, 3000.0)), None, None, None)
//!     .unwrap();
//! controller.on_viewport_changed(800, 600).unwrap();
//! controller.take_events();
//!
//! // Double-tap zooms toward 2x; drive the transition to completion.
//! let target = controller.double_tap_zoom(Point::new(400.0, 300.0), 0.0);
//! assert_eq!(target, 2.0);
//! while controller.animation_tick(1_000.0) {}
//! assert_eq!(controller.scale(), 2.0);
//!
//! // Zoomed-in content pans, clamped against the viewport.
//! assert!(controller.scroll_by(-50.0, 0.0));
//!
//! // The composed transform is what the host hands to its draw path.
//! let _coeffs: [f64; 6] = controller.transform().as_coeffs();
//! ```
//!
//! ## Concurrency model
//!
//! All operations are expected on one logical thread of gesture dispatch.
//! There is no internal locking; animation ticks are synchronous poll calls,
//! so a tick can never observe (or race) a half-applied gesture. Cancellation
//! is cooperative and only suppresses future ticks.
//!
//! This crate is `no_std`.

#![no_std]

mod bounds;
mod config;
mod controller;
mod events;
mod session;

pub use config::{GestureConfig, GestureFlags};
pub use controller::ZoomPanController;
pub use events::{Events, GestureEvent, ScaleState};

pub use loupe_transform::{DisplayMode, GeometryKind, InvalidGeometry};
