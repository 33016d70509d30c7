// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Animation: cancellable eased transitions for gesture surfaces.
//!
//! This crate provides the timing half of smooth zoom and scroll-release
//! behavior, decoupled from any UI framework's animation primitive:
//! - An [`AnimationDriver`] holding at most one run (start value, end value,
//!   start time, duration, easing) that the host polls with a monotonic
//!   timestamp.
//! - [`Easing`] curves that are monotonic and exact at their endpoints.
//! - A [`Clock`] abstraction plus a deterministic [`ManualClock`] so tests
//!   and replay tooling control time explicitly.
//!
//! Starting a run while one is active cancels the previous run first; new
//! requests always win immediately and are never queued. Cancellation is
//! cooperative and never produces a completion step.
//!
//! ## Minimal example
//!
//! ```rust
//! use loupe_animation::{AnimationDriver, Clock, Easing, ManualClock, Step};
//!
//! let mut clock = ManualClock::new(0.0);
//! let mut driver = AnimationDriver::new();
//!
//! // Ease a zoom level from 1.0 to 2.0 over 200 ms.
//! driver.start(1.0, 2.0, clock.now_ms(), 200.0, Easing::CubicInOut);
//!
//! clock.advance(100.0);
//! let Some(Step::Running(mid)) = driver.tick(clock.now_ms()) else {
//!     unreachable!("run is in flight");
//! };
//! assert!(mid > 1.0 && mid < 2.0);
//!
//! clock.advance(100.0);
//! assert_eq!(driver.tick(clock.now_ms()), Some(Step::Finished(2.0)));
//! assert_eq!(driver.tick(clock.now_ms()), None);
//! ```
//!
//! ## Design notes
//!
//! - The driver is poll-based rather than callback-owning: the caller applies
//!   each [`Step`] itself, which keeps re-entrant mutation (a tick that pans
//!   or zooms the controller that owns the driver) trivially safe under the
//!   single-writer discipline.
//! - `Finished` carries exactly the end value, so callers never need an
//!   epsilon settle after an animation.
//!
//! This crate is `no_std`.

#![no_std]

mod clock;
mod driver;
mod easing;

pub use clock::{Clock, ManualClock};
pub use driver::{AnimationDriver, Step};
pub use easing::Easing;
