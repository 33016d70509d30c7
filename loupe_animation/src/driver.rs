// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::easing::Easing;

/// One eased interpolation from a start value to an end value.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Run {
    start: f64,
    end: f64,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

/// The outcome of a single [`AnimationDriver::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The run is still in flight; carries the eased intermediate value.
    Running(f64),
    /// The run just reached its duration; carries exactly the end value.
    ///
    /// Produced at most once per run. Subsequent ticks return `None`.
    Finished(f64),
}

/// Drives at most one cancellable eased transition at a time.
///
/// The driver is poll-based: the host (or the controller's animation tick)
/// calls [`tick`](Self::tick) with the current monotonic time and applies the
/// returned value. This keeps all mutation on the single gesture-dispatch
/// thread and makes the ordering guarantee structural: after
/// [`cancel`](Self::cancel) or a [`Step::Finished`], `tick` cannot observe
/// the old run because it no longer exists.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationDriver {
    run: Option<Run>,
}

impl AnimationDriver {
    /// Creates an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new run, cancelling any active one first.
    ///
    /// A new request always wins immediately; it is never queued behind the
    /// active run.
    pub fn start(&mut self, start: f64, end: f64, now_ms: f64, duration_ms: f64, easing: Easing) {
        self.run = Some(Run {
            start,
            end,
            start_ms: now_ms,
            duration_ms,
            easing,
        });
    }

    /// Cancels the active run without producing a completion step.
    ///
    /// Idempotent when no run is active.
    pub fn cancel(&mut self) {
        self.run = None;
    }

    /// Returns `true` while a run is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Returns the end value of the active run, if any.
    #[must_use]
    pub fn end_value(&self) -> Option<f64> {
        self.run.map(|run| run.end)
    }

    /// Advances the active run to `now_ms`.
    ///
    /// Returns `None` when idle, [`Step::Running`] with the eased value while
    /// in flight, and [`Step::Finished`] exactly once when elapsed time
    /// reaches the duration (clearing the run). A zero or negative duration
    /// finishes on the first tick.
    pub fn tick(&mut self, now_ms: f64) -> Option<Step> {
        let run = self.run?;
        let elapsed = (now_ms - run.start_ms).max(0.0);
        if elapsed >= run.duration_ms || run.duration_ms <= 0.0 {
            self.run = None;
            Some(Step::Finished(run.end))
        } else {
            let value = run.easing.interpolate(run.start, run.end, elapsed / run.duration_ms);
            Some(Step::Running(value))
        }
    }
}
