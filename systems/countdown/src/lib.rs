#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic countdown system that turns frame time into session ticks.
//!
//! The session never reads a clock. Presenters report elapsed frame time to
//! [`Countdown::handle`], which emits one [`Command::Tick`] for every whole
//! timer interval that passed while the timer was armed.

use std::time::Duration;

use oddone_core::{Command, Event, PresentationAction};

/// Pure system emulating the presenter's repeating timer action.
#[derive(Clone, Debug, Default)]
pub struct Countdown {
    interval: Option<Duration>,
    accumulator: Duration,
}

impl Countdown {
    /// Creates a disarmed countdown.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: None,
            accumulator: Duration::ZERO,
        }
    }

    /// Interval of the armed timer, if any.
    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Reports whether a timer is currently armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Consumes session events and the elapsed frame time to emit ticks.
    ///
    /// `StartTimer` arms the countdown and `StopAllActions` disarms it; both
    /// discard any partially accumulated interval. The frame time is applied
    /// after the events, so a timer armed in this batch already counts `dt`.
    pub fn handle(&mut self, events: &[Event], dt: Duration, out: &mut Vec<Command>) {
        for event in events {
            if let Event::PresentationActionRequested { action } = event {
                match action {
                    PresentationAction::StartTimer { interval } => {
                        self.interval = Some(*interval);
                        self.accumulator = Duration::ZERO;
                    }
                    PresentationAction::StopAllActions => {
                        self.interval = None;
                        self.accumulator = Duration::ZERO;
                    }
                    PresentationAction::PlaySound { .. }
                    | PresentationAction::LoopSound { .. } => {}
                }
            }
        }

        if self.interval.is_none() || dt.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        for _ in 0..self.resolve_ticks() {
            out.push(Command::Tick);
        }
    }

    fn resolve_ticks(&mut self) -> u32 {
        let Some(interval) = self.interval else {
            return 0;
        };
        if interval.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            ticks += 1;
        }
        ticks
    }
}
