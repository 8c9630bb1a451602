//! On-delay (TON) and off-delay (TOF) timers.

#[cfg(feature = "logging")]
use log::trace;

use crate::clock::Clock;
use crate::timer::{impl_timer_block, TimerCore};

/// On-delay timer (TON).
///
/// The output goes high once `input` has been continuously high for `period`
/// ticks and stays high while `input` stays high. Any low input drops the
/// output and discards the progress.
#[derive(Debug, Clone)]
pub struct OnDelay<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(OnDelay);

impl<C: Clock> OnDelay<C> {
    /// Polls the timer with the current input level.
    pub fn update(&mut self, period: u32, input: bool) -> bool {
        if !input {
            self.core.active = false;
            return false;
        }

        let now = self.now();
        if !self.core.active {
            self.core.arm(now);
            return false;
        }

        self.core.elapsed(now) >= period
    }
}

/// Off-delay timer (TOF).
///
/// The output follows `input` high immediately and holds for `period` ticks
/// after `input` falls. A new high input during the hold restarts it.
#[derive(Debug, Clone)]
pub struct OffDelay<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(OffDelay);

impl<C: Clock> OffDelay<C> {
    /// Polls the timer with the current input level.
    pub fn update(&mut self, period: u32, input: bool) -> bool {
        let now = self.now();
        if input {
            self.core.arm(now);
            return true;
        }

        if !self.core.active {
            return false;
        }

        if self.core.elapsed(now) >= period {
            self.core.active = false;
            #[cfg(feature = "logging")]
            trace!("Off-delay expired at tick {}.", now);
            return false;
        }
        true
    }

    /// Ticks left before the hold expires, 0 when not holding.
    ///
    /// `period` must be the value passed to [`update`](Self::update); the timer
    /// does not store it. Reading the remaining time never changes the state.
    pub fn remaining(&self, period: u32) -> u32 {
        if !self.core.active {
            return 0;
        }
        period.saturating_sub(self.core.elapsed(self.now()))
    }
}
