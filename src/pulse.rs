//! Edge-producing timers: the delayed one-shot and the periodic generator.

#[cfg(feature = "logging")]
use log::trace;

use crate::clock::Clock;
use crate::timer::{impl_timer_block, TimerCore};

/// Delayed one-shot pulse.
///
/// Returns `true` for exactly one call, `period` ticks after `trigger` was
/// asserted, no matter how long `trigger` stays high afterwards. Dropping
/// `trigger` rearms it.
#[derive(Debug, Clone)]
pub struct Pulse<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(Pulse);

impl<C: Clock> Pulse<C> {
    /// Polls the one-shot with the current trigger level.
    pub fn update(&mut self, period: u32, trigger: bool) -> bool {
        if !trigger {
            self.core.arm_lock = false;
            self.core.active = false;
            return false;
        }

        let now = self.now();
        if !self.core.arm_lock {
            self.core.arm_lock = true;
            self.core.arm(now);
        }

        if !self.core.active {
            return false;
        }

        if self.core.elapsed(now) >= period {
            self.core.active = false;
            #[cfg(feature = "logging")]
            trace!("Pulse fired at tick {}.", now);
            return true;
        }
        false
    }
}

/// Periodic event generator.
///
/// While enabled, returns `true` for one call every `period` ticks. Each
/// window restarts at the tick of the call that fired, so late polls delay the
/// next event instead of bunching events up.
#[derive(Debug, Clone)]
pub struct Generator<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(Generator);

impl<C: Clock> Generator<C> {
    /// Polls the generator.
    pub fn update(&mut self, period: u32, enable: bool) -> bool {
        if !enable {
            self.core.active = false;
            return false;
        }

        let now = self.now();
        if !self.core.active {
            self.core.arm(now);
        }

        if self.core.elapsed(now) >= period {
            self.core.restart(now);
            return true;
        }
        false
    }
}
