//! Shared state core of every timer block.
//!
//! Each mode type ([`Pulse`](crate::Pulse), [`OnDelay`](crate::OnDelay), ...) owns
//! one [`TimerCore`] and a clock. The core only records when an interval
//! started; all decisions are made by the mode type on each poll.

#[cfg(feature = "logging")]
use log::trace;

use crate::clock::Precision;

/// Operations shared by all timer blocks.
pub trait TimerBlock {
    /// Forces the timer back to its freshly constructed state.
    ///
    /// Call this when control flow skipped the timer for a while (e.g. it lives
    /// in one arm of a state selector), so a stale start tick does not fire it
    /// immediately on re-entry.
    fn reset(&mut self);

    /// Whether a timing interval is currently open.
    fn is_active(&self) -> bool;

    /// Tick source resolution this timer reads.
    fn precision(&self) -> Precision;

    /// Ticks since the open interval started, `None` when inactive.
    fn elapsed(&self) -> Option<u32>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TimerCore {
    pub(crate) active: bool,
    pub(crate) start: u32,
    pub(crate) output: bool,
    pub(crate) arm_lock: bool,
    pub(crate) precision: Precision,
}

impl TimerCore {
    pub(crate) const fn new(precision: Precision) -> Self {
        TimerCore {
            active: false,
            start: 0,
            output: false,
            arm_lock: false,
            precision,
        }
    }

    /// Opens an interval starting at `now`.
    pub(crate) fn arm(&mut self, now: u32) {
        self.active = true;
        self.start = now;
        #[cfg(feature = "logging")]
        trace!("Timer armed at tick {}.", now);
    }

    /// Restarts the open interval at `now`.
    pub(crate) fn restart(&mut self, now: u32) {
        self.start = now;
    }

    /// Wrapping distance from the interval start to `now`.
    pub(crate) fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.start)
    }

    pub(crate) fn reset(&mut self) {
        self.active = false;
        self.arm_lock = false;
        self.output = false;
        #[cfg(feature = "logging")]
        trace!("Timer reset.");
    }
}

/// Generates the constructors and the [`TimerBlock`] impl of a mode type.
///
/// The type must be a struct with `clock: C` and `core: TimerCore` fields.
macro_rules! impl_timer_block {
    ($name:ident) => {
        impl<C: $crate::clock::Clock> $name<C> {
            /// Creates a millisecond timer reading `clock`.
            pub fn new(clock: C) -> Self {
                Self::with_precision(clock, $crate::clock::Precision::Millis)
            }

            /// Creates a microsecond timer reading `clock`.
            pub fn micros(clock: C) -> Self {
                Self::with_precision(clock, $crate::clock::Precision::Micros)
            }

            pub fn with_precision(clock: C, precision: $crate::clock::Precision) -> Self {
                $name {
                    clock,
                    core: $crate::timer::TimerCore::new(precision),
                }
            }

            /// The clock this timer reads.
            pub fn clock(&self) -> &C {
                &self.clock
            }

            fn now(&self) -> u32 {
                self.clock.now(self.core.precision)
            }
        }

        impl<C: $crate::clock::Clock + Default> Default for $name<C> {
            fn default() -> Self {
                Self::new(C::default())
            }
        }

        impl<C: $crate::clock::Clock> $crate::timer::TimerBlock for $name<C> {
            fn reset(&mut self) {
                self.core.reset();
            }

            fn is_active(&self) -> bool {
                self.core.active
            }

            fn precision(&self) -> $crate::clock::Precision {
                self.core.precision
            }

            fn elapsed(&self) -> Option<u32> {
                self.core
                    .active
                    .then(|| self.core.elapsed(self.now()))
            }
        }
    };
}

pub(crate) use impl_timer_block;
