//! Free-running square-wave generators.

#[cfg(feature = "logging")]
use log::trace;

use crate::clock::Clock;
use crate::timer::{impl_timer_block, TimerCore};

/// Symmetric multivibrator (blinker).
///
/// While enabled, the output level flips every `period` ticks, starting low.
#[derive(Debug, Clone)]
pub struct Multivibrator<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(Multivibrator);

impl<C: Clock> Multivibrator<C> {
    /// Polls the oscillator and returns the current output level.
    pub fn update(&mut self, period: u32, enable: bool) -> bool {
        if !enable {
            self.core.active = false;
            self.core.output = false;
            return false;
        }

        let now = self.now();
        if !self.core.active {
            self.core.arm(now);
            self.core.output = false;
        }

        if self.core.elapsed(now) >= period {
            self.core.restart(now);
            self.core.output = !self.core.output;
            #[cfg(feature = "logging")]
            trace!("Multivibrator output {} at tick {}.", self.core.output, now);
        }
        self.core.output
    }

    /// Last output level, without polling.
    pub fn output(&self) -> bool {
        self.core.output
    }
}

/// Asymmetric multivibrator with separate high and low durations.
#[derive(Debug, Clone)]
pub struct AsymMultivibrator<C> {
    clock: C,
    core: TimerCore,
}

impl_timer_block!(AsymMultivibrator);

impl<C: Clock> AsymMultivibrator<C> {
    /// Polls the oscillator and returns the current output level.
    ///
    /// The output stays high for `high_period` ticks and low for `low_period`
    /// ticks. It starts in the low phase.
    pub fn update(&mut self, high_period: u32, low_period: u32, enable: bool) -> bool {
        if !enable {
            self.core.active = false;
            self.core.output = false;
            return false;
        }

        let now = self.now();
        if !self.core.active {
            self.core.arm(now);
            self.core.output = false;
        }

        let elapsed = self.core.elapsed(now);
        if self.core.output && elapsed >= high_period {
            self.core.restart(now);
            self.core.output = false;
        } else if !self.core.output && elapsed >= low_period {
            self.core.restart(now);
            self.core.output = true;
        }
        self.core.output
    }

    /// Last output level, without polling.
    pub fn output(&self) -> bool {
        self.core.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::timer::TimerBlock;

    fn trace_levels(mut poll: impl FnMut() -> bool, clock: &ManualClock, ticks: u32) -> Vec<bool> {
        (0..ticks)
            .map(|_| {
                let level = poll();
                clock.advance_millis(1);
                level
            })
            .collect()
    }

    #[test]
    fn test_multivibrator_toggles_every_period() {
        let clock = ManualClock::new();
        let mut blinker = Multivibrator::new(&clock);
        let levels = trace_levels(|| blinker.update(3, true), &clock, 12);
        assert_eq!(
            levels,
            vec![
                false, false, false, true, true, true, false, false, false, true, true, true
            ]
        );
    }

    #[test]
    fn test_multivibrator_disable_forces_low_and_restarts_low() {
        let clock = ManualClock::new();
        let mut blinker = Multivibrator::new(&clock);

        blinker.update(5, true);
        clock.advance_millis(5);
        assert!(blinker.update(5, true));

        assert!(!blinker.update(5, false));
        assert!(!blinker.output());
        assert!(!blinker.update(5, true));
        clock.advance_millis(4);
        assert!(!blinker.update(5, true));
        clock.advance_millis(1);
        assert!(blinker.update(5, true));
    }

    #[test]
    fn test_multivibrator_reset_restarts_low() {
        let clock = ManualClock::new();
        let mut blinker = Multivibrator::new(&clock);

        blinker.update(2, true);
        clock.advance_millis(2);
        assert!(blinker.update(2, true));
        blinker.reset();
        assert!(!blinker.output());
        assert!(!blinker.update(2, true));
    }

    #[test]
    fn test_asym_multivibrator_phase_durations() {
        let clock = ManualClock::new();
        let mut oscillator = AsymMultivibrator::new(&clock);
        let levels = trace_levels(|| oscillator.update(2, 3, true), &clock, 13);
        assert_eq!(
            levels,
            vec![
                false, false, false, true, true, false, false, false, true, true, false, false,
                false
            ]
        );
    }

    #[test]
    fn test_asym_multivibrator_zero_low_goes_high_on_enable() {
        let clock = ManualClock::new();
        let mut oscillator = AsymMultivibrator::new(&clock);
        assert!(oscillator.update(10, 0, true));
        clock.advance_millis(10);
        assert!(!oscillator.update(10, 0, true));
        assert!(oscillator.update(10, 0, true));
    }

    #[test]
    fn test_asym_multivibrator_disable_clears_state() {
        let clock = ManualClock::new();
        let mut oscillator = AsymMultivibrator::new(&clock);
        oscillator.update(4, 1, true);
        clock.advance_millis(1);
        assert!(oscillator.update(4, 1, true));
        assert!(!oscillator.update(4, 1, false));
        assert!(!oscillator.is_active());
        assert!(!oscillator.output());
    }
}
