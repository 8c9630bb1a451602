//! Tick sources for timer blocks.
//!
//! A [`Clock`] hands out two free-running `u32` counters, milliseconds and
//! microseconds. Both wrap to 0 after `u32::MAX`; timers only ever look at the
//! wrapping distance between two readings, so the rollover is harmless.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Resolution of the tick source a timer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Millisecond ticks.
    #[default]
    Millis,
    /// Microsecond ticks.
    Micros,
}

/// A monotonic, wrapping tick source.
pub trait Clock {
    /// Current tick count in milliseconds.
    fn now_ms(&self) -> u32;

    /// Current tick count in microseconds.
    fn now_us(&self) -> u32;

    /// Current tick count at the given precision.
    fn now(&self, precision: Precision) -> u32 {
        match precision {
            Precision::Millis => self.now_ms(),
            Precision::Micros => self.now_us(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

/// Clock backed by [`std::time::Instant`], counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock reading 0 now.
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation keeps the low 32 bits, i.e. wraps modulo 2^32.
        self.origin.elapsed().as_millis() as u32
    }

    fn now_us(&self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }
}

/// Clock backed by [`tokio::time::Instant`].
///
/// Follows tokio's paused test clock, so `tokio::time::advance` moves it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    /// Creates a clock reading 0 now.
    pub fn new() -> Self {
        TokioClock {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }

    fn now_us(&self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }
}

/// Hand-driven clock for tests and simulations.
///
/// The millisecond and microsecond counters are independent: advancing one
/// leaves the other untouched.
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: AtomicU32,
    us: AtomicU32,
}

impl ManualClock {
    /// Creates a clock with both counters at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock with the millisecond counter at `ms`.
    pub fn starting_at(ms: u32) -> Self {
        ManualClock {
            ms: AtomicU32::new(ms),
            us: AtomicU32::new(0),
        }
    }

    pub fn set_millis(&self, ms: u32) {
        self.ms.store(ms, Ordering::Relaxed);
    }

    pub fn set_micros(&self, us: u32) {
        self.us.store(us, Ordering::Relaxed);
    }

    /// Moves the millisecond counter forward, wrapping at `u32::MAX`.
    pub fn advance_millis(&self, ms: u32) {
        // fetch_add wraps on overflow
        self.ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Moves the microsecond counter forward, wrapping at `u32::MAX`.
    pub fn advance_micros(&self, us: u32) {
        self.us.fetch_add(us, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }

    fn now_us(&self) -> u32 {
        self.us.load(Ordering::Relaxed)
    }
}
