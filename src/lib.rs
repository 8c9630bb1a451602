//! # SavaTime
//! Non-blocking software timers for loop-polled control code.
//!
//! Every timer block is polled once per control-loop cycle and answers
//! instantly. The blocks follow the usual industrial function blocks:
//!
//! - [`Pulse`]: delayed one-shot, one `true` per trigger assertion.
//! - [`Generator`]: one-cycle event every period.
//! - [`Multivibrator`] and [`AsymMultivibrator`]: square waves.
//! - [`OnDelay`] (TON) and [`OffDelay`] (TOF), with [`OffDelay::remaining`].
//!
//! Time comes from an injected [`Clock`], so tests can drive timers with a
//! [`ManualClock`].
//!
//! ```
//! use savatime::{ManualClock, OnDelay};
//!
//! let clock = ManualClock::new();
//! let mut ton = OnDelay::new(&clock);
//! assert!(!ton.update(100, true));
//! clock.advance_millis(100);
//! assert!(ton.update(100, true));
//! ```

pub mod clock;
pub mod control_loop;
pub mod delay;
pub mod errors;
pub mod oscillator;
pub mod pulse;
pub mod timer;

pub use clock::{Clock, ManualClock, Precision, SystemClock, TokioClock};
pub use control_loop::{ControlLoop, LoopConfig, LoopState, LoopStatistics, TickHandler};
pub use delay::{OffDelay, OnDelay};
pub use errors::TimerError;
pub use oscillator::{AsymMultivibrator, Multivibrator};
pub use pulse::{Generator, Pulse};
pub use timer::TimerBlock;
