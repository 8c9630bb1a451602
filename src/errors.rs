//! Error handling module for SavaTime.
//!
//! Timer blocks never fail; errors only come out of the [`ControlLoop`](crate::ControlLoop)
//! driver.

use thiserror::Error;

/// Custom error type for control loop operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Invalid parameter provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation attempted on a loop that is not running.
    #[error("Operation attempted on a stopped control loop.")]
    LoopStopped,

    /// A tick handler reported a failure.
    #[error("Tick handler failed: {0}")]
    HandlerError(String),
}
