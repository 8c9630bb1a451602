use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
#[cfg(feature = "logging")]
use log::{debug, error};

use crate::errors::TimerError;

/// Represents the state of a control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
    Stopped,
}

/// Statistics for a control loop.
#[derive(Debug, Clone, Default)]
pub struct LoopStatistics {
    /// Number of completed handler calls.
    pub cycle_count: u64,
    /// Number of handler calls that returned an error.
    pub error_count: u64,
    /// Time from loop start to the last completed cycle.
    pub elapsed_time: Duration,
}

/// The body of a control loop, polled once per cycle.
///
/// Handlers usually own their timer blocks and poll them here.
#[async_trait]
pub trait TickHandler: Send {
    /// Runs one cycle. `cycle` counts from 0.
    async fn on_tick(&mut self, cycle: u64) -> Result<(), TimerError>;
}

/// Settings for a [`ControlLoop`].
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Cycle period.
    pub period: Duration,
    /// What to do when a cycle overran the period.
    pub missed_tick_behavior: MissedTickBehavior,
    /// Stop after this many cycles, run forever when `None`.
    pub max_cycles: Option<u64>,
}

impl LoopConfig {
    pub fn new(period: Duration) -> Self {
        LoopConfig {
            period,
            missed_tick_behavior: MissedTickBehavior::Skip,
            max_cycles: None,
        }
    }

    pub fn with_missed_tick_behavior(mut self, behavior: MissedTickBehavior) -> Self {
        self.missed_tick_behavior = behavior;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }
}

/// Cooperative control loop that polls a [`TickHandler`] at a fixed period.
///
/// Timer blocks never wait; this driver is the one place that sleeps between
/// cycles.
pub struct ControlLoop {
    config: LoopConfig,
    state: Arc<Mutex<LoopState>>,
    handle: Option<JoinHandle<()>>,
    statistics: Arc<Mutex<LoopStatistics>>,
    wake: Arc<Notify>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ControlLoop {
    /// Creates a stopped control loop.
    pub fn new(config: LoopConfig) -> Self {
        ControlLoop {
            config,
            state: Arc::new(Mutex::new(LoopState::Stopped)),
            handle: None,
            statistics: Arc::new(Mutex::new(LoopStatistics::default())),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Starts running `handler`, replacing any loop already running.
    pub async fn start<H>(&mut self, handler: H) -> Result<(), TimerError>
    where
        H: TickHandler + 'static,
    {
        if self.config.period.is_zero() {
            return Err(TimerError::InvalidParameter(
                "Cycle period must be greater than zero.".into(),
            ));
        }

        self.stop().await.ok(); // Stop any existing loop

        *lock(&self.state) = LoopState::Running;
        *lock(&self.statistics) = LoopStatistics::default();
        self.wake = Arc::new(Notify::new());

        let state = Arc::clone(&self.state);
        let statistics = Arc::clone(&self.statistics);
        let wake = Arc::clone(&self.wake);
        let period = self.config.period;
        let behavior = self.config.missed_tick_behavior;
        let max_cycles = self.config.max_cycles;

        #[cfg(feature = "logging")]
        debug!("Starting control loop with period {:?}.", period);

        self.handle = Some(tokio::spawn(async move {
            let mut handler = handler;
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(behavior);
            let start_time = Instant::now();
            let mut cycle: u64 = 0;

            loop {
                let current = *lock(&state);
                match current {
                    LoopState::Stopped => {
                        #[cfg(feature = "logging")]
                        debug!("Control loop stopped.");
                        break;
                    }
                    LoopState::Paused => {
                        wake.notified().await;
                        // Resume one full period after the wake-up.
                        interval.reset();
                        continue;
                    }
                    LoopState::Running => {}
                }

                tokio::select! {
                    _ = interval.tick() => {}
                    _ = wake.notified() => continue,
                }

                let result = handler.on_tick(cycle).await;
                cycle += 1;

                {
                    let mut stats = lock(&statistics);
                    stats.cycle_count += 1;
                    stats.elapsed_time = start_time.elapsed();
                    if let Err(error) = result {
                        stats.error_count += 1;
                        #[cfg(feature = "logging")]
                        error!("Tick handler failed on cycle {}: {}", cycle - 1, error);
                        #[cfg(not(feature = "logging"))]
                        let _ = error;
                    }
                }

                if let Some(max_cycles) = max_cycles {
                    if cycle >= max_cycles {
                        #[cfg(feature = "logging")]
                        debug!("Control loop reached its cycle limit.");
                        break;
                    }
                }
            }

            *lock(&state) = LoopState::Stopped;
        }));

        Ok(())
    }

    /// Pauses the loop before its next cycle.
    pub fn pause(&self) -> Result<(), TimerError> {
        let mut state = lock(&self.state);
        if *state == LoopState::Running {
            *state = LoopState::Paused;
            drop(state);
            self.wake.notify_one();
            #[cfg(feature = "logging")]
            debug!("Control loop paused.");
            Ok(())
        } else {
            Err(TimerError::LoopStopped)
        }
    }

    /// Resumes a paused loop. The next cycle runs one period later.
    pub fn resume(&self) -> Result<(), TimerError> {
        let mut state = lock(&self.state);
        if *state == LoopState::Paused {
            *state = LoopState::Running;
            drop(state);
            self.wake.notify_one();
            #[cfg(feature = "logging")]
            debug!("Control loop resumed.");
            Ok(())
        } else {
            Err(TimerError::InvalidParameter(
                "Control loop is not paused.".into(),
            ))
        }
    }

    /// Stops the loop and waits for its task to finish the current cycle.
    pub async fn stop(&mut self) -> Result<(), TimerError> {
        {
            let mut state = lock(&self.state);
            if *state == LoopState::Stopped {
                // The task may have ended on its own after `max_cycles`.
                self.handle.take();
                return Err(TimerError::LoopStopped);
            }
            *state = LoopState::Stopped;
        }

        self.wake.notify_one();
        if let Some(handle) = self.handle.take() {
            #[cfg(feature = "logging")]
            debug!("Stopping control loop.");
            let _ = handle.await;
        }
        Ok(())
    }

    /// Gets the loop's statistics.
    pub fn statistics(&self) -> LoopStatistics {
        lock(&self.statistics).clone()
    }

    /// Gets the current state of the loop.
    pub fn state(&self) -> LoopState {
        *lock(&self.state)
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }
}

impl Drop for ControlLoop {
    fn drop(&mut self) {
        *lock(&self.state) = LoopState::Stopped;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
