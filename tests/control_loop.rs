use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use savatime::{
    ControlLoop, Generator, LoopConfig, LoopState, OnDelay, TickHandler, TimerError, TokioClock,
};
use tokio::time::sleep;

struct OnDelayRecorder {
    ton: OnDelay<TokioClock>,
    outputs: Arc<Mutex<Vec<bool>>>,
}

#[async_trait]
impl TickHandler for OnDelayRecorder {
    async fn on_tick(&mut self, _cycle: u64) -> Result<(), TimerError> {
        let output = self.ton.update(50, true);
        self.outputs.lock().unwrap().push(output);
        Ok(())
    }
}

struct EventCounter {
    generator: Generator<TokioClock>,
    events: Arc<Mutex<Vec<u64>>>,
}

#[async_trait]
impl TickHandler for EventCounter {
    async fn on_tick(&mut self, cycle: u64) -> Result<(), TimerError> {
        if self.generator.update(30, true) {
            self.events.lock().unwrap().push(cycle);
        }
        Ok(())
    }
}

struct FlakyHandler;

#[async_trait]
impl TickHandler for FlakyHandler {
    async fn on_tick(&mut self, cycle: u64) -> Result<(), TimerError> {
        if cycle % 2 == 1 {
            return Err(TimerError::HandlerError(format!("cycle {cycle}")));
        }
        Ok(())
    }
}

struct Idle;

#[async_trait]
impl TickHandler for Idle {
    async fn on_tick(&mut self, _cycle: u64) -> Result<(), TimerError> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn on_delay_polled_by_control_loop() {
    let outputs = Arc::new(Mutex::new(Vec::new()));
    let config = LoopConfig::new(Duration::from_millis(10)).with_max_cycles(10);
    let mut control = ControlLoop::new(config);

    control
        .start(OnDelayRecorder {
            ton: OnDelay::new(TokioClock::new()),
            outputs: Arc::clone(&outputs),
        })
        .await
        .unwrap();

    sleep(Duration::from_millis(200)).await;

    assert_eq!(control.state(), LoopState::Stopped);
    let stats = control.statistics();
    assert_eq!(stats.cycle_count, 10);
    assert_eq!(stats.error_count, 0);

    let outputs = outputs.lock().unwrap().clone();
    let first_high = outputs.iter().position(|&output| output);
    assert_eq!(first_high, Some(5));
    assert!(outputs[5..].iter().all(|&output| output));
}

#[tokio::test(start_paused = true)]
async fn generator_polled_by_control_loop() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut control = ControlLoop::new(LoopConfig::new(Duration::from_millis(10)).with_max_cycles(10));

    control
        .start(EventCounter {
            generator: Generator::new(TokioClock::new()),
            events: Arc::clone(&events),
        })
        .await
        .unwrap();

    sleep(Duration::from_millis(200)).await;
    assert_eq!(*events.lock().unwrap(), vec![3, 6, 9]);
}

#[tokio::test(start_paused = true)]
async fn handler_errors_are_counted_not_fatal() {
    let mut control = ControlLoop::new(LoopConfig::new(Duration::from_millis(5)).with_max_cycles(6));
    control.start(FlakyHandler).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    let stats = control.statistics();
    assert_eq!(stats.cycle_count, 6);
    assert_eq!(stats.error_count, 3);
}

#[tokio::test]
async fn zero_period_is_rejected() {
    let mut control = ControlLoop::new(LoopConfig::new(Duration::ZERO));
    let result = control.start(Idle).await;
    assert!(matches!(result, Err(TimerError::InvalidParameter(_))));
    assert_eq!(control.state(), LoopState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn pause_resume_and_stop() {
    let mut control = ControlLoop::new(LoopConfig::new(Duration::from_millis(10)));
    control.start(Idle).await.unwrap();

    sleep(Duration::from_millis(35)).await;
    let before_pause = control.statistics().cycle_count;
    assert!(before_pause > 0);

    control.pause().unwrap();
    assert_eq!(control.state(), LoopState::Paused);
    assert!(matches!(control.pause(), Err(TimerError::LoopStopped)));

    sleep(Duration::from_millis(100)).await;
    assert_eq!(control.statistics().cycle_count, before_pause);

    control.resume().unwrap();
    assert!(matches!(
        control.resume(),
        Err(TimerError::InvalidParameter(_))
    ));
    sleep(Duration::from_millis(55)).await;
    assert!(control.statistics().cycle_count > before_pause);

    control.stop().await.unwrap();
    assert_eq!(control.state(), LoopState::Stopped);
    assert_eq!(control.stop().await, Err(TimerError::LoopStopped));
}

#[tokio::test(start_paused = true)]
async fn restart_resets_statistics() {
    let mut control = ControlLoop::new(LoopConfig::new(Duration::from_millis(10)).with_max_cycles(3));
    control.start(Idle).await.unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(control.statistics().cycle_count, 3);

    control.start(Idle).await.unwrap();
    assert_eq!(control.state(), LoopState::Running);
    assert_eq!(control.statistics().cycle_count, 0);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(control.statistics().cycle_count, 3);
}
