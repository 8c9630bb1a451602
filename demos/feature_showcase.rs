use async_trait::async_trait;
use std::time::Duration;
use savatime::{
    AsymMultivibrator, ControlLoop, Generator, LoopConfig, Multivibrator, OffDelay, OnDelay,
    Pulse, TickHandler, TimerBlock, TimerError, TokioClock,
};
use tokio::time::sleep;

/// A small machine: a start button, a motor behind an on-delay, a fan that
/// runs on after the motor stops, and some status lights.
struct Machine {
    start_pulse: Pulse<TokioClock>,
    motor_delay: OnDelay<TokioClock>,
    fan_run_on: OffDelay<TokioClock>,
    heartbeat: Generator<TokioClock>,
    status_led: Multivibrator<TokioClock>,
    beacon: AsymMultivibrator<TokioClock>,
}

impl Machine {
    fn new(clock: TokioClock) -> Self {
        Machine {
            start_pulse: Pulse::new(clock),
            motor_delay: OnDelay::new(clock),
            fan_run_on: OffDelay::new(clock),
            heartbeat: Generator::new(clock),
            status_led: Multivibrator::new(clock),
            beacon: AsymMultivibrator::new(clock),
        }
    }
}

#[async_trait]
impl TickHandler for Machine {
    async fn on_tick(&mut self, cycle: u64) -> Result<(), TimerError> {
        // Button held for the first second, motor requested for three.
        let button = cycle < 10;
        let motor_request = cycle < 30;

        if self.start_pulse.update(200, button) {
            println!("[{cycle:>3}] start pulse");
        }

        let motor = self.motor_delay.update(500, motor_request);
        let fan = self.fan_run_on.update(1_000, motor);
        if fan && !motor {
            println!(
                "[{cycle:>3}] fan run-on, {} ms left",
                self.fan_run_on.remaining(1_000)
            );
        }

        if self.heartbeat.update(1_000, true) {
            println!("[{cycle:>3}] heartbeat");
        }

        let led = self.status_led.update(300, motor);
        let beacon = self.beacon.update(100, 400, fan);
        println!("[{cycle:>3}] motor={motor} fan={fan} led={led} beacon={beacon}");

        if cycle == 45 {
            self.heartbeat.reset();
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let config = LoopConfig::new(Duration::from_millis(100)).with_max_cycles(60);
    let mut control = ControlLoop::new(config);

    control
        .start(Machine::new(TokioClock::new()))
        .await
        .unwrap();

    sleep(Duration::from_secs(2)).await;
    println!("Pausing control loop...");
    control.pause().unwrap();
    sleep(Duration::from_millis(500)).await;
    println!("Resuming control loop...");
    control.resume().unwrap();

    sleep(Duration::from_secs(5)).await;
    println!("Loop statistics: {:?}", control.statistics());

    if let Err(e) = control.stop().await {
        println!("Loop already finished: {}", e);
    }
}
