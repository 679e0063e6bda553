//! Software-timed step/direction driver
//!
//! Drives an A4988-class driver from plain GPIO: one STEP pulse per
//! microstep, DIR for direction, EN to energize the outputs and optionally
//! MS1..MS3 for the microstep mode. Step timing comes from polling; nothing
//! here blocks except the step pulse itself.

use clampforce_core::config::StepperConfig;
use clampforce_core::motion::{RampPlanner, StepMode};
use clampforce_core::traits::{Clock, StepperDriver};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Control pins of a step/direction driver
pub struct StepDirPins<P> {
    pub step: P,
    pub dir: P,
    pub enable: P,
    /// MS1, MS2, MS3; `None` when the mode is strapped in hardware
    pub microstep: Option<[P; 3]>,
}

/// Driver timing and polarity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDirConfig {
    /// STEP high time in microseconds
    pub step_pulse_us: u32,
    /// EN is active low (A4988, DRV8825)
    pub enable_active_low: bool,
    /// Speed ceiling in steps/s, both modes
    pub max_speed: f32,
    /// Position-mode acceleration in steps/s²
    pub acceleration: f32,
}

impl From<&StepperConfig> for StepDirConfig {
    fn from(config: &StepperConfig) -> Self {
        Self {
            step_pulse_us: config.step_pulse_us,
            enable_active_low: config.enable_active_low,
            max_speed: config.max_speed,
            acceleration: config.acceleration,
        }
    }
}

/// Step/direction stepper driven from GPIO
pub struct StepDirStepper<P, C, D> {
    pins: StepDirPins<P>,
    clock: C,
    delay: D,
    config: StepDirConfig,

    enabled: bool,
    mode: StepMode,
    /// Last level written to DIR (`true` = positive)
    dir_positive: Option<bool>,

    position: i32,
    target: i32,
    /// Signed speed in steps/s
    speed: f32,
    last_step_us: u64,

    planner: RampPlanner,
    /// Fractional steps accumulated by the ramp
    progress: f32,
    last_run_us: Option<u64>,
}

impl<P, C, D> StepDirStepper<P, C, D>
where
    P: OutputPin,
    C: Clock,
    D: DelayNs,
{
    /// Create a driver with outputs released
    pub fn new(pins: StepDirPins<P>, clock: C, delay: D, config: StepDirConfig) -> Self {
        let mut stepper = Self {
            pins,
            clock,
            delay,
            config,
            enabled: false,
            mode: StepMode::default(),
            dir_positive: None,
            position: 0,
            target: 0,
            speed: 0.0,
            last_step_us: 0,
            planner: RampPlanner::new(config.max_speed, config.acceleration),
            progress: 0.0,
            last_run_us: None,
        };
        let _ = stepper.pins.step.set_low();
        stepper.write_enable(false);
        stepper
    }

    /// Selected microstep mode
    pub fn step_mode(&self) -> StepMode {
        self.mode
    }

    fn write_enable(&mut self, on: bool) {
        // Pin errors are not recoverable here; the driver keeps its own state
        let high = on != self.config.enable_active_low;
        let _ = if high {
            self.pins.enable.set_high()
        } else {
            self.pins.enable.set_low()
        };
    }

    fn write_dir(&mut self, positive: bool) {
        if self.dir_positive == Some(positive) {
            return;
        }
        let _ = if positive {
            self.pins.dir.set_high()
        } else {
            self.pins.dir.set_low()
        };
        self.dir_positive = Some(positive);
    }

    /// One step in the given direction
    fn step(&mut self, positive: bool) {
        self.write_dir(positive);
        let _ = self.pins.step.set_high();
        self.delay.delay_us(self.config.step_pulse_us);
        let _ = self.pins.step.set_low();
        self.position += if positive { 1 } else { -1 };
    }

    fn reset_ramp(&mut self) {
        self.planner.stop();
        self.progress = 0.0;
        self.last_run_us = None;
    }
}

impl<P, C, D> StepperDriver for StepDirStepper<P, C, D>
where
    P: OutputPin,
    C: Clock,
    D: DelayNs,
{
    fn enable(&mut self) {
        self.write_enable(true);
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.write_enable(false);
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_step_mode(&mut self, mode: StepMode) {
        self.mode = mode;
        if let Some(pins) = self.pins.microstep.as_mut() {
            for (pin, high) in pins.iter_mut().zip(mode.ms_levels()) {
                let _ = if high { pin.set_high() } else { pin.set_low() };
            }
        }
    }

    fn set_speed(&mut self, steps_per_s: f32) {
        let max = self.config.max_speed;
        self.speed = steps_per_s.clamp(-max, max);
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn run_speed(&mut self) -> bool {
        if !self.enabled || self.speed == 0.0 {
            return false;
        }
        let now = self.clock.now_us();
        let interval_us = (1_000_000.0 / self.speed.abs()) as u64;
        if now.saturating_sub(self.last_step_us) < interval_us {
            return false;
        }
        self.last_step_us = now;
        self.step(self.speed > 0.0);
        true
    }

    fn move_to(&mut self, position: i32) {
        if self.planner.is_stopped() {
            self.reset_ramp();
        }
        self.target = position;
    }

    fn run(&mut self) -> bool {
        let to_go = self.distance_to_go();
        if to_go == 0 {
            self.reset_ramp();
            self.speed = 0.0;
            return false;
        }

        let now = self.clock.now_us();
        let dt_s = match self.last_run_us {
            Some(last) => now.saturating_sub(last) as f32 / 1_000_000.0,
            None => 0.0,
        };
        self.last_run_us = Some(now);

        self.speed = self.planner.update(to_go, dt_s);
        // At most one step per call; the excess carries to the next call
        self.progress = (self.progress + self.speed.abs() * dt_s).min(2.0);
        if self.progress >= 1.0 && self.enabled && self.speed != 0.0 {
            self.progress -= 1.0;
            self.step(self.speed > 0.0);
        }

        if self.distance_to_go() == 0 {
            self.reset_ramp();
            self.speed = 0.0;
            return false;
        }
        true
    }

    fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    fn current_position(&self) -> i32 {
        self.position
    }

    fn set_current_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
        self.speed = 0.0;
        self.reset_ramp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    type Log = Rc<RefCell<Vec<(&'static str, bool)>>>;

    struct MockPin {
        name: &'static str,
        log: Log,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    #[derive(Clone)]
    struct MockClock(Rc<Cell<u64>>);

    impl MockClock {
        fn advance_us(&self, us: u64) {
            self.0.set(self.0.get() + us);
        }
    }

    impl Clock for MockClock {
        fn now_us(&self) -> u64 {
            self.0.get()
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn rig(with_microstep: bool) -> (StepDirStepper<MockPin, MockClock, NoDelay>, MockClock, Log) {
        let log: Log = Rc::default();
        let pin = |name| MockPin {
            name,
            log: log.clone(),
        };
        let pins = StepDirPins {
            step: pin("step"),
            dir: pin("dir"),
            enable: pin("en"),
            microstep: with_microstep.then(|| [pin("ms1"), pin("ms2"), pin("ms3")]),
        };
        let clock = MockClock(Rc::default());
        let stepper = StepDirStepper::new(
            pins,
            clock.clone(),
            NoDelay,
            StepDirConfig::from(&StepperConfig::default()),
        );
        (stepper, clock, log)
    }

    fn levels(log: &Log, name: &str) -> Vec<bool> {
        log.borrow()
            .iter()
            .filter(|(pin, _)| *pin == name)
            .map(|(_, level)| *level)
            .collect()
    }

    #[test]
    fn test_enable_is_active_low() {
        let (mut stepper, _, log) = rig(false);
        // Released at construction
        assert_eq!(levels(&log, "en"), [true]);
        stepper.enable();
        assert!(stepper.is_enabled());
        stepper.disable();
        assert_eq!(levels(&log, "en"), [true, false, true]);
    }

    #[test]
    fn test_microstep_pins() {
        let (mut stepper, _, log) = rig(true);
        stepper.set_step_mode(StepMode::Sixteenth);
        assert_eq!(stepper.step_mode(), StepMode::Sixteenth);
        assert_eq!(levels(&log, "ms1"), [true]);
        assert_eq!(levels(&log, "ms3"), [true]);

        // Strapped drivers still record the mode
        let (mut strapped, _, _) = rig(false);
        strapped.set_step_mode(StepMode::Half);
        assert_eq!(strapped.step_mode(), StepMode::Half);
    }

    #[test]
    fn test_run_speed_paces_steps() {
        let (mut stepper, clock, log) = rig(false);
        stepper.enable();
        stepper.set_speed(-100.0);

        // 100 steps/s is one step per 10 ms
        assert!(!stepper.run_speed());
        clock.advance_us(10_000);
        assert!(stepper.run_speed());
        clock.advance_us(5_000);
        assert!(!stepper.run_speed());
        clock.advance_us(5_000);
        assert!(stepper.run_speed());

        assert_eq!(stepper.current_position(), -2);
        assert_eq!(levels(&log, "dir"), [false]);
        assert_eq!(levels(&log, "step"), [false, true, false, true, false]);
    }

    #[test]
    fn test_run_speed_idle_when_disabled() {
        let (mut stepper, clock, _) = rig(false);
        stepper.set_speed(500.0);
        clock.advance_us(1_000_000);
        assert!(!stepper.run_speed());

        stepper.enable();
        stepper.set_speed(0.0);
        assert!(!stepper.run_speed());
        assert_eq!(stepper.current_position(), 0);
    }

    #[test]
    fn test_speed_capped() {
        let (mut stepper, _, _) = rig(false);
        stepper.set_speed(-1e6);
        assert_eq!(stepper.speed(), -StepperConfig::default().max_speed);
    }

    #[test]
    fn test_position_move_arrives() {
        let (mut stepper, clock, _) = rig(false);
        stepper.enable();
        stepper.move_to(-200);
        assert_eq!(stepper.distance_to_go(), -200);
        assert_eq!(stepper.motion_state().target, -200);

        let mut calls = 0;
        while stepper.run() {
            clock.advance_us(1_000);
            calls += 1;
            assert!(calls < 20_000, "move did not finish");
        }
        let state = stepper.motion_state();
        assert_eq!((state.position, state.target, state.speed), (-200, -200, 0.0));
    }

    #[test]
    fn test_set_current_position_clears_target() {
        let (mut stepper, clock, _) = rig(false);
        stepper.enable();
        stepper.move_to(500);
        for _ in 0..100 {
            clock.advance_us(1_000);
            stepper.run();
        }
        let here = stepper.current_position();
        assert!(here > 0);

        stepper.set_current_position(0);
        assert_eq!(stepper.current_position(), 0);
        assert_eq!(stepper.distance_to_go(), 0);
        assert_eq!(stepper.speed(), 0.0);
        assert!(!stepper.run());
    }
}
