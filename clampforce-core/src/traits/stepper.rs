//! Stepper motor driver trait
//!
//! Abstracts a step/direction driver (A4988, DRV8825 and similar) run in
//! software: velocity mode is re-armed by calling `run_speed` every loop
//! pass, position mode by calling `run`.

use crate::motion::{MotionState, PositionError, StepMode};
use crate::traits::Clock;

/// Trait for stepper motor drivers
///
/// Positions are absolute microstep counts. Negative speed moves toward
/// negative positions.
pub trait StepperDriver {
    /// Energize the driver outputs
    fn enable(&mut self);

    /// Release the driver outputs; the motor no longer holds position
    fn disable(&mut self);

    /// Check if the driver is enabled
    fn is_enabled(&self) -> bool;

    /// Select the microstep mode
    fn set_step_mode(&mut self, mode: StepMode);

    /// Set the constant speed for velocity mode in steps per second
    fn set_speed(&mut self, steps_per_s: f32);

    /// Current commanded speed in steps per second
    fn speed(&self) -> f32;

    /// Issue a step if one is due at the current speed
    ///
    /// Non-blocking. Returns `true` if a step was taken.
    fn run_speed(&mut self) -> bool;

    /// Set an absolute target for position mode
    fn move_to(&mut self, position: i32);

    /// Advance the acceleration ramp toward the target and step if due
    ///
    /// Non-blocking. Returns `true` while the target has not been reached.
    fn run(&mut self) -> bool;

    /// Signed steps remaining to the position-mode target
    fn distance_to_go(&self) -> i32;

    /// Absolute position in microsteps
    fn current_position(&self) -> i32;

    /// Redefine the current position; also stops motion and clears the target
    fn set_current_position(&mut self, position: i32);

    /// Snapshot of position, speed and target
    fn motion_state(&self) -> MotionState {
        MotionState {
            position: self.current_position(),
            speed: self.speed(),
            target: self.current_position() + self.distance_to_go(),
        }
    }

    /// Run position mode until the target is reached or `timeout_ms` elapses
    ///
    /// Blocking, and deliberately unaware of interlocks or host input. On
    /// timeout the target is abandoned at the position reached.
    fn run_to_position<C: Clock>(&mut self, clock: &C, timeout_ms: u64) -> Result<(), PositionError> {
        let started = clock.now_ms();
        while self.run() {
            if clock.now_ms().saturating_sub(started) >= timeout_ms {
                let here = self.current_position();
                self.set_current_position(here);
                return Err(PositionError::Timeout);
            }
        }
        Ok(())
    }
}
