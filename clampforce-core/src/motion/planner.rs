//! Acceleration ramp for position-mode moves
//!
//! Constant acceleration up to a speed ceiling, and deceleration once the
//! stopping distance covers the remaining travel. The planner only computes
//! speed; the driver integrates it into steps.

/// Speed floor while decelerating, so the final steps still arrive (steps/s)
pub const MIN_RAMP_SPEED: f32 = 10.0;

/// Current phase of the ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampPhase {
    /// No motion outstanding
    Stopped,
    /// Speeding up toward the ceiling
    Accelerating,
    /// At the speed ceiling
    Cruising,
    /// Slowing down to stop on target (or to reverse)
    Decelerating,
}

/// Speed planner for position-mode moves
#[derive(Debug, Clone)]
pub struct RampPlanner {
    /// Signed speed in steps/s
    speed: f32,
    /// Speed ceiling in steps/s
    max_speed: f32,
    /// Acceleration in steps/s²
    acceleration: f32,
    phase: RampPhase,
}

impl RampPlanner {
    /// Create a planner; non-positive parameters are raised to 1.0
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            speed: 0.0,
            max_speed: max_speed.max(1.0),
            acceleration: acceleration.max(1.0),
            phase: RampPhase::Stopped,
        }
    }

    /// Current signed speed in steps/s
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current ramp phase
    pub fn phase(&self) -> RampPhase {
        self.phase
    }

    /// Check if stopped
    pub fn is_stopped(&self) -> bool {
        self.phase == RampPhase::Stopped
    }

    /// Drop the ramp to zero immediately
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.phase = RampPhase::Stopped;
    }

    /// Distance needed to stop from the current speed, in steps
    pub fn stopping_distance(&self) -> f32 {
        self.speed * self.speed / (2.0 * self.acceleration)
    }

    /// Advance the ramp by `dt_s` seconds
    ///
    /// # Arguments
    /// - `distance_to_go`: signed steps remaining to the target
    /// - `dt_s`: time since the previous update
    ///
    /// # Returns
    /// The new signed speed
    pub fn update(&mut self, distance_to_go: i32, dt_s: f32) -> f32 {
        if distance_to_go == 0 {
            self.stop();
            return 0.0;
        }

        let direction = if distance_to_go > 0 { 1.0 } else { -1.0 };
        let remaining = distance_to_go.unsigned_abs() as f32;
        let delta = self.acceleration * dt_s.max(0.0);
        // Speed component toward the target
        let toward = self.speed * direction;

        let next = if toward < 0.0 {
            self.phase = RampPhase::Decelerating;
            toward + delta
        } else if self.stopping_distance() >= remaining {
            self.phase = RampPhase::Decelerating;
            (toward - delta).max(MIN_RAMP_SPEED.min(self.max_speed))
        } else if toward < self.max_speed {
            self.phase = RampPhase::Accelerating;
            (toward + delta).min(self.max_speed)
        } else {
            self.phase = RampPhase::Cruising;
            self.max_speed
        };

        self.speed = next * direction;
        self.speed
    }
}
