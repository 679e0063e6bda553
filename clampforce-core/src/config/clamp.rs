//! Clamp machine configuration
//!
//! Control thresholds (convergence band, speed tier, force ceiling, sample
//! interval) are fixed constants in the control module and are not part of
//! this configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors found by [`ClampConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serial baud rate is zero
    InvalidBaud,
    /// Sensor address does not fit in 7 bits
    InvalidSensorAddress,
    /// Sensor bus frequency is zero or above fast-mode plus
    InvalidBusFrequency,
    /// A stepper speed or the acceleration is not a positive finite number
    InvalidSpeed,
    /// Slow speed must be below medium speed
    SpeedTiersInverted,
    /// Medium or homing speed exceeds the stepper speed ceiling
    SpeedAboveMax,
    /// Step pulse width is zero
    InvalidPulseWidth,
    /// Offset move time box is zero
    InvalidOffsetTimeout,
}

/// Host serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SerialConfig {
    /// Baud rate, 8N1
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud: 9600 }
    }
}

/// Force sensor bus and power-cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SensorConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Bus clock in Hz
    pub bus_frequency_hz: u32,
    /// Supply held off during a reset (ms)
    pub power_off_ms: u32,
    /// Settle after supply on, before the presence check (ms)
    pub power_on_settle_ms: u32,
    /// Settle after the presence check, before the first valid conversion (ms)
    pub conversion_settle_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: 0x28,
            bus_frequency_hz: 100_000,
            power_off_ms: 100,
            power_on_settle_ms: 50,
            conversion_settle_ms: 10,
        }
    }
}

/// Stepper speeds and driver timing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StepperConfig {
    /// Retract speed while homing (steps/s)
    pub homing_speed: f32,
    /// Closing speed when far from the target force (steps/s)
    pub medium_speed: f32,
    /// Closing speed near the target force (steps/s)
    pub slow_speed: f32,
    /// Position-mode speed ceiling (steps/s)
    pub max_speed: f32,
    /// Position-mode acceleration (steps/s²)
    pub acceleration: f32,
    /// Step pulse high time (µs)
    pub step_pulse_us: u32,
    /// Driver enable input is active-low
    pub enable_active_low: bool,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            homing_speed: 600.0,
            medium_speed: 200.0,
            slow_speed: 50.0,
            max_speed: 1000.0,
            acceleration: 500.0,
            step_pulse_us: 2,
            enable_active_low: true,
        }
    }
}

/// Timing of the non-control parts of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MotionConfig {
    /// Time box for the blocking offset move after homing (ms)
    pub offset_timeout_ms: u32,
    /// Pause between a safety stop and releasing the motor (ms)
    pub abort_pause_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            offset_timeout_ms: 2000,
            abort_pause_ms: 500,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ClampConfig {
    pub serial: SerialConfig,
    pub sensor: SensorConfig,
    pub stepper: StepperConfig,
    pub motion: MotionConfig,
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl ClampConfig {
    /// Check ranges and cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.baud == 0 {
            return Err(ConfigError::InvalidBaud);
        }

        if self.sensor.address > 0x7F {
            return Err(ConfigError::InvalidSensorAddress);
        }
        if self.sensor.bus_frequency_hz == 0 || self.sensor.bus_frequency_hz > 1_000_000 {
            return Err(ConfigError::InvalidBusFrequency);
        }

        let stepper = &self.stepper;
        let speeds = [
            stepper.homing_speed,
            stepper.medium_speed,
            stepper.slow_speed,
            stepper.max_speed,
            stepper.acceleration,
        ];
        if !speeds.into_iter().all(positive) {
            return Err(ConfigError::InvalidSpeed);
        }
        if stepper.slow_speed >= stepper.medium_speed {
            return Err(ConfigError::SpeedTiersInverted);
        }
        if stepper.medium_speed > stepper.max_speed || stepper.homing_speed > stepper.max_speed {
            return Err(ConfigError::SpeedAboveMax);
        }
        if stepper.step_pulse_us == 0 {
            return Err(ConfigError::InvalidPulseWidth);
        }

        if self.motion.offset_timeout_ms == 0 {
            return Err(ConfigError::InvalidOffsetTimeout);
        }

        Ok(())
    }
}
