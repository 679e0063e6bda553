//! Safety monitor implementation
//!
//! Evaluates the interlocks, the force ceiling and the sticky sensor fault.
//! Flags are derived fresh on every check and never cached.

/// Force above which any move is aborted, in newtons
pub const FORCE_CEILING_N: f32 = 15.0;

/// Why a move was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortReason {
    /// Hard kill-stop triggered
    KillStop,
    /// Soft endstop triggered
    SoftEndstop,
    /// Last force sample above the ceiling
    ForceCeiling,
    /// Sensor reads failed after all retries
    SensorFault,
}

/// Inputs to one safety check
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyInputs {
    pub soft_endstop: bool,
    pub kill_stop: bool,
    /// Last valid force sample, if any
    pub force_newtons: Option<f32>,
    /// Sticky sensor fault flag
    pub sensor_fault: bool,
}

/// Result of one safety check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyFlags {
    pub soft_endstop: bool,
    pub kill_stop: bool,
    pub force_ceiling: bool,
    pub sensor_fault: bool,
}

impl SafetyFlags {
    /// Check if any condition requires an abort
    pub fn tripped(&self) -> bool {
        self.soft_endstop || self.kill_stop || self.force_ceiling || self.sensor_fault
    }

    /// Highest-priority reason among the raised flags
    pub fn reason(&self) -> Option<AbortReason> {
        if self.kill_stop {
            Some(AbortReason::KillStop)
        } else if self.soft_endstop {
            Some(AbortReason::SoftEndstop)
        } else if self.force_ceiling {
            Some(AbortReason::ForceCeiling)
        } else if self.sensor_fault {
            Some(AbortReason::SensorFault)
        } else {
            None
        }
    }
}

/// Safety monitor for move abort detection
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    ceiling_newtons: f32,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyMonitor {
    /// Create a monitor with the standard force ceiling
    pub const fn new() -> Self {
        Self {
            ceiling_newtons: FORCE_CEILING_N,
        }
    }

    /// Check all safety conditions
    pub fn check(&self, inputs: &SafetyInputs) -> SafetyFlags {
        SafetyFlags {
            soft_endstop: inputs.soft_endstop,
            kill_stop: inputs.kill_stop,
            force_ceiling: inputs
                .force_newtons
                .is_some_and(|force| force > self.ceiling_newtons),
            sensor_fault: inputs.sensor_fault,
        }
    }
}
