//! Events reported by the controller
//!
//! Transition events drive [`RunState::transition`]; the rest are
//! informational and leave the state unchanged.
//!
//! [`RunState::transition`]: super::RunState::transition

use clampforce_protocol::{ControlCommand, ParseError};

use crate::motion::PositionError;
use crate::safety::AbortReason;
use crate::sensor::SensorFault;

/// Events produced while running the control loop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Boot sequence finished
    SetupComplete,
    /// Homing switch found and offset move done
    ///
    /// `offset_error` is set when the offset move hit its time box; the
    /// machine proceeds regardless.
    Homed { offset_error: Option<PositionError> },

    // Command events
    /// Host command accepted in AwaitCommand
    CommandAccepted(ControlCommand),
    /// Line rejected by the parser
    CommandRejected(ParseError),
    /// Valid command received outside AwaitCommand and discarded
    CommandBusy,

    // Move events
    /// Force settled into the target band
    Converged,
    /// Safety monitor stopped the move
    Aborted(AbortReason),
    /// Commanded hold time elapsed
    HoldExpired,

    // Sensor events
    /// Sensor power-cycle reset issued
    SensorReset,
    /// Sensor did not answer after a power cycle
    SensorBusAbsent,
    /// Sensor read failed after all retries; sticky fault set
    SensorFault(SensorFault),
}

impl Event {
    /// Check if this event can change the run state
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            Event::SetupComplete
                | Event::Homed { .. }
                | Event::CommandAccepted(_)
                | Event::Converged
                | Event::Aborted(_)
                | Event::HoldExpired
        )
    }

    /// Check if this event indicates a fault worth a warning
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Event::Aborted(_)
                | Event::SensorReset
                | Event::SensorBusAbsent
                | Event::SensorFault(_)
                | Event::Homed {
                    offset_error: Some(_)
                }
        )
    }
}
