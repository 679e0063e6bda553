//! State machine definition
//!
//! All motion and telemetry behavior is a function of the current state
//! and an event.

use clampforce_protocol::ControlCommand;

use super::events::Event;

/// Controller run states
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Power-on initialization, before the boot sequence ran
    Boot,
    /// Retracting to the endstop, then clearing it
    Homing,
    /// Motor off, waiting for a host command
    AwaitCommand,
    /// Closing the clamp toward the accepted target force
    MovingToForce(ControlCommand),
    /// Target reached, holding position for the commanded time
    Holding { hold_ms: u64 },
}

impl RunState {
    /// Check if a host command is accepted in this state
    pub fn accepts_commands(&self) -> bool {
        matches!(self, RunState::AwaitCommand)
    }

    /// Check if telemetry samples are streamed in this state
    pub fn streams_telemetry(&self) -> bool {
        matches!(
            self,
            RunState::Homing | RunState::MovingToForce(_) | RunState::Holding { .. }
        )
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use RunState::*;

        match (self, event) {
            (Boot, SetupComplete) => Homing,

            (Homing, Homed { .. }) => AwaitCommand,

            (AwaitCommand, CommandAccepted(command)) => MovingToForce(command),

            // Zero or negative hold goes straight back to homing
            (MovingToForce(command), Converged) => match command.hold_ms() {
                0 => Homing,
                hold_ms => Holding { hold_ms },
            },
            (MovingToForce(_), Aborted(_)) => Homing,

            (Holding { .. }, HoldExpired) => Homing,

            (state, _) => state,
        }
    }
}
