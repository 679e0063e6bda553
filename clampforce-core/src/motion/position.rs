//! Position bookkeeping for the clamp axis
//!
//! Travel convention: positive positions retract the clamp toward the
//! endstops, negative positions close it onto the specimen.

/// Distance of the return move that clears the homing switch, in microsteps
pub const HOME_OFFSET_STEPS: i32 = 200;

/// Snapshot of the axis as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    /// Absolute position in microsteps
    pub position: i32,
    /// Commanded speed in steps per second; sign is direction
    pub speed: f32,
    /// Position-mode target (equals `position` when idle)
    pub target: i32,
}

/// Errors that can occur during a position-mode move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionError {
    /// Target not reached within the time box
    Timeout,
}
