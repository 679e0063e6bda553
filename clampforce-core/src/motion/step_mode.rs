//! Microstep mode selection
//!
//! MS1/MS2/MS3 levels follow the A4988 truth table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Microstep resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepMode {
    #[default]
    Full,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl StepMode {
    /// Logic levels for MS1, MS2, MS3
    pub const fn ms_levels(self) -> [bool; 3] {
        match self {
            StepMode::Full => [false, false, false],
            StepMode::Half => [true, false, false],
            StepMode::Quarter => [false, true, false],
            StepMode::Eighth => [true, true, false],
            StepMode::Sixteenth => [true, true, true],
        }
    }
}
