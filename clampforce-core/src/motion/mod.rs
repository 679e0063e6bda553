//! Motion types
//!
//! Position bookkeeping, microstep modes and the acceleration ramp used for
//! position-mode moves.

pub mod planner;
pub mod position;
pub mod step_mode;

pub use planner::{RampPhase, RampPlanner};
pub use position::{MotionState, PositionError, HOME_OFFSET_STEPS};
pub use step_mode::StepMode;
