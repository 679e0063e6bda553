//! Force sensor interface
//!
//! Converts raw bus counts to newtons and wraps a [`ForceBus`] with the
//! bounded retry and power-cycle reset policy.
//!
//! [`ForceBus`]: crate::traits::ForceBus

pub mod reader;
pub mod retry;
pub mod sample;

pub use reader::{ForceSensor, SensorEvent, SensorFault};
pub use retry::{Attempt, AttemptPlan, ATTEMPTS_PER_BLOCK, ATTEMPT_BLOCKS};
pub use sample::{ForceSample, NEWTONS_PER_COUNT, RAW_MAX, RAW_MIN, RAW_ZERO_OFFSET};
