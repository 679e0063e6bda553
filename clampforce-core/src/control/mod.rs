//! Control orchestrator
//!
//! Owns the run state and drives the sensor, stepper, interlocks and
//! telemetry once per loop pass.

pub mod controller;
pub mod policy;

#[cfg(test)]
mod sim;

pub use controller::{Controller, Events, MAX_EVENTS_PER_POLL};
pub use policy::{
    evaluate_force, MoveOutcome, SpeedTier, CONVERGE_BAND_N, CONVERGE_FLOOR_N,
    SAMPLE_INTERVAL_MS, SPEED_TIER_N,
};
