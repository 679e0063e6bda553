//! Compiled-in machine configuration
//!
//! Generated by build.rs from clamp.toml, which has already been validated.

use clampforce_core::config::{ClampConfig, MotionConfig, SensorConfig, SerialConfig, StepperConfig};

include!(concat!(env!("OUT_DIR"), "/clamp_config.rs"));
