//! Board-agnostic control logic for the ClampForce clamp controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (force bus, stepper, interlocks, clock)
//! - Force sensor conversion and bounded retry/reset plan
//! - Safety monitoring logic
//! - Run state machine and the control orchestrator
//! - Motion types (step modes, acceleration ramp)
//! - Configuration type definitions
//! - Telemetry output over any `embedded_io::Write`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod motion;
pub mod safety;
pub mod sensor;
pub mod state;
pub mod telemetry;
pub mod traits;
