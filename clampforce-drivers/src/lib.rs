//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in clampforce-core on top of `embedded-hal` 1.0:
//!
//! - Force sensor (Honeywell FMA-style I2C force sensor with switched supply)
//! - Stepper driver (software step/direction for A4988-class drivers)
//! - Interlocks (pulled-up switch inputs)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod interlock;
pub mod sensor;
pub mod stepper;
