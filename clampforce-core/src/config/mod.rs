//! Configuration types
//!
//! Board-agnostic machine configuration. The firmware build script reads
//! `clamp.toml` into these types, validates them, and bakes the result into
//! the binary as a constant.

pub mod clamp;

pub use clamp::*;
