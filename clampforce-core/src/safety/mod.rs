//! Safety monitoring
//!
//! Detects abort conditions for an in-progress move.

pub mod monitor;

pub use monitor::{AbortReason, SafetyFlags, SafetyInputs, SafetyMonitor, FORCE_CEILING_N};
