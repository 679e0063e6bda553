//! Force sensor implementations

pub mod fma;

pub use fma::{raw_from_bytes, FmaForceSensor, FmaTimings, DEFAULT_ADDRESS};
