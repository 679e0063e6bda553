//! Interlock input implementations

pub mod pulled_up;

pub use pulled_up::PulledUpInterlocks;
