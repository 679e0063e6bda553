//! Normally-open switches to ground with pull-ups
//!
//! A closed switch reads low. An input that cannot be read counts as
//! triggered.

use clampforce_core::traits::Interlocks;
use embedded_hal::digital::InputPin;

/// Soft endstop and kill-stop on pulled-up inputs
pub struct PulledUpInterlocks<E, K> {
    soft_endstop: E,
    kill_stop: K,
}

impl<E: InputPin, K: InputPin> PulledUpInterlocks<E, K> {
    pub fn new(soft_endstop: E, kill_stop: K) -> Self {
        Self {
            soft_endstop,
            kill_stop,
        }
    }
}

impl<E: InputPin, K: InputPin> Interlocks for PulledUpInterlocks<E, K> {
    fn soft_endstop(&mut self) -> bool {
        self.soft_endstop.is_low().unwrap_or(true)
    }

    fn kill_stop(&mut self) -> bool {
        self.kill_stop.is_low().unwrap_or(true)
    }
}
