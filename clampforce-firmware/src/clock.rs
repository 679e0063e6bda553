//! Monotonic clock backed by the embassy time driver

use clampforce_core::traits::Clock;
use embassy_time::Instant;

/// Zero-sized handle to the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
