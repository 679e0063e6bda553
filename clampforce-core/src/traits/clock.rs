//! Monotonic time source

/// Monotonic clock used for cadence gates and time boxes
///
/// Must never go backwards. Wrap-around is not handled; a `u64` microsecond
/// counter lasts far longer than any run.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;

    /// Milliseconds since the same origin
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
