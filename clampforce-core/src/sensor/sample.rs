//! Raw count to newton conversion

/// Smallest raw count accepted as a valid reading
pub const RAW_MIN: u16 = 1;

/// Largest raw count accepted as a valid reading
pub const RAW_MAX: u16 = 16382;

/// Raw count at zero load
pub const RAW_ZERO_OFFSET: u16 = 850;

/// Scale factor from counts to newtons
pub const NEWTONS_PER_COUNT: f32 = 0.00308;

/// One validated force reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ForceSample {
    /// Raw 14-bit count as read from the bus
    pub raw: u16,
    /// Force in newtons
    pub newtons: f32,
}

impl ForceSample {
    /// Convert a raw count, rejecting values outside `RAW_MIN..=RAW_MAX`
    ///
    /// The rails (0 and 16383) are what the sensor reports when saturated or
    /// in a diagnostic state, so they are never converted.
    pub fn from_raw(raw: u16) -> Option<Self> {
        if !(RAW_MIN..=RAW_MAX).contains(&raw) {
            return None;
        }
        let counts = raw as i32 - RAW_ZERO_OFFSET as i32;
        Some(Self {
            raw,
            newtons: NEWTONS_PER_COUNT * counts as f32,
        })
    }
}
