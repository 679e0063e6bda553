//! Force sensor bus trait

/// Errors that can occur talking to the force sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// No complete reply within the bus timeout
    Timeout,
    /// Device did not acknowledge its address
    NoAcknowledge,
    /// Any other bus-level failure (arbitration, overrun)
    Bus,
    /// Power control line could not be driven
    Power,
}

/// Trait for a two-wire force sensor with switchable supply
///
/// Implementations perform exactly one bus transaction per call; retries
/// are the caller's responsibility.
pub trait ForceBus {
    /// Read one raw 14-bit count
    ///
    /// The status bits in the top of the first byte are already masked off.
    /// Range validation is left to the caller.
    fn read_raw(&mut self) -> Result<u16, BusError>;

    /// Power-cycle the sensor and confirm it answers on the bus
    ///
    /// Sequence: supply off, settle, supply on, settle, presence check,
    /// conversion settle. Blocks for the whole sequence.
    fn power_cycle(&mut self) -> Result<(), BusError>;
}
