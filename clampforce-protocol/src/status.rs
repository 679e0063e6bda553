//! Device-to-host status tokens.
//!
//! Each status is sent on its own line. The host matches tokens by exact
//! string, so the spellings below are part of the wire contract.

/// Status codes sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// Initialization started
    Startup,
    /// Setup complete, homing follows
    Ready,
    /// Command accepted
    Accepted,
    /// Line could not be parsed
    ParseError,
    /// Valid command received while a cycle is running
    Busy,
    /// Sensor power-cycle reset initiated
    SensorReset,
    /// Sensor did not answer after a power cycle
    SensorBusAbsent,
    /// Sensor read failed after exhausting all retries
    SensorFault,
    /// Safety interlock stopped the move
    SafetyStop,
}

impl StatusCode {
    /// Wire token for this status
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusCode::Startup => "STARTUP",
            StatusCode::Ready => "READY",
            StatusCode::Accepted => "OK",
            StatusCode::ParseError => "ERROR",
            StatusCode::Busy => "BUSY",
            StatusCode::SensorReset => "SENSORRESET",
            StatusCode::SensorBusAbsent => "I2CTIMEOUT",
            StatusCode::SensorFault => "FORCEERROR",
            StatusCode::SafetyStop => "FAIL",
        }
    }
}
