//! Telemetry line formatting.
//!
//! Samples are sent as `F<newtons, 3 decimals> S<microsteps>`, for example
//! `F12.034 S-5120`. The boot interlock readout is
//! `ENDSTOP <0|1> KILLSTOP <0|1>`.

use core::fmt::Write;
use heapless::String;

/// Longest telemetry line the formatter produces
pub const MAX_TELEMETRY_LEN: usize = 48;

/// A formatted telemetry line without terminator
pub type TelemetryLine = String<MAX_TELEMETRY_LEN>;

/// One force/position sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Last known force in newtons
    pub force_newtons: f32,
    /// Absolute position in microsteps
    pub position: i32,
}

impl Sample {
    /// Format as a telemetry line
    ///
    /// Forces are rendered with three decimals; the buffer is sized for any
    /// reading the sensor can produce.
    pub fn format(&self) -> TelemetryLine {
        let mut line = TelemetryLine::new();
        // Cannot overflow for forces in the sensor range
        let _ = write!(line, "F{:.3} S{}", self.force_newtons, self.position);
        line
    }
}

/// Interlock states read once during boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterlockReadout {
    pub soft_endstop: bool,
    pub kill_stop: bool,
}

impl InterlockReadout {
    /// Format as `ENDSTOP x KILLSTOP y` with 1 meaning triggered
    pub fn format(&self) -> TelemetryLine {
        let mut line = TelemetryLine::new();
        let _ = write!(
            line,
            "ENDSTOP {} KILLSTOP {}",
            self.soft_endstop as u8, self.kill_stop as u8
        );
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_format() {
        let sample = Sample {
            force_newtons: 12.0341,
            position: -5120,
        };
        assert_eq!(sample.format().as_str(), "F12.034 S-5120");
    }

    #[test]
    fn test_negative_force() {
        let sample = Sample {
            force_newtons: -2.5,
            position: 0,
        };
        assert_eq!(sample.format().as_str(), "F-2.500 S0");
    }

    #[test]
    fn test_interlock_readout() {
        let readout = InterlockReadout {
            soft_endstop: true,
            kill_stop: false,
        };
        assert_eq!(readout.format().as_str(), "ENDSTOP 1 KILLSTOP 0");
    }

    proptest! {
        #[test]
        fn prop_sample_fits_and_parses_back(force in -3.0f32..50.0, position in i32::MIN..i32::MAX) {
            let line = Sample { force_newtons: force, position }.format();
            let (f, s) = line.as_str().split_once(' ').unwrap();
            let parsed: f32 = f.strip_prefix('F').unwrap().parse().unwrap();
            prop_assert!((parsed - force).abs() <= 0.0006);
            prop_assert_eq!(s.strip_prefix('S').unwrap().parse::<i32>().unwrap(), position);
        }
    }
}
