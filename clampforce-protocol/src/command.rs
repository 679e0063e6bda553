//! Host command parsing.
//!
//! The only command the device understands is
//! `MOVETOFORCE <forceNewtons> <holdSeconds>`, tokens separated by exactly one
//! space. The verb is case-sensitive.

use crate::line::{LineBuffer, LineError};

/// Verb of the move-to-force command
pub const VERB_MOVE_TO_FORCE: &str = "MOVETOFORCE";

/// A parsed move-to-force request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlCommand {
    /// Force setpoint in newtons
    pub target_force_newtons: f32,
    /// Hold duration in seconds; zero or negative skips holding
    pub hold_seconds: i32,
}

impl ControlCommand {
    /// Hold duration in milliseconds, zero when holding is skipped
    pub fn hold_ms(&self) -> u64 {
        if self.hold_seconds > 0 {
            self.hold_seconds as u64 * 1000
        } else {
            0
        }
    }
}

/// Reasons a line is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// First token is not a known verb
    UnknownVerb,
    /// Wrong number of tokens for the verb
    WrongArity,
    /// Force token is not a finite decimal number
    InvalidForce,
    /// Hold token is not a decimal integer
    InvalidHold,
    /// Line exceeded the receive buffer
    LineTooLong,
}

impl From<LineError> for ParseError {
    fn from(err: LineError) -> Self {
        match err {
            LineError::Overflow => ParseError::LineTooLong,
        }
    }
}

/// Parse one complete line (terminator already stripped)
pub fn parse_line(line: &[u8]) -> Result<ControlCommand, ParseError> {
    let text = core::str::from_utf8(line).map_err(|_| ParseError::UnknownVerb)?;
    let mut tokens = text.split(' ');

    if tokens.next() != Some(VERB_MOVE_TO_FORCE) {
        return Err(ParseError::UnknownVerb);
    }

    let (Some(force), Some(hold), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(ParseError::WrongArity);
    };

    let target_force_newtons: f32 = force.parse().map_err(|_| ParseError::InvalidForce)?;
    if !target_force_newtons.is_finite() {
        return Err(ParseError::InvalidForce);
    }
    let hold_seconds: i32 = hold.parse().map_err(|_| ParseError::InvalidHold)?;

    Ok(ControlCommand {
        target_force_newtons,
        hold_seconds,
    })
}

/// Byte-fed command interpreter: line framing followed by parsing
#[derive(Debug, Clone, Default)]
pub struct CommandInterpreter {
    lines: LineBuffer,
}

impl CommandInterpreter {
    /// Create an interpreter with an empty line buffer
    pub const fn new() -> Self {
        Self {
            lines: LineBuffer::new(),
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Some` once per terminated non-empty line, `None` otherwise.
    pub fn feed_byte(&mut self, byte: u8) -> Option<Result<ControlCommand, ParseError>> {
        match self.lines.feed(byte) {
            Ok(Some(line)) => Some(parse_line(&line)),
            Ok(None) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid() {
        let cmd = parse_line(b"MOVETOFORCE 12 5").unwrap();
        assert_eq!(cmd.target_force_newtons, 12.0);
        assert_eq!(cmd.hold_seconds, 5);
        assert_eq!(cmd.hold_ms(), 5000);
    }

    #[test]
    fn test_parse_fractional_and_negative_hold() {
        let cmd = parse_line(b"MOVETOFORCE 2.75 -3").unwrap();
        assert_eq!(cmd.target_force_newtons, 2.75);
        assert_eq!(cmd.hold_seconds, -3);
        assert_eq!(cmd.hold_ms(), 0);
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(parse_line(b"movetoforce 1 2"), Err(ParseError::UnknownVerb));
        assert_eq!(parse_line(b"HOME"), Err(ParseError::UnknownVerb));
        assert_eq!(parse_line(b"MOVETOFORCE 1"), Err(ParseError::WrongArity));
        assert_eq!(parse_line(b"MOVETOFORCE 1 2 3"), Err(ParseError::WrongArity));
        assert_eq!(parse_line(b"MOVETOFORCE  1 2"), Err(ParseError::WrongArity));
        assert_eq!(parse_line(b"MOVETOFORCE 1 "), Err(ParseError::InvalidHold));
        assert_eq!(parse_line(b"MOVETOFORCE abc 2"), Err(ParseError::InvalidForce));
        assert_eq!(parse_line(b"MOVETOFORCE inf 2"), Err(ParseError::InvalidForce));
        assert_eq!(parse_line(b"MOVETOFORCE NaN 2"), Err(ParseError::InvalidForce));
        assert_eq!(parse_line(b"MOVETOFORCE 1 2.5"), Err(ParseError::InvalidHold));
        assert_eq!(parse_line(&[0xFF, 0xFE]), Err(ParseError::UnknownVerb));
    }

    fn feed_all(interp: &mut CommandInterpreter, bytes: &[u8]) -> Vec<Result<ControlCommand, ParseError>> {
        bytes.iter().filter_map(|&b| interp.feed_byte(b)).collect()
    }

    #[test]
    fn test_interpreter_chunked_input() {
        let mut interp = CommandInterpreter::new();
        assert!(feed_all(&mut interp, b"MOVETOF").is_empty());
        let results = feed_all(&mut interp, b"ORCE 3 0\r\nBAD\n");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].unwrap().target_force_newtons, 3.0);
        assert_eq!(results[1], Err(ParseError::UnknownVerb));
    }

    #[test]
    fn test_interpreter_overflow_reported() {
        let mut interp = CommandInterpreter::new();
        let long = [b'1'; 100];
        assert!(feed_all(&mut interp, &long).is_empty());
        assert_eq!(feed_all(&mut interp, b"\n"), [Err(ParseError::LineTooLong)]);

        // The next line parses normally
        let results = feed_all(&mut interp, b"MOVETOFORCE 2 2\n");
        assert_eq!(results[0].unwrap().target_force_newtons, 2.0);
    }

    proptest! {
        #[test]
        fn prop_well_formed_commands_parse(force in -100.0f32..100.0, hold in -1000i32..1000) {
            let line = format!("MOVETOFORCE {} {}", force, hold);
            let cmd = parse_line(line.as_bytes()).unwrap();
            prop_assert_eq!(cmd.target_force_newtons, force);
            prop_assert_eq!(cmd.hold_seconds, hold);
        }
    }
}
