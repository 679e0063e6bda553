//! Host Serial Line Protocol
//!
//! This crate defines the text protocol between the measurement host and the
//! clamp controller. Both directions use short ASCII lines terminated by
//! carriage return or newline.
//!
//! # Protocol Overview
//!
//! ```text
//! host -> device    MOVETOFORCE <forceNewtons> <holdSeconds>
//! device -> host    STARTUP | READY | OK | ERROR | BUSY | SENSORRESET
//!                   I2CTIMEOUT | FORCEERROR | FAIL
//!                   ENDSTOP <0|1> KILLSTOP <0|1>
//!                   F<force, 3 decimals> S<position in microsteps>
//! ```
//!
//! The host is a plain line reader: anything it cannot match as a sample or
//! a known status token is ignored, so new tokens are backwards compatible.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod status;
pub mod telemetry;

pub use command::{parse_line, CommandInterpreter, ControlCommand, ParseError, VERB_MOVE_TO_FORCE};
pub use line::{Line, LineBuffer, LineError, MAX_LINE_LEN};
pub use status::StatusCode;
pub use telemetry::{InterlockReadout, Sample, TelemetryLine, MAX_TELEMETRY_LEN};
