//! Telemetry emitter
//!
//! Writes status codes and samples to the host link, one CRLF-terminated
//! line each. Writes are blocking; the caller decides what to do with a link
//! error.

use clampforce_protocol::{InterlockReadout, Sample, StatusCode};
use embedded_io::Write;

const LINE_END: &[u8] = b"\r\n";

/// Line writer for the host serial link
#[derive(Debug)]
pub struct Telemetry<W> {
    writer: W,
}

impl<W: Write> Telemetry<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Access the underlying writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Send one status token
    pub fn status(&mut self, code: StatusCode) -> Result<(), W::Error> {
        self.line(code.as_str())
    }

    /// Send one force/position sample
    pub fn sample(&mut self, force_newtons: f32, position: i32) -> Result<(), W::Error> {
        let line = Sample {
            force_newtons,
            position,
        }
        .format();
        self.line(&line)
    }

    /// Send the boot interlock readout
    pub fn interlocks(&mut self, readout: InterlockReadout) -> Result<(), W::Error> {
        self.line(&readout.format())
    }

    fn line(&mut self, text: &str) -> Result<(), W::Error> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(LINE_END)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::vec::Vec;

    struct Buffer(Vec<u8>);

    impl embedded_io::ErrorType for Buffer {
        type Error = Infallible;
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_are_crlf_terminated() {
        let mut telemetry = Telemetry::new(Buffer(Vec::new()));
        telemetry.status(StatusCode::Startup).unwrap();
        telemetry
            .interlocks(InterlockReadout {
                soft_endstop: false,
                kill_stop: true,
            })
            .unwrap();
        telemetry.sample(1.5, -200).unwrap();
        telemetry.status(StatusCode::Accepted).unwrap();

        let text = core::str::from_utf8(&telemetry.writer().0).unwrap();
        assert_eq!(
            text,
            "STARTUP\r\nENDSTOP 0 KILLSTOP 1\r\nF1.500 S-200\r\nOK\r\n"
        );
    }
}
