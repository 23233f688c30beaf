//! Output devices a replay writes to.
//!
//! Both sinks are synchronous and non-retrying: a failed write surfaces
//! immediately and ends the run.

use std::fmt::Display;
use std::io::{self, Write};

use serialport::SerialPort;
use thiserror::Error;
use tracing::debug;

use crate::frame::Frame;
use crate::slcan::{Bitrate, Close, Open, Setup, Transmit};

/// Serial link rate of the slcan USB bridge itself. The bus bitrate is a
/// separate thing, programmed with [`Setup`].
const SLCAN_LINK_BAUD: u32 = 115_200;

/// A device failure.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("unsupported bitrate {0} bit/s")]
    Bitrate(u32),
    #[error("device write failed: {0}")]
    Write(#[from] io::Error),
}

/// A device that accepts CAN frames.
pub trait FrameSink {
    fn configure(&mut self, bitrate: Bitrate) -> Result<(), DeviceError>;
    fn start(&mut self) -> Result<(), DeviceError>;
    fn send(&mut self, frame: &Frame) -> Result<(), DeviceError>;
    fn stop(&mut self) -> Result<(), DeviceError>;
}

/// A device that accepts raw text lines.
pub trait LineSink {
    fn send_line(&mut self, line: &str) -> Result<(), DeviceError>;
}

/// An slcan adapter behind any writable port.
///
/// Generic over the port so tests can swap the serial handle for a plain
/// byte buffer.
pub struct SlcanAdapter<P> {
    port: P,
}

impl SlcanAdapter<Box<dyn SerialPort>> {
    pub fn open(port: &str) -> Result<Self, DeviceError> {
        let handle = serialport::new(port, SLCAN_LINK_BAUD)
            .open()
            .map_err(|source| DeviceError::Open {
                port: port.to_string(),
                source,
            })?;

        Ok(Self::new(handle))
    }
}

impl<P: Write> SlcanAdapter<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn get_ref(&self) -> &P {
        &self.port
    }

    fn command(&mut self, command: impl Display) -> Result<(), DeviceError> {
        self.port.write_all(command.to_string().as_bytes())?;
        Ok(())
    }
}

impl<P: Write> FrameSink for SlcanAdapter<P> {
    fn configure(&mut self, bitrate: Bitrate) -> Result<(), DeviceError> {
        debug!(?bitrate, "configuring adapter");
        self.command(Setup::new(bitrate))
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        self.command(Open)
    }

    fn send(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        self.command(Transmit::new(frame))
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.command(Close)
    }
}

/// A plain serial port taking CRLF-terminated text lines.
pub struct TextPort<P> {
    port: P,
}

impl TextPort<Box<dyn SerialPort>> {
    pub fn open(port: &str, baud: u32) -> Result<Self, DeviceError> {
        let handle = serialport::new(port, baud)
            .open()
            .map_err(|source| DeviceError::Open {
                port: port.to_string(),
                source,
            })?;

        Ok(Self::new(handle))
    }
}

impl<P: Write> TextPort<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn get_ref(&self) -> &P {
        &self.port
    }
}

impl<P: Write> LineSink for TextPort<P> {
    fn send_line(&mut self, line: &str) -> Result<(), DeviceError> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\r\n")?;
        Ok(())
    }
}
