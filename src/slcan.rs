//! Wire commands for slcan (Serial Line CAN) USB adapters.
//!
//! Each command is a small type whose `Display` output is the exact byte
//! sequence the adapter consumes, CR-terminated.

use core::fmt::{self, Display};

use embedded_can::{Frame as _, Id};

use crate::frame::Frame;
use crate::sink::DeviceError;

/// CAN bus bitrates an slcan adapter can be programmed to.
///
/// The discriminant is the speed code of the `S` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bitrate {
    Rate10kbit = 0,
    Rate20kbit = 1,
    Rate50kbit = 2,
    Rate100kbit = 3,
    Rate125kbit = 4,
    Rate250kbit = 5,
    Rate500kbit = 6,
    Rate800kbit = 7,
    Rate1000kbit = 8,
}

impl TryFrom<u32> for Bitrate {
    type Error = DeviceError;

    /// Maps a rate in bit/s onto the adapter's speed table.
    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        match bps {
            10_000 => Ok(Bitrate::Rate10kbit),
            20_000 => Ok(Bitrate::Rate20kbit),
            50_000 => Ok(Bitrate::Rate50kbit),
            100_000 => Ok(Bitrate::Rate100kbit),
            125_000 => Ok(Bitrate::Rate125kbit),
            250_000 => Ok(Bitrate::Rate250kbit),
            500_000 => Ok(Bitrate::Rate500kbit),
            800_000 => Ok(Bitrate::Rate800kbit),
            1_000_000 => Ok(Bitrate::Rate1000kbit),
            other => Err(DeviceError::Bitrate(other)),
        }
    }
}

/// Program the bus bitrate. Must precede [`Open`].
#[derive(Debug)]
pub struct Setup {
    pub bitrate: Bitrate,
}

impl Setup {
    pub fn new(bitrate: Bitrate) -> Self {
        Self { bitrate }
    }
}

impl Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}\r", self.bitrate as u8)
    }
}

/// Open the CAN channel.
#[derive(Debug)]
pub struct Open;

impl Display for Open {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O\r")
    }
}

/// Close the CAN channel.
#[derive(Debug)]
pub struct Close;

impl Display for Close {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C\r")
    }
}

/// Transmit one frame.
#[derive(Debug)]
pub struct Transmit {
    frame: Frame,
}

impl Transmit {
    pub fn new(frame: &impl embedded_can::Frame) -> Self {
        // Rebuild a foreign frame as ours. A well-formed source frame
        // cannot exceed the dlc bounds, so construction cannot fail.
        let frame = if frame.is_remote_frame() {
            Frame::new_remote(frame.id(), frame.dlc())
        } else {
            Frame::new(frame.id(), frame.data())
        }
        .unwrap();

        Self { frame }
    }
}

impl Display for Transmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match (self.frame.is_extended(), self.frame.is_remote_frame()) {
            (false, false) => 't',
            (true, false) => 'T',
            (false, true) => 'r',
            (true, true) => 'R',
        };

        match self.frame.id() {
            Id::Standard(id) => write!(f, "{}{:03X}", cmd, id.as_raw())?,
            Id::Extended(id) => write!(f, "{}{:08X}", cmd, id.as_raw())?,
        }

        write!(f, "{}", self.frame.dlc())?;

        if self.frame.is_data_frame() {
            for byte in self.frame.data() {
                write!(f, "{:02X}", byte)?;
            }
        }

        write!(f, "\r")
    }
}
