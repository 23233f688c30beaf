//! Replay run configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default CAN bus bitrate in bit/s.
pub const DEFAULT_CAN_BITRATE: u32 = 250_000;

/// Default serial link baud rate.
pub const DEFAULT_SERIAL_BAUD: u32 = 4_800;

/// Default gap between replayed CAN frames.
pub const CAN_FRAME_GAP: Duration = Duration::from_millis(50);

/// Default gap between replayed serial lines.
pub const SERIAL_LINE_GAP: Duration = Duration::from_millis(250);

/// Options of one replay run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Input file of recorded lines.
    pub file: PathBuf,
    /// Device identifier of the output port.
    pub port: String,
    /// Bus bitrate (CAN) or link baud rate (serial), in bit/s.
    pub baud: u32,
    /// Pause inserted after every record.
    pub delay: Duration,
}

impl ReplayConfig {
    /// CAN replay configuration with the recorded defaults.
    pub fn can(file: impl Into<PathBuf>, port: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            port: port.into(),
            baud: DEFAULT_CAN_BITRATE,
            delay: CAN_FRAME_GAP,
        }
    }

    /// Raw serial replay configuration with the recorded defaults.
    pub fn serial(file: impl Into<PathBuf>, port: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            port: port.into(),
            baud: DEFAULT_SERIAL_BAUD,
            delay: SERIAL_LINE_GAP,
        }
    }

    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}
