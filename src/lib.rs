//! Replay recorded line-oriented data onto hardware ports.
//!
//! Two replay paths share one pipeline shape (read a file, transform each
//! line, write to a device, pause):
//!
//! - CAN: lines of the form `<0x7DF> R 02 01 0D` become CAN frames sent
//!   through an slcan USB adapter.
//! - Serial: lines are sent verbatim, CRLF-terminated, over a serial port.

pub mod config;
pub mod frame;
pub mod reader;
pub mod record;
pub mod replay;
pub mod sink;
pub mod slcan;

pub use config::ReplayConfig;
pub use frame::Frame;
pub use reader::RecordReader;
pub use record::{CanRecord, RecordError};
pub use replay::{replay_frames, replay_lines, Pacer, ReplayError, WallClock};
pub use sink::{DeviceError, FrameSink, LineSink, SlcanAdapter, TextPort};
pub use slcan::{Bitrate, Close, Open, Setup, Transmit};
