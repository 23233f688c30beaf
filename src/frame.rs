use core::fmt;

use embedded_can::Frame as _;
use embedded_can::{ExtendedId, Id};

use crate::record::{CanRecord, RecordError};

/// A CAN 2.0 frame in the fixed eight-byte layout the bus allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    id: Id,
    remote: bool,
    dlc: u8,
    data: [u8; 8],
}

impl embedded_can::Frame for Frame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }

        let mut padded = [0u8; 8];
        padded[..data.len()].copy_from_slice(data);

        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data: padded,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        (dlc <= 8).then(|| Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: [0; 8],
        })
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        usize::from(self.dlc)
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.dlc()]
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }
}

/// Recorded frames always go out with an extended id, whatever their
/// numeric value, matching the capture tooling that produced them.
impl TryFrom<&CanRecord> for Frame {
    type Error = RecordError;

    fn try_from(record: &CanRecord) -> Result<Self, Self::Error> {
        let id = ExtendedId::new(record.id).ok_or(RecordError::IdRange(record.id))?;
        Self::new(Id::Extended(id), &record.data)
            .ok_or(RecordError::PayloadTooLong(record.data.len()))
    }
}

impl fmt::Display for Frame {
    /// candump-style rendering: `ID#DATA`, or `ID#R<dlc>` for remote frames.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Id::Standard(id) => write!(f, "{:03X}#", id.as_raw())?,
            Id::Extended(id) => write!(f, "{:08X}#", id.as_raw())?,
        }

        if self.remote {
            write!(f, "R{}", self.dlc)
        } else {
            for byte in self.data() {
                write!(f, "{:02X}", byte)?;
            }
            Ok(())
        }
    }
}
