//! Parsing of recorded frame lines.
//!
//! One record per line: a bracketed identifier, a metadata column the
//! replay has no use for, then zero or more hex data bytes.
//!
//! ```text
//! <0x7DF> R 02 01 0D
//! ```

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use nom::bytes::complete::take_till1;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::IResult;
use thiserror::Error;

/// One recorded frame: identifier plus data bytes, in file order.
///
/// The data length is whatever the line carried; conversion to a
/// [`crate::Frame`] is where CAN's eight-byte limit applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanRecord {
    pub id: u32,
    pub data: Vec<u8>,
}

impl CanRecord {
    /// Data length in bytes, derived from the payload itself.
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// A record line that does not follow the log format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The first column has no `<identifier>` field.
    #[error("no <identifier> field")]
    MissingId,
    /// The bracketed text is not a number in any recognized base.
    #[error("bad identifier {0:?}")]
    InvalidId(String),
    /// The identifier does not fit a 29-bit extended id.
    #[error("identifier 0x{0:X} does not fit an extended id")]
    IdRange(u32),
    /// A data column is not a hex byte.
    #[error("bad data byte {0:?}")]
    InvalidByte(String),
    /// More data bytes than a CAN frame can carry.
    #[error("{0} data bytes exceed the CAN frame limit")]
    PayloadTooLong(usize),
    /// Leftover text the grammar cannot place.
    #[error("unexpected trailing input {0:?}")]
    Trailing(String),
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == ' ')(input)
}

/// Columns of one line: the identifier column, an optional discarded
/// metadata column, and the remaining data columns. Single spaces only.
fn line_tokens(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, id) = token(input)?;
    let (input, _meta) = opt(preceded(char(' '), token))(input)?;
    let (input, data) = many0(preceded(char(' '), token))(input)?;
    Ok((input, (id, data)))
}

/// Integer with automatic base detection, as `strtol` with base 0 reads
/// it: `0x` is hex, `0o` octal, `0b` binary, anything else decimal.
fn parse_auto_base(text: &str) -> Result<u32, ParseIntError> {
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(digits, 16)
    } else if let Some(digits) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        u32::from_str_radix(digits, 8)
    } else if let Some(digits) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        u32::from_str_radix(digits, 2)
    } else {
        text.parse()
    }
}

impl FromStr for CanRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (rest, (first, tokens)) = line_tokens(line).map_err(|_| RecordError::MissingId)?;
        if !rest.is_empty() {
            return Err(RecordError::Trailing(rest.to_string()));
        }

        let open = first.find('<').ok_or(RecordError::MissingId)?;
        let close = first
            .rfind('>')
            .filter(|close| open < *close)
            .ok_or(RecordError::MissingId)?;
        let id_text = &first[open + 1..close];
        let id = parse_auto_base(id_text).map_err(|_| RecordError::InvalidId(id_text.to_string()))?;

        let mut data = Vec::with_capacity(tokens.len());
        for tok in tokens {
            let byte =
                u8::from_str_radix(tok, 16).map_err(|_| RecordError::InvalidByte(tok.to_string()))?;
            data.push(byte);
        }

        Ok(Self { id, data })
    }
}

impl fmt::Display for CanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<0x{:X}> R", self.id)?;
        for byte in &self.data {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}
