use nom::error::{ErrorKind, ParseError};
use std::error::Error;
use std::fmt;

/// The error type returned by readers, writers and parsing functions.
///
/// Every variant carries the name of the field or region being processed
/// when the error was detected. Readers additionally expose the stream
/// offset through their `consumed()` accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcapError {
    /// The underlying stream ended in the middle of a header, record or block
    ShortRead(&'static str),
    /// The underlying sink refused bytes mid-record
    ShortWrite(&'static str),
    /// The magic number of a pcap header or a section header block is not
    /// one of the recognized values
    BadMagic(u32),
    /// A block length is out of range, misaligned or inconsistent, or a
    /// declared length does not fit in its enclosing region
    MalformedFrame(&'static str),
    /// A value exceeds the 16-bit length field of its TLV encoding
    ValueTooLong(&'static str),
    /// Declared lengths contradict each other (for ex. `caplen > origlen`)
    InvariantViolation(&'static str),
    /// Internal parser error
    NomError(ErrorKind),
}

impl<I> ParseError<I> for PcapError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        PcapError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapError::NomError(kind)
    }
}

impl fmt::Display for PcapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcapError::ShortRead(ctx) => {
                write!(f, "unexpected end of stream while reading {}", ctx)
            }
            PcapError::ShortWrite(ctx) => write!(f, "could not write {}", ctx),
            PcapError::BadMagic(m) => write!(f, "bad magic number 0x{:08x}", m),
            PcapError::MalformedFrame(ctx) => write!(f, "malformed frame: {}", ctx),
            PcapError::ValueTooLong(ctx) => {
                write!(f, "value too long for 16-bit length field: {}", ctx)
            }
            PcapError::InvariantViolation(ctx) => write!(f, "invariant violation: {}", ctx),
            PcapError::NomError(e) => write!(f, "internal parser error {:?}", e),
        }
    }
}

impl Error for PcapError {}
