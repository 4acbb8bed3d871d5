use crate::endianness::Endianness;
use crate::error::PcapError;
use crate::linktype::Linktype;
use nom::number::streaming::{be_i32, be_u16, be_u32, le_i32, le_u16, le_u32};
use nom::{Err, IResult, Needed};

/// Magic for a microsecond-resolution stream in the reader's byte order
pub const PCAP_MAGIC_USEC: u32 = 0xa1b2_c3d4;
/// Magic for a byte-swapped microsecond-resolution stream
pub const PCAP_MAGIC_USEC_SWAPPED: u32 = 0xd4c3_b2a1;
/// Magic for a nanosecond-resolution stream in the reader's byte order
pub const PCAP_MAGIC_NSEC: u32 = 0xa1b2_3c4d;
/// Magic for a byte-swapped nanosecond-resolution stream
pub const PCAP_MAGIC_NSEC_SWAPPED: u32 = 0x4d3c_b2a1;

/// PCAP global header
///
/// `magic_number` holds the value obtained by reading the first four bytes
/// little-endian, so a big-endian stream shows up as one of the swapped
/// magics. All other fields are stored in native order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcapHeader {
    /// File format and byte ordering (see the `PCAP_MAGIC_*` constants)
    pub magic_number: u32,
    /// Version major number (currently 2)
    pub version_major: u16,
    /// Version minor number (currently 4)
    pub version_minor: u16,
    /// The correction time in seconds between GMT (UTC) and the local timezone
    pub thiszone: i32,
    /// In theory, the accuracy of time stamps in the capture; in practice, all tools set it to 0
    pub sigfigs: u32,
    /// Max len of captured packets, in octets
    pub snaplen: u32,
    /// Data link type
    pub network: Linktype,
}

impl PcapHeader {
    /// Header for a little-endian, microsecond-resolution stream with the
    /// usual defaults (version 2.4, snaplen 65535, Ethernet)
    pub fn new() -> PcapHeader {
        PcapHeader {
            magic_number: PCAP_MAGIC_USEC,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: 65535,
            network: Linktype::ETHERNET,
        }
    }

    /// Header with the requested byte order and timestamp resolution
    pub fn with_endianness(endianness: Endianness, nanosecond: bool) -> PcapHeader {
        let magic_number = match (endianness, nanosecond) {
            (Endianness::Little, false) => PCAP_MAGIC_USEC,
            (Endianness::Little, true) => PCAP_MAGIC_NSEC,
            (Endianness::Big, false) => PCAP_MAGIC_USEC_SWAPPED,
            (Endianness::Big, true) => PCAP_MAGIC_NSEC_SWAPPED,
        };
        PcapHeader {
            magic_number,
            ..PcapHeader::new()
        }
    }

    pub const fn size(&self) -> usize {
        24
    }

    pub fn is_bigendian(&self) -> bool {
        // works for both nanosecond and microsecond resolution timestamps
        (self.magic_number & 0xFFFF) == 0xb2a1
    }

    pub fn is_nanosecond_precision(&self) -> bool {
        self.magic_number == PCAP_MAGIC_NSEC || self.magic_number == PCAP_MAGIC_NSEC_SWAPPED
    }

    pub fn endianness(&self) -> Endianness {
        if self.is_bigendian() {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    /// Timestamp fraction units per second (10^6 or 10^9)
    pub fn ts_unit(&self) -> u32 {
        if self.is_nanosecond_precision() {
            1_000_000_000
        } else {
            1_000_000
        }
    }
}

impl Default for PcapHeader {
    fn default() -> Self {
        PcapHeader::new()
    }
}

/// Read the PCAP global header
///
/// The magic number is probed little-endian first; a swapped magic causes
/// the remaining fields to be re-read big-endian. An unrecognized magic
/// fails with `BadMagic`.
pub fn parse_pcap_header(i: &[u8]) -> IResult<&[u8], PcapHeader, PcapError> {
    if i.len() < 24 {
        return Err(Err::Incomplete(Needed::new(24 - i.len())));
    }
    let (i, magic_number) = le_u32(i)?;
    match magic_number {
        PCAP_MAGIC_USEC | PCAP_MAGIC_NSEC => {
            let (i, version_major) = le_u16(i)?;
            let (i, version_minor) = le_u16(i)?;
            let (i, thiszone) = le_i32(i)?;
            let (i, sigfigs) = le_u32(i)?;
            let (i, snaplen) = le_u32(i)?;
            let (i, network) = le_i32(i)?;
            let header = PcapHeader {
                magic_number,
                version_major,
                version_minor,
                thiszone,
                sigfigs,
                snaplen,
                network: Linktype(network),
            };
            Ok((i, header))
        }
        PCAP_MAGIC_USEC_SWAPPED | PCAP_MAGIC_NSEC_SWAPPED => {
            let (i, version_major) = be_u16(i)?;
            let (i, version_minor) = be_u16(i)?;
            let (i, thiszone) = be_i32(i)?;
            let (i, sigfigs) = be_u32(i)?;
            let (i, snaplen) = be_u32(i)?;
            let (i, network) = be_i32(i)?;
            let header = PcapHeader {
                magic_number,
                version_major,
                version_minor,
                thiszone,
                sigfigs,
                snaplen,
                network: Linktype(network),
            };
            Ok((i, header))
        }
        _ => Err(Err::Error(PcapError::BadMagic(magic_number))),
    }
}
