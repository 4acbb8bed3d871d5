use crate::PcapError;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use nom::number::streaming::{be_i64, be_u16, be_u32, le_i64, le_u16, le_u32};
use nom::IResult;

/// Byte order of a pcap file or of a pcap-ng section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub(crate) fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endianness::Little => LittleEndian::read_u16(buf),
            Endianness::Big => BigEndian::read_u16(buf),
        }
    }

    pub(crate) fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endianness::Little => LittleEndian::read_u32(buf),
            Endianness::Big => BigEndian::read_u32(buf),
        }
    }

    pub(crate) fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Endianness::Little => LittleEndian::read_u64(buf),
            Endianness::Big => BigEndian::read_u64(buf),
        }
    }

    pub(crate) fn put_u16(self, out: &mut Vec<u8>, v: u16) {
        let mut b = [0u8; 2];
        match self {
            Endianness::Little => LittleEndian::write_u16(&mut b, v),
            Endianness::Big => BigEndian::write_u16(&mut b, v),
        }
        out.extend_from_slice(&b);
    }

    pub(crate) fn put_u32(self, out: &mut Vec<u8>, v: u32) {
        let mut b = [0u8; 4];
        match self {
            Endianness::Little => LittleEndian::write_u32(&mut b, v),
            Endianness::Big => BigEndian::write_u32(&mut b, v),
        }
        out.extend_from_slice(&b);
    }

    pub(crate) fn put_u64(self, out: &mut Vec<u8>, v: u64) {
        let mut b = [0u8; 8];
        match self {
            Endianness::Little => LittleEndian::write_u64(&mut b, v),
            Endianness::Big => BigEndian::write_u64(&mut b, v),
        }
        out.extend_from_slice(&b);
    }
}

pub(crate) struct PcapBE;
pub(crate) struct PcapLE;

/// Compile-time endianness selector for the nom parsers.
pub(crate) trait PcapEndianness {
    const ENDIANNESS: Endianness;

    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError>;
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError>;
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError>;

    fn u32_from_bytes(i: [u8; 4]) -> u32;
}

impl PcapEndianness for PcapBE {
    const ENDIANNESS: Endianness = Endianness::Big;

    #[inline]
    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError> {
        be_u16(i)
    }

    #[inline]
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError> {
        be_u32(i)
    }

    #[inline]
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError> {
        be_i64(i)
    }

    #[inline]
    fn u32_from_bytes(i: [u8; 4]) -> u32 {
        u32::from_be_bytes(i)
    }
}

impl PcapEndianness for PcapLE {
    const ENDIANNESS: Endianness = Endianness::Little;

    #[inline]
    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError> {
        le_u16(i)
    }

    #[inline]
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError> {
        le_u32(i)
    }

    #[inline]
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError> {
        le_i64(i)
    }

    #[inline]
    fn u32_from_bytes(i: [u8; 4]) -> u32 {
        u32::from_le_bytes(i)
    }
}
