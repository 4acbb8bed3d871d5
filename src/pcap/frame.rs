use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::error::PcapError;
use nom::bytes::streaming::take;
use nom::{Err, IResult, Needed};

/// A record from a legacy pcap stream: a 16-byte header and the captured
/// packet bytes.
///
/// `ts_frac` is in microseconds or nanoseconds depending on the stream's
/// magic number (see `PcapHeader::ts_unit`). Packet data is owned by the
/// record and is exactly `caplen` bytes; legacy pcap has no per-record
/// padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPcapBlock {
    pub ts_sec: u32,
    pub ts_frac: u32,
    pub caplen: u32,
    pub origlen: u32,
    pub data: Vec<u8>,
}

impl LegacyPcapBlock {
    /// The record timestamp as a floating-point number of seconds.
    ///
    /// `ts_unit` is the number of fraction units per second (10^6 or 10^9).
    /// The integer pair (`ts_sec`, `ts_frac`) is the primary representation;
    /// an `f64` cannot represent every nanosecond timestamp exactly.
    pub fn ts_f64(&self, ts_unit: u32) -> f64 {
        self.ts_sec as f64 + (self.ts_frac as f64) / (ts_unit as f64)
    }
}

fn parse_pcap_frame_e<En: PcapEndianness>(i: &[u8]) -> IResult<&[u8], LegacyPcapBlock, PcapError> {
    if i.len() < 16 {
        return Err(Err::Incomplete(Needed::new(16 - i.len())));
    }
    let (i, ts_sec) = En::parse_u32(i)?;
    let (i, ts_frac) = En::parse_u32(i)?;
    let (i, caplen) = En::parse_u32(i)?;
    let (i, origlen) = En::parse_u32(i)?;
    if caplen > origlen {
        return Err(Err::Error(PcapError::InvariantViolation(
            "caplen exceeds origlen",
        )));
    }
    let (i, data) = take(caplen)(i)?;
    let block = LegacyPcapBlock {
        ts_sec,
        ts_frac,
        caplen,
        origlen,
        data: data.to_vec(),
    };
    Ok((i, block))
}

/// Read a PCAP record header and data (little-endian)
///
/// Each PCAP record starts with a small header, and is followed by packet
/// data. The packet data format depends on the LinkType.
pub fn parse_pcap_frame_le(i: &[u8]) -> IResult<&[u8], LegacyPcapBlock, PcapError> {
    parse_pcap_frame_e::<PcapLE>(i)
}

/// Read a PCAP record header and data (big-endian)
pub fn parse_pcap_frame_be(i: &[u8]) -> IResult<&[u8], LegacyPcapBlock, PcapError> {
    parse_pcap_frame_e::<PcapBE>(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::tests_support::FRAME_PCAP;
    use hex_literal::hex;

    #[test]
    fn test_parse_pcap_frame() {
        let (rem, pkt) = parse_pcap_frame_le(FRAME_PCAP).expect("packet parsing failed");
        assert!(rem.is_empty());
        assert_eq!(pkt.origlen, 74);
        assert_eq!(pkt.ts_frac, 562_913);
        assert_eq!(pkt.ts_sec, 1_515_933_236);
        assert_eq!(pkt.data.len(), 74);
    }

    #[test]
    fn test_parse_pcap_frame_invariant() {
        // caplen 8 > origlen 4
        let buf = hex!("00 00 00 00 00 00 00 00 08 00 00 00 04 00 00 00 01 02 03 04 05 06 07 08");
        match parse_pcap_frame_le(&buf) {
            Err(Err::Error(PcapError::InvariantViolation(_))) => (),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_parse_pcap_frame_truncated() {
        assert!(matches!(
            parse_pcap_frame_le(&FRAME_PCAP[..20]),
            Err(Err::Incomplete(_))
        ));
    }
}
