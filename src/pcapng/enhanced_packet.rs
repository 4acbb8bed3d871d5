use nom::bytes::streaming::take;
use nom::{Err, IResult};
use rusticata_macros::align32;

use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::pcapng::option::*;
use crate::pcapng::{build_ts, build_ts_f64};
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser, EPB_MAGIC};

/// An option carried by an [`EnhancedPacketBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketOption {
    /// `opt_comment`
    Comment(String),
    /// `epb_flags`: link-layer information about the packet
    Flags(u32),
    /// `epb_hash`: packet digest, first byte identifying the algorithm
    Hash(Vec<u8>),
    /// `epb_dropcount`: packets lost between this one and the previous one
    DropCount(u64),
    /// `epb_packetid`: unique packet identifier
    PacketId(u64),
    /// `epb_queue`: queue the packet was received on
    Queue(u32),
    /// `epb_verdict`: verdict of a packet filter, kept opaque
    Verdict(Vec<u8>),
    /// Any other code, preserved as raw bytes
    Raw(RawOption),
}

impl PacketOption {
    pub(crate) fn from_raw(raw: RawOption, en: Endianness) -> Self {
        match raw.code {
            OptionCode::Comment => string_option(raw, Self::Comment, Self::Raw),
            OptionCode::EpbFlags => u32_option(raw, en, Self::Flags, Self::Raw),
            OptionCode::EpbHash => Self::Hash(raw.value),
            OptionCode::EpbDropcount => u64_option(raw, en, Self::DropCount, Self::Raw),
            OptionCode::EpbPacketid => u64_option(raw, en, Self::PacketId, Self::Raw),
            OptionCode::EpbQueue => u32_option(raw, en, Self::Queue, Self::Raw),
            OptionCode::EpbVerdict => Self::Verdict(raw.value),
            _ => Self::Raw(raw),
        }
    }
}

impl PackOption for PacketOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            Self::Comment(s) => pack_option(OptionCode::Comment.0, s.as_bytes(), en, "opt_comment"),
            Self::Flags(v) => {
                let mut value = Vec::with_capacity(4);
                en.put_u32(&mut value, *v);
                pack_option(OptionCode::EpbFlags.0, &value, en, "epb_flags")
            }
            Self::Hash(bytes) => pack_option(OptionCode::EpbHash.0, bytes, en, "epb_hash"),
            Self::DropCount(v) => {
                let mut value = Vec::with_capacity(8);
                en.put_u64(&mut value, *v);
                pack_option(OptionCode::EpbDropcount.0, &value, en, "epb_dropcount")
            }
            Self::PacketId(v) => {
                let mut value = Vec::with_capacity(8);
                en.put_u64(&mut value, *v);
                pack_option(OptionCode::EpbPacketid.0, &value, en, "epb_packetid")
            }
            Self::Queue(v) => {
                let mut value = Vec::with_capacity(4);
                en.put_u32(&mut value, *v);
                pack_option(OptionCode::EpbQueue.0, &value, en, "epb_queue")
            }
            Self::Verdict(bytes) => pack_option(OptionCode::EpbVerdict.0, bytes, en, "epb_verdict"),
            Self::Raw(raw) => pack_option(raw.code.0, &raw.value, en, "raw option"),
        }
    }
}

/// An Enhanced Packet Block (EPB) is the standard container for storing
/// the packets coming from the network.
///
/// `data` holds exactly the captured bytes; the padding to the next 32-bit
/// boundary is stripped on read and recreated on write, and the captured
/// length on the wire is always `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedPacketBlock {
    /// Interface this packet was captured on, an index into the section's
    /// interface description blocks
    pub if_id: u32,
    pub ts_high: u32,
    pub ts_low: u32,
    /// Original packet length
    pub origlen: u32,
    /// Captured packet bytes, without padding
    pub data: Vec<u8>,
    pub options: Vec<PacketOption>,
}

impl EnhancedPacketBlock {
    /// Captured packet length
    #[inline]
    pub fn caplen(&self) -> u32 {
        self.data.len() as u32
    }

    /// Return true if the packet was truncated at capture time
    #[inline]
    pub fn truncated(&self) -> bool {
        self.origlen as usize != self.data.len()
    }

    /// Decode the packet timestamp
    ///
    /// To decode the timestamp, the raw values if_tsresol and if_tsoffset
    /// are required. These values are stored as options in the
    /// [`InterfaceDescriptionBlock`](crate::InterfaceDescriptionBlock)
    /// matching the interface ID.
    ///
    /// Return the timestamp seconds and fractional part (in resolution units)
    #[inline]
    pub fn decode_ts(&self, ts_offset: u64, resolution: u64) -> (u32, u32) {
        build_ts(self.ts_high, self.ts_low, ts_offset, resolution)
    }

    /// Decode the packet timestamp as `f64`
    #[inline]
    pub fn decode_ts_f64(&self, ts_offset: u64, resolution: u64) -> f64 {
        build_ts_f64(self.ts_high, self.ts_low, ts_offset, resolution)
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for EnhancedPacketBlock {
    const HDR_SZ: usize = 32;
    const MAGIC: u32 = EPB_MAGIC;

    type Output = EnhancedPacketBlock;

    fn inner_parse(
        _block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], EnhancedPacketBlock, PcapError> {
        let (i, if_id) = En::parse_u32(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        // align32 can overflow
        if caplen >= u32::MAX - 4 {
            return Err(Err::Error(PcapError::MalformedFrame("captured length")));
        }
        let padded_length = align32!(caplen);
        if 32 + padded_length as usize > block_len as usize {
            return Err(Err::Error(PcapError::MalformedFrame("captured length")));
        }
        let (i, data) = take(padded_length)(i)?;
        let current_offset = (32 + padded_length) as usize;
        let (i, options) = opt_parse_options::<En>(i, block_len as usize, current_offset)?;
        let block = EnhancedPacketBlock {
            if_id,
            ts_high,
            ts_low,
            origlen,
            data: data[..caplen as usize].to_vec(),
            options: options
                .into_iter()
                .map(|o| PacketOption::from_raw(o, En::ENDIANNESS))
                .collect(),
        };
        Ok((i, block))
    }
}

/// Parse an Enhanced Packet Block (little-endian)
pub fn parse_enhancedpacketblock_le(i: &[u8]) -> IResult<&[u8], EnhancedPacketBlock, PcapError> {
    ng_block_parser::<EnhancedPacketBlock, PcapLE>()(i)
}

/// Parse an Enhanced Packet Block (big-endian)
pub fn parse_enhancedpacketblock_be(i: &[u8]) -> IResult<&[u8], EnhancedPacketBlock, PcapError> {
    ng_block_parser::<EnhancedPacketBlock, PcapBE>()(i)
}
