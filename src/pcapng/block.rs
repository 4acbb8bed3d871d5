use nom::bytes::streaming::take;
use nom::combinator::map;
use nom::number::streaming::{be_u32, le_u32};
use nom::{Err, IResult, Needed};

use crate::endianness::PcapEndianness;
use crate::PcapError;

use super::*;

/// A typed block from a pcap-ng stream.
///
/// Unrecognized block types are carried as [`UnknownBlock`] with their body
/// bytes verbatim, so that rewriting a stream is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    EnhancedPacket(EnhancedPacketBlock),
    NameResolution(NameResolutionBlock),
    InterfaceStatistics(InterfaceStatisticsBlock),
    Unknown(UnknownBlock),
}

impl Block {
    /// Returns true if the block contains a network packet
    pub fn is_data_block(&self) -> bool {
        matches!(self, &Block::EnhancedPacket(_))
    }

    /// Return the type of the block
    pub fn block_type(&self) -> u32 {
        match self {
            Block::SectionHeader(_) => SHB_MAGIC,
            Block::InterfaceDescription(_) => IDB_MAGIC,
            Block::EnhancedPacket(_) => EPB_MAGIC,
            Block::NameResolution(_) => NRB_MAGIC,
            Block::InterfaceStatistics(_) => ISB_MAGIC,
            Block::Unknown(ub) => ub.block_type,
        }
    }
}

/// Parse any block, as little-endian
///
/// To find which endianness to use, read the section header
/// using `parse_sectionheaderblock`
pub fn parse_block_le(i: &[u8]) -> IResult<&[u8], Block, PcapError> {
    match le_u32(i) {
        Ok((_, id)) => match id {
            SHB_MAGIC => map(parse_sectionheaderblock, Block::SectionHeader)(i),
            IDB_MAGIC => map(
                parse_interfacedescriptionblock_le,
                Block::InterfaceDescription,
            )(i),
            EPB_MAGIC => map(parse_enhancedpacketblock_le, Block::EnhancedPacket)(i),
            NRB_MAGIC => map(parse_nameresolutionblock_le, Block::NameResolution)(i),
            ISB_MAGIC => map(
                parse_interfacestatisticsblock_le,
                Block::InterfaceStatistics,
            )(i),
            _ => map(parse_unknownblock_le, Block::Unknown)(i),
        },
        Err(e) => Err(e),
    }
}

/// Parse any block, as big-endian
///
/// To find which endianness to use, read the section header
/// using `parse_sectionheaderblock`
pub fn parse_block_be(i: &[u8]) -> IResult<&[u8], Block, PcapError> {
    match be_u32(i) {
        Ok((_, id)) => match id {
            SHB_MAGIC => map(parse_sectionheaderblock, Block::SectionHeader)(i),
            IDB_MAGIC => map(
                parse_interfacedescriptionblock_be,
                Block::InterfaceDescription,
            )(i),
            EPB_MAGIC => map(parse_enhancedpacketblock_be, Block::EnhancedPacket)(i),
            NRB_MAGIC => map(parse_nameresolutionblock_be, Block::NameResolution)(i),
            ISB_MAGIC => map(
                parse_interfacestatisticsblock_be,
                Block::InterfaceStatistics,
            )(i),
            _ => map(parse_unknownblock_be, Block::Unknown)(i),
        },
        Err(e) => Err(e),
    }
}

pub(crate) trait PcapNGBlockParser<'a, En: PcapEndianness> {
    /// Minimum block size, in bytes
    const HDR_SZ: usize;
    /// Native magic number for this block type, or 0 for any
    const MAGIC: u32;

    type Output: 'a;

    // caller function has tested the framing: type, lengths, alignment
    fn inner_parse(
        block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], Self::Output, PcapError>;
}

/// Create a block parser function, given the parameters (block object and
/// endianness).
///
/// The returned parser checks the generic framing shared by every block:
/// the leading total length must be at least the block's minimum size and a
/// multiple of 4, and the trailing copy of the total length must match the
/// leading one.
pub(crate) fn ng_block_parser<'a, P, En>(
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], P::Output, PcapError>
where
    P: PcapNGBlockParser<'a, En>,
    En: PcapEndianness,
{
    move |i: &[u8]| {
        // read generic block layout
        if i.len() < 12 {
            return Err(Err::Incomplete(Needed::new(12 - i.len())));
        }
        let (i, block_type) = En::parse_u32(i)?;
        let (i, block_len1) = En::parse_u32(i)?;
        if P::MAGIC != 0 && block_type != P::MAGIC {
            return Err(Err::Error(PcapError::MalformedFrame("block type")));
        }
        if (block_len1 as usize) < P::HDR_SZ || block_len1 % 4 != 0 {
            return Err(Err::Error(PcapError::MalformedFrame("total length")));
        }
        // 12 is block_type (4) + block_len1 (4) + block_len2 (4)
        let (i, block_content) = take(block_len1 - 12)(i)?;
        let (rest, block_len2) = En::parse_u32(i)?;
        if block_len2 != block_len1 {
            return Err(Err::Error(PcapError::MalformedFrame(
                "trailing total length",
            )));
        }
        // call block content parsing function
        let (_, b) = P::inner_parse(block_type, block_len1, block_content)?;
        // return the remaining bytes from the container, not content
        Ok((rest, b))
    }
}
