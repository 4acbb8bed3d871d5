use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser};

/// A block whose type is not recognized.
///
/// The body bytes are kept verbatim (they are always a multiple of 4 on
/// the wire), so rewriting the block reproduces the original bytes exactly
/// and a copy pipeline is lossless for block types it does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlock {
    /// Block type, decoded in the endianness of the containing section
    pub block_type: u32,
    /// Raw body bytes, without the framing fields
    pub data: Vec<u8>,
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for UnknownBlock {
    const HDR_SZ: usize = 12;
    const MAGIC: u32 = 0;

    type Output = UnknownBlock;

    fn inner_parse(
        block_type: u32,
        _block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], UnknownBlock, PcapError> {
        let block = UnknownBlock {
            block_type,
            data: i.to_vec(),
        };
        Ok((i, block))
    }
}

/// Parse an unknown block (little-endian)
pub fn parse_unknownblock_le(i: &[u8]) -> IResult<&[u8], UnknownBlock, PcapError> {
    ng_block_parser::<UnknownBlock, PcapLE>()(i)
}

/// Parse an unknown block (big-endian)
pub fn parse_unknownblock_be(i: &[u8]) -> IResult<&[u8], UnknownBlock, PcapError> {
    ng_block_parser::<UnknownBlock, PcapBE>()(i)
}
