use nom::bytes::streaming::take;
use nom::{Err, IResult, Needed};

use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::pcapng::option::*;
use crate::utils::array_ref4;
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser, BOM_MAGIC, SHB_MAGIC};

/// An option carried by a [`SectionHeaderBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionHeaderOption {
    /// `opt_comment`
    Comment(String),
    /// `shb_hardware`: description of the capture hardware
    Hardware(String),
    /// `shb_os`: name of the operating system
    Os(String),
    /// `shb_userappl`: name of the capturing application
    UserAppl(String),
    /// Any other code, preserved as raw bytes
    Raw(RawOption),
}

impl SectionHeaderOption {
    pub(crate) fn from_raw(raw: RawOption) -> Self {
        match raw.code {
            OptionCode::Comment => string_option(raw, Self::Comment, Self::Raw),
            OptionCode::ShbHardware => string_option(raw, Self::Hardware, Self::Raw),
            OptionCode::ShbOs => string_option(raw, Self::Os, Self::Raw),
            OptionCode::ShbUserAppl => string_option(raw, Self::UserAppl, Self::Raw),
            _ => Self::Raw(raw),
        }
    }
}

impl PackOption for SectionHeaderOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            Self::Comment(s) => pack_option(OptionCode::Comment.0, s.as_bytes(), en, "opt_comment"),
            Self::Hardware(s) => {
                pack_option(OptionCode::ShbHardware.0, s.as_bytes(), en, "shb_hardware")
            }
            Self::Os(s) => pack_option(OptionCode::ShbOs.0, s.as_bytes(), en, "shb_os"),
            Self::UserAppl(s) => {
                pack_option(OptionCode::ShbUserAppl.0, s.as_bytes(), en, "shb_userappl")
            }
            Self::Raw(raw) => pack_option(raw.code.0, &raw.value, en, "raw option"),
        }
    }
}

/// The Section Header Block (SHB) identifies the beginning of a section of
/// the capture stream.
///
/// The Section Header Block does not contain data but it rather identifies
/// a list of blocks (interfaces, packets) that are logically correlated.
/// Its byte-order magic fixes the endianness of every block in the section;
/// the block serializes in its own declared endianness, and a writer that
/// is handed one switches to it for the rest of the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaderBlock {
    /// Endianness of this section, decoded from the byte-order magic
    pub endianness: Endianness,
    pub major_version: u16,
    pub minor_version: u16,
    /// Length of the section in bytes, or -1 if unspecified
    pub section_len: i64,
    pub options: Vec<SectionHeaderOption>,
}

impl SectionHeaderBlock {
    /// A version 1.0 section header with unspecified length and no options
    pub fn new(endianness: Endianness) -> SectionHeaderBlock {
        SectionHeaderBlock {
            endianness,
            major_version: 1,
            minor_version: 0,
            section_len: -1,
            options: Vec::new(),
        }
    }

    pub fn big_endian(&self) -> bool {
        self.endianness == Endianness::Big
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for SectionHeaderBlock {
    const HDR_SZ: usize = 28;
    const MAGIC: u32 = SHB_MAGIC;

    type Output = SectionHeaderBlock;

    fn inner_parse(
        _block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], SectionHeaderBlock, PcapError> {
        let (i, bom) = take(4usize)(i)?;
        let bom = En::u32_from_bytes([bom[0], bom[1], bom[2], bom[3]]);
        if bom != BOM_MAGIC {
            return Err(Err::Error(PcapError::BadMagic(bom)));
        }
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let (i, options) = opt_parse_options::<En>(i, block_len as usize, 28)?;
        let block = SectionHeaderBlock {
            endianness: En::ENDIANNESS,
            major_version,
            minor_version,
            section_len,
            options: options
                .into_iter()
                .map(SectionHeaderOption::from_raw)
                .collect(),
        };
        Ok((i, block))
    }
}

/// Parse a Section Header Block (little-endian)
pub fn parse_sectionheaderblock_le(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError> {
    ng_block_parser::<SectionHeaderBlock, PcapLE>()(i)
}

/// Parse a Section Header Block (big-endian)
pub fn parse_sectionheaderblock_be(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError> {
    ng_block_parser::<SectionHeaderBlock, PcapBE>()(i)
}

/// Parse a Section Header Block (little or big endian)
///
/// The byte-order magic inside the block body decides which endianness the
/// rest of the block (and the section it opens) is decoded with. A magic
/// matching neither byte order fails with `BadMagic`.
pub fn parse_sectionheaderblock(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError> {
    if i.len() < 12 {
        return Err(Err::Incomplete(Needed::new(12 - i.len())));
    }
    let bom = u32::from_le_bytes(*array_ref4(i, 8));
    if bom == BOM_MAGIC {
        parse_sectionheaderblock_le(i)
    } else if bom == BOM_MAGIC.swap_bytes() {
        parse_sectionheaderblock_be(i)
    } else {
        Err(Err::Error(PcapError::BadMagic(bom)))
    }
}
