use nom::IResult;

use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::linktype::Linktype;
use crate::pcapng::option::*;
use crate::pcapng::build_ts_resolution;
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser, IDB_MAGIC};

/// An option carried by an [`InterfaceDescriptionBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceOption {
    /// `opt_comment`
    Comment(String),
    /// `if_name`: name of the device used to capture data
    Name(String),
    /// `if_description`: description of the device
    Description(String),
    /// `if_tsresol`: timestamp resolution exponent
    TsResol(u8),
    /// `if_os`: operating system of the capturing machine
    Os(String),
    /// Any other code, preserved as raw bytes
    Raw(RawOption),
}

impl InterfaceOption {
    pub(crate) fn from_raw(raw: RawOption) -> Self {
        match raw.code {
            OptionCode::Comment => string_option(raw, Self::Comment, Self::Raw),
            OptionCode::IfName => string_option(raw, Self::Name, Self::Raw),
            OptionCode::IfDescription => string_option(raw, Self::Description, Self::Raw),
            OptionCode::IfTsresol => u8_option(raw, Self::TsResol, Self::Raw),
            OptionCode::IfOs => string_option(raw, Self::Os, Self::Raw),
            _ => Self::Raw(raw),
        }
    }
}

impl PackOption for InterfaceOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            Self::Comment(s) => pack_option(OptionCode::Comment.0, s.as_bytes(), en, "opt_comment"),
            Self::Name(s) => pack_option(OptionCode::IfName.0, s.as_bytes(), en, "if_name"),
            Self::Description(s) => {
                pack_option(OptionCode::IfDescription.0, s.as_bytes(), en, "if_description")
            }
            Self::TsResol(v) => pack_option(OptionCode::IfTsresol.0, &[*v], en, "if_tsresol"),
            Self::Os(s) => pack_option(OptionCode::IfOs.0, s.as_bytes(), en, "if_os"),
            Self::Raw(raw) => pack_option(raw.code.0, &raw.value, en, "raw option"),
        }
    }
}

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptionBlock {
    pub linktype: Linktype,
    pub reserved: u16,
    pub snaplen: u32,
    pub options: Vec<InterfaceOption>,
}

impl InterfaceDescriptionBlock {
    pub fn new(linktype: Linktype, snaplen: u32) -> InterfaceDescriptionBlock {
        InterfaceDescriptionBlock {
            linktype,
            reserved: 0,
            snaplen,
            options: Vec::new(),
        }
    }

    /// The raw `if_tsresol` option value, or the default of 6 (microseconds)
    pub fn if_tsresol(&self) -> u8 {
        self.options
            .iter()
            .find_map(|o| {
                if let InterfaceOption::TsResol(v) = o {
                    Some(*v)
                } else {
                    None
                }
            })
            .unwrap_or(6)
    }

    /// Decode the interface time resolution, in units per second
    ///
    /// Return the resolution, or `None` if the resolution is invalid (for
    /// ex. greater than `2^64`)
    #[inline]
    pub fn ts_resolution(&self) -> Option<u64> {
        build_ts_resolution(self.if_tsresol())
    }
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for InterfaceDescriptionBlock {
    const HDR_SZ: usize = 20;
    const MAGIC: u32 = IDB_MAGIC;

    type Output = InterfaceDescriptionBlock;

    fn inner_parse(
        _block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], InterfaceDescriptionBlock, PcapError> {
        let (i, linktype) = En::parse_u16(i)?;
        let (i, reserved) = En::parse_u16(i)?;
        let (i, snaplen) = En::parse_u32(i)?;
        let (i, options) = opt_parse_options::<En>(i, block_len as usize, 20)?;
        let block = InterfaceDescriptionBlock {
            linktype: Linktype(linktype as i32),
            reserved,
            snaplen,
            options: options.into_iter().map(InterfaceOption::from_raw).collect(),
        };
        Ok((i, block))
    }
}

/// Parse an Interface Description Block (little-endian)
pub fn parse_interfacedescriptionblock_le(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapError> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapLE>()(i)
}

/// Parse an Interface Description Block (big-endian)
pub fn parse_interfacedescriptionblock_be(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapError> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapBE>()(i)
}
