use nom::IResult;

use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::pcapng::option::*;
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser, ISB_MAGIC};

/// An option carried by an [`InterfaceStatisticsBlock`].
///
/// The counter options hold 64-bit values; the time options hold the same
/// two-word timestamp layout as packet blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatisticsOption {
    /// `opt_comment`
    Comment(String),
    /// `isb_starttime`
    StartTime { ts_high: u32, ts_low: u32 },
    /// `isb_endtime`
    EndTime { ts_high: u32, ts_low: u32 },
    /// `isb_ifrecv`: packets received from the interface
    IfRecv(u64),
    /// `isb_ifdrop`: packets dropped by the interface
    IfDrop(u64),
    /// `isb_filteraccept`: packets accepted by the filter
    FilterAccept(u64),
    /// `isb_osdrop`: packets dropped by the operating system
    OsDrop(u64),
    /// `isb_usrdeliv`: packets delivered to the user
    UsrDeliv(u64),
    /// Any other code, preserved as raw bytes
    Raw(RawOption),
}

impl StatisticsOption {
    fn two_word(raw: RawOption, en: Endianness, wrap: fn(u32, u32) -> Self) -> Self {
        if raw.value.len() == 8 {
            wrap(en.read_u32(&raw.value[0..4]), en.read_u32(&raw.value[4..8]))
        } else {
            Self::Raw(raw)
        }
    }

    pub(crate) fn from_raw(raw: RawOption, en: Endianness) -> Self {
        match raw.code {
            OptionCode::Comment => string_option(raw, Self::Comment, Self::Raw),
            OptionCode::IsbStarttime => {
                Self::two_word(raw, en, |ts_high, ts_low| Self::StartTime { ts_high, ts_low })
            }
            OptionCode::IsbEndtime => {
                Self::two_word(raw, en, |ts_high, ts_low| Self::EndTime { ts_high, ts_low })
            }
            OptionCode::IsbIfrecv => u64_option(raw, en, Self::IfRecv, Self::Raw),
            OptionCode::IsbIfdrop => u64_option(raw, en, Self::IfDrop, Self::Raw),
            OptionCode::IsbFilteraccept => u64_option(raw, en, Self::FilterAccept, Self::Raw),
            OptionCode::IsbOsdrop => u64_option(raw, en, Self::OsDrop, Self::Raw),
            OptionCode::IsbUsrdeliv => u64_option(raw, en, Self::UsrDeliv, Self::Raw),
            _ => Self::Raw(raw),
        }
    }
}

impl PackOption for StatisticsOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        let pack_two_word = |code: u16, ts_high: u32, ts_low: u32, ctx| {
            let mut value = Vec::with_capacity(8);
            en.put_u32(&mut value, ts_high);
            en.put_u32(&mut value, ts_low);
            pack_option(code, &value, en, ctx)
        };
        let pack_u64 = |code: u16, v: u64, ctx| {
            let mut value = Vec::with_capacity(8);
            en.put_u64(&mut value, v);
            pack_option(code, &value, en, ctx)
        };
        match self {
            Self::Comment(s) => pack_option(OptionCode::Comment.0, s.as_bytes(), en, "opt_comment"),
            Self::StartTime { ts_high, ts_low } => {
                pack_two_word(OptionCode::IsbStarttime.0, *ts_high, *ts_low, "isb_starttime")
            }
            Self::EndTime { ts_high, ts_low } => {
                pack_two_word(OptionCode::IsbEndtime.0, *ts_high, *ts_low, "isb_endtime")
            }
            Self::IfRecv(v) => pack_u64(OptionCode::IsbIfrecv.0, *v, "isb_ifrecv"),
            Self::IfDrop(v) => pack_u64(OptionCode::IsbIfdrop.0, *v, "isb_ifdrop"),
            Self::FilterAccept(v) => {
                pack_u64(OptionCode::IsbFilteraccept.0, *v, "isb_filteraccept")
            }
            Self::OsDrop(v) => pack_u64(OptionCode::IsbOsdrop.0, *v, "isb_osdrop"),
            Self::UsrDeliv(v) => pack_u64(OptionCode::IsbUsrdeliv.0, *v, "isb_usrdeliv"),
            Self::Raw(raw) => pack_option(raw.code.0, &raw.value, en, "raw option"),
        }
    }
}

/// An Interface Statistics Block (ISB) carries capture statistics for an
/// interface, all of them stored as options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceStatisticsBlock {
    pub if_id: u32,
    pub ts_high: u32,
    pub ts_low: u32,
    pub options: Vec<StatisticsOption>,
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for InterfaceStatisticsBlock {
    const HDR_SZ: usize = 24;
    const MAGIC: u32 = ISB_MAGIC;

    type Output = InterfaceStatisticsBlock;

    fn inner_parse(
        _block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], InterfaceStatisticsBlock, PcapError> {
        let (i, if_id) = En::parse_u32(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, options) = opt_parse_options::<En>(i, block_len as usize, 24)?;
        let block = InterfaceStatisticsBlock {
            if_id,
            ts_high,
            ts_low,
            options: options
                .into_iter()
                .map(|o| StatisticsOption::from_raw(o, En::ENDIANNESS))
                .collect(),
        };
        Ok((i, block))
    }
}

/// Parse an Interface Statistics Block (little-endian)
pub fn parse_interfacestatisticsblock_le(
    i: &[u8],
) -> IResult<&[u8], InterfaceStatisticsBlock, PcapError> {
    ng_block_parser::<InterfaceStatisticsBlock, PcapLE>()(i)
}

/// Parse an Interface Statistics Block (big-endian)
pub fn parse_interfacestatisticsblock_be(
    i: &[u8],
) -> IResult<&[u8], InterfaceStatisticsBlock, PcapError> {
    ng_block_parser::<InterfaceStatisticsBlock, PcapBE>()(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // ISB with isb_starttime, isb_endtime and isb_ifdrop
    const NG_BLOCK_ISB_LE: &[u8] = &hex!(
        "
05 00 00 00 40 00 00 00 01 00 00 00 97 C3 04 00
AA 47 CA 64 02 00 08 00 97 C3 04 00 AA 47 CA 64
03 00 08 00 97 C3 04 00 92 4B CA 64 05 00 08 00
0A 00 00 00 00 00 00 00 00 00 00 00 40 00 00 00
"
    );
    const NG_BLOCK_ISB_BE: &[u8] = &hex!(
        "
00 00 00 05 00 00 00 40 00 00 00 01 00 04 C3 97
64 CA 47 AA 00 02 00 08 00 04 C3 97 64 CA 47 AA
00 03 00 08 00 04 C3 97 64 CA 4B 92 00 05 00 08
00 00 00 00 00 00 00 0A 00 00 00 00 00 00 00 40
"
    );

    fn check_isb(block: &InterfaceStatisticsBlock) {
        assert_eq!(block.if_id, 1);
        assert_eq!(block.ts_high, 0x0004_C397);
        assert_eq!(block.ts_low, 0x64CA_47AA);
        assert_eq!(block.options.len(), 3);
        assert_eq!(
            block.options[0],
            StatisticsOption::StartTime {
                ts_high: 0x0004_C397,
                ts_low: 0x64CA_47AA,
            }
        );
        assert_eq!(
            block.options[1],
            StatisticsOption::EndTime {
                ts_high: 0x0004_C397,
                ts_low: 0x64CA_4B92,
            }
        );
        assert_eq!(block.options[2], StatisticsOption::IfDrop(10));
    }

    #[test]
    fn test_parse_isb_le() {
        let (rem, block) = parse_interfacestatisticsblock_le(NG_BLOCK_ISB_LE).expect("parse");
        assert!(rem.is_empty());
        check_isb(&block);
    }

    #[test]
    fn test_parse_isb_be() {
        let (rem, block) = parse_interfacestatisticsblock_be(NG_BLOCK_ISB_BE).expect("parse");
        assert!(rem.is_empty());
        check_isb(&block);
    }
}
