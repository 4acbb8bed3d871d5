use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::error::PcapError;
use nom::bytes::streaming::take;
use nom::{Err, IResult};
use rusticata_macros::{align32, newtype_enum};

/// The numeric code of a TLV option.
///
/// Codes are scoped to the block kind that contains the option: the same
/// numeric value means different things in different blocks (for ex. code 2
/// is `shb_hardware` in a section header and `if_name` in an interface
/// description), so the named constants below overlap on purpose.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfName = 2,
    IfDescription = 3,
    IfTsresol = 9,
    IfOs = 12,
    IsbStarttime = 2,
    IsbEndtime = 3,
    IsbIfrecv = 4,
    IsbIfdrop = 5,
    IsbFilteraccept = 6,
    IsbOsdrop = 7,
    IsbUsrdeliv = 8,
    EpbFlags = 2,
    EpbHash = 3,
    EpbDropcount = 4,
    EpbPacketid = 5,
    EpbQueue = 6,
    EpbVerdict = 7,
    NsDnsName = 2,
    NsDnsIP4addr = 3,
    NsDnsIP6addr = 4,
}
}

/// An option whose code is not recognized in its containing block, kept as
/// raw bytes so that a read/write round trip is byte-preserving.
///
/// `value` is the exact declared length of the option; padding to the next
/// 32-bit boundary is stripped on read and recreated on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    pub code: OptionCode,
    pub value: Vec<u8>,
}

/// Parse a single TLV option (little-endian)
#[inline]
pub fn parse_option_le(i: &[u8]) -> IResult<&[u8], RawOption, PcapError> {
    parse_option::<PcapLE>(i)
}

/// Parse a single TLV option (big-endian)
#[inline]
pub fn parse_option_be(i: &[u8]) -> IResult<&[u8], RawOption, PcapError> {
    parse_option::<PcapBE>(i)
}

pub(crate) fn parse_option<En: PcapEndianness>(i: &[u8]) -> IResult<&[u8], RawOption, PcapError> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let (i, value) = take(align32!(len as u32))(i)?;
    let option = RawOption {
        code: OptionCode(code),
        value: value[..len as usize].to_vec(),
    };
    Ok((i, option))
}

/// Decode the option region of a block.
///
/// `len` is the block total length and `opt_offset` the offset of the
/// option region from the block start; the region runs to the trailing
/// length field. The `{0, 0}` terminator ends the list; a region exhausted
/// without a terminator is accepted. A declared option length overrunning
/// the region fails with `MalformedFrame`.
pub(crate) fn opt_parse_options<'i, En: PcapEndianness>(
    i: &'i [u8],
    len: usize,
    opt_offset: usize,
) -> IResult<&'i [u8], Vec<RawOption>, PcapError> {
    if len < opt_offset {
        return Err(Err::Error(PcapError::MalformedFrame("option region")));
    }
    if len == opt_offset {
        return Ok((i, Vec::new()));
    }
    let (rest, region) = take(len - opt_offset)(i)?;
    let options = parse_option_list::<En>(region)?;
    Ok((rest, options))
}

fn parse_option_list<En: PcapEndianness>(mut region: &[u8]) -> Result<Vec<RawOption>, Err<PcapError>> {
    let mut options = Vec::new();
    while !region.is_empty() {
        if region.len() < 4 {
            return Err(Err::Error(PcapError::MalformedFrame("option header")));
        }
        let code = En::ENDIANNESS.read_u16(&region[0..2]);
        let len = En::ENDIANNESS.read_u16(&region[2..4]);
        if code == 0 && len == 0 {
            // end of options; anything after the terminator is not part of the list
            break;
        }
        let padded = align32!(len as usize);
        if region.len() - 4 < padded {
            return Err(Err::Error(PcapError::MalformedFrame("option length")));
        }
        options.push(RawOption {
            code: OptionCode(code),
            value: region[4..4 + len as usize].to_vec(),
        });
        region = &region[4 + padded..];
    }
    Ok(options)
}

/// Encode one TLV: code, declared length, value, zero padding to the next
/// 32-bit boundary.
pub(crate) fn pack_option(
    code: u16,
    value: &[u8],
    en: Endianness,
    context: &'static str,
) -> Result<Vec<u8>, PcapError> {
    if value.len() > u16::MAX as usize {
        return Err(PcapError::ValueTooLong(context));
    }
    let mut out = Vec::with_capacity(4 + align32!(value.len()));
    en.put_u16(&mut out, code);
    en.put_u16(&mut out, value.len() as u16);
    out.extend_from_slice(value);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    Ok(out)
}

/// An option that knows how to serialize itself in a given byte order.
pub(crate) trait PackOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError>;
}

/// Encode an option list. The `{0, 0}` terminator is emitted whenever the
/// list is non-empty.
pub(crate) fn pack_option_list<O: PackOption>(
    options: &[O],
    en: Endianness,
) -> Result<Vec<u8>, PcapError> {
    let mut out = Vec::new();
    if options.is_empty() {
        return Ok(out);
    }
    for opt in options {
        out.extend_from_slice(&opt.pack(en)?);
    }
    out.extend_from_slice(&[0, 0, 0, 0]);
    Ok(out)
}

/* typed decode helpers; a recognized code whose value does not have the
 * expected shape falls back to the raw representation, so nothing is lost
 * on a round trip */

pub(crate) fn string_option<T>(
    raw: RawOption,
    wrap: fn(String) -> T,
    raw_wrap: fn(RawOption) -> T,
) -> T {
    let code = raw.code;
    match String::from_utf8(raw.value) {
        Ok(s) => wrap(s),
        Err(e) => raw_wrap(RawOption {
            code,
            value: e.into_bytes(),
        }),
    }
}

pub(crate) fn u8_option<T>(
    raw: RawOption,
    wrap: fn(u8) -> T,
    raw_wrap: fn(RawOption) -> T,
) -> T {
    if raw.value.len() == 1 {
        wrap(raw.value[0])
    } else {
        raw_wrap(raw)
    }
}

pub(crate) fn u32_option<T>(
    raw: RawOption,
    en: Endianness,
    wrap: fn(u32) -> T,
    raw_wrap: fn(RawOption) -> T,
) -> T {
    if raw.value.len() == 4 {
        wrap(en.read_u32(&raw.value))
    } else {
        raw_wrap(raw)
    }
}

pub(crate) fn u64_option<T>(
    raw: RawOption,
    en: Endianness,
    wrap: fn(u64) -> T,
    raw_wrap: fn(RawOption) -> T,
) -> T {
    if raw.value.len() == 8 {
        wrap(en.read_u64(&raw.value))
    } else {
        raw_wrap(raw)
    }
}
