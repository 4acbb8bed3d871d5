use nom::{Err, IResult};
use rusticata_macros::{align32, newtype_enum};
use std::convert::TryFrom;

use crate::endianness::{Endianness, PcapBE, PcapEndianness, PcapLE};
use crate::pcapng::option::*;
use crate::PcapError;

use super::{ng_block_parser, PcapNGBlockParser, NRB_MAGIC};

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct NameRecordType(pub u16);

newtype_enum! {
    impl debug NameRecordType {
        End = 0,
        Ipv4 = 1,
        Ipv6 = 2
    }
}

/// A name resolution record: an address followed by the names resolving to
/// it.
///
/// `names` holds the raw name bytes (one or more zero-terminated strings,
/// kept opaque). Records with an unrecognized type, or whose value is too
/// short to contain an address, are preserved as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRecord {
    Ipv4 { addr: [u8; 4], names: Vec<u8> },
    Ipv6 { addr: [u8; 16], names: Vec<u8> },
    Raw { record_type: NameRecordType, value: Vec<u8> },
}

impl NameRecord {
    fn from_raw(record_type: u16, value: Vec<u8>) -> Self {
        match NameRecordType(record_type) {
            NameRecordType::Ipv4 if value.len() >= 4 => {
                let addr = <[u8; 4]>::try_from(&value[..4]).expect("4-byte address");
                NameRecord::Ipv4 {
                    addr,
                    names: value[4..].to_vec(),
                }
            }
            NameRecordType::Ipv6 if value.len() >= 16 => {
                let addr = <[u8; 16]>::try_from(&value[..16]).expect("16-byte address");
                NameRecord::Ipv6 {
                    addr,
                    names: value[16..].to_vec(),
                }
            }
            t => NameRecord::Raw {
                record_type: t,
                value,
            },
        }
    }

    pub(crate) fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            NameRecord::Ipv4 { addr, names } => {
                let mut value = Vec::with_capacity(4 + names.len());
                value.extend_from_slice(addr);
                value.extend_from_slice(names);
                pack_option(NameRecordType::Ipv4.0, &value, en, "nrb_record_ipv4")
            }
            NameRecord::Ipv6 { addr, names } => {
                let mut value = Vec::with_capacity(16 + names.len());
                value.extend_from_slice(addr);
                value.extend_from_slice(names);
                pack_option(NameRecordType::Ipv6.0, &value, en, "nrb_record_ipv6")
            }
            NameRecord::Raw { record_type, value } => {
                pack_option(record_type.0, value, en, "nrb_record")
            }
        }
    }
}

/// An option carried by a [`NameResolutionBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResolutionOption {
    /// `opt_comment`
    Comment(String),
    /// `ns_dnsname`: name of the DNS server used to resolve names
    DnsName(String),
    /// `ns_dnsIP4addr`: IPv4 address of the DNS server
    DnsIp4Addr([u8; 4]),
    /// `ns_dnsIP6addr`: IPv6 address of the DNS server
    DnsIp6Addr([u8; 16]),
    /// Any other code, preserved as raw bytes
    Raw(RawOption),
}

impl NameResolutionOption {
    pub(crate) fn from_raw(raw: RawOption) -> Self {
        match raw.code {
            OptionCode::Comment => string_option(raw, Self::Comment, Self::Raw),
            OptionCode::NsDnsName => string_option(raw, Self::DnsName, Self::Raw),
            OptionCode::NsDnsIP4addr => match <[u8; 4]>::try_from(&raw.value[..]) {
                Ok(addr) => Self::DnsIp4Addr(addr),
                Err(_) => Self::Raw(raw),
            },
            OptionCode::NsDnsIP6addr => match <[u8; 16]>::try_from(&raw.value[..]) {
                Ok(addr) => Self::DnsIp6Addr(addr),
                Err(_) => Self::Raw(raw),
            },
            _ => Self::Raw(raw),
        }
    }
}

impl PackOption for NameResolutionOption {
    fn pack(&self, en: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            Self::Comment(s) => pack_option(OptionCode::Comment.0, s.as_bytes(), en, "opt_comment"),
            Self::DnsName(s) => pack_option(OptionCode::NsDnsName.0, s.as_bytes(), en, "ns_dnsname"),
            Self::DnsIp4Addr(addr) => {
                pack_option(OptionCode::NsDnsIP4addr.0, addr, en, "ns_dnsIP4addr")
            }
            Self::DnsIp6Addr(addr) => {
                pack_option(OptionCode::NsDnsIP6addr.0, addr, en, "ns_dnsIP6addr")
            }
            Self::Raw(raw) => pack_option(raw.code.0, &raw.value, en, "raw option"),
        }
    }
}

/// A Name Resolution Block (NRB) associates addresses with the host names
/// they resolved to at capture time.
///
/// The body is a record list terminated by an end record, followed by an
/// option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolutionBlock {
    pub records: Vec<NameRecord>,
    pub options: Vec<NameResolutionOption>,
}

impl<'a, En: PcapEndianness> PcapNGBlockParser<'a, En> for NameResolutionBlock {
    const HDR_SZ: usize = 12;
    const MAGIC: u32 = NRB_MAGIC;

    type Output = NameResolutionBlock;

    fn inner_parse(
        _block_type: u32,
        block_len: u32,
        i: &'a [u8],
    ) -> IResult<&'a [u8], NameResolutionBlock, PcapError> {
        let start_len = i.len();
        // records come first, then the cursor moves past the record
        // terminator to the options
        let (i, records) = parse_name_record_list::<En>(i)?;
        let current_offset = 12 + (start_len - i.len());
        let (i, options) = opt_parse_options::<En>(i, block_len as usize, current_offset)?;
        let block = NameResolutionBlock {
            records,
            options: options
                .into_iter()
                .map(NameResolutionOption::from_raw)
                .collect(),
        };
        Ok((i, block))
    }
}

fn parse_name_record_list<En: PcapEndianness>(
    i: &[u8],
) -> IResult<&[u8], Vec<NameRecord>, PcapError> {
    let mut records = Vec::new();
    let mut rem = i;
    loop {
        if rem.is_empty() {
            // no explicit end record; the whole body was records
            break;
        }
        if rem.len() < 4 {
            return Err(Err::Error(PcapError::MalformedFrame("name record header")));
        }
        let record_type = En::ENDIANNESS.read_u16(&rem[0..2]);
        let record_len = En::ENDIANNESS.read_u16(&rem[2..4]);
        if record_type == 0 && record_len == 0 {
            rem = &rem[4..];
            break;
        }
        let padded = align32!(record_len as usize);
        if rem.len() - 4 < padded {
            return Err(Err::Error(PcapError::MalformedFrame("name record length")));
        }
        records.push(NameRecord::from_raw(
            record_type,
            rem[4..4 + record_len as usize].to_vec(),
        ));
        rem = &rem[4 + padded..];
    }
    Ok((rem, records))
}

/// Parse a Name Resolution Block (little-endian)
#[inline]
pub fn parse_nameresolutionblock_le(i: &[u8]) -> IResult<&[u8], NameResolutionBlock, PcapError> {
    ng_block_parser::<NameResolutionBlock, PcapLE>()(i)
}

/// Parse a Name Resolution Block (big-endian)
#[inline]
pub fn parse_nameresolutionblock_be(i: &[u8]) -> IResult<&[u8], NameResolutionBlock, PcapError> {
    ng_block_parser::<NameResolutionBlock, PcapBE>()(i)
}
