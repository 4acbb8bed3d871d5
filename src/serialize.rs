//! Serialization of typed blocks and records to their wire representation.
//!
//! Length fields are never stored on the typed side: every total length is
//! recomputed from the components while packing, so a block read from one
//! stream can be rewritten to another without fixups.

use crate::endianness::Endianness;
use crate::error::PcapError;
use crate::pcap::{LegacyPcapBlock, PcapHeader};
use crate::pcapng::*;
use cookie_factory::bytes::{be_i32, be_i64, be_u16, be_u32, le_i32, le_i64, le_u16, le_u32};
use cookie_factory::combinator::slice;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, SerializeFn};
use rusticata_macros::align32;
use std::io::Write;

/// Serialization to the wire representation.
pub trait ToVec {
    /// Serialize to bytes in the given byte order.
    ///
    /// Blocks that declare their own byte order (the pcap file header, the
    /// pcap-ng section header) serialize in it and ignore the argument.
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError>;

    /// Serialize to bytes (little-endian).
    fn to_vec(&self) -> Result<Vec<u8>, PcapError> {
        self.to_vec_endian(Endianness::Little)
    }
}

fn gen_u16<'a, W: Write + 'a>(endianness: Endianness, v: u16) -> impl SerializeFn<W> + 'a {
    move |out| match endianness {
        Endianness::Little => le_u16(v)(out),
        Endianness::Big => be_u16(v)(out),
    }
}

fn gen_u32<'a, W: Write + 'a>(endianness: Endianness, v: u32) -> impl SerializeFn<W> + 'a {
    move |out| match endianness {
        Endianness::Little => le_u32(v)(out),
        Endianness::Big => be_u32(v)(out),
    }
}

fn gen_i32<'a, W: Write + 'a>(endianness: Endianness, v: i32) -> impl SerializeFn<W> + 'a {
    move |out| match endianness {
        Endianness::Little => le_i32(v)(out),
        Endianness::Big => be_i32(v)(out),
    }
}

fn gen_i64<'a, W: Write + 'a>(endianness: Endianness, v: i64) -> impl SerializeFn<W> + 'a {
    move |out| match endianness {
        Endianness::Little => le_i64(v)(out),
        Endianness::Big => be_i64(v)(out),
    }
}

fn padding_for<'a, W: Write + 'a>(unaligned_length: usize) -> impl SerializeFn<W> + 'a {
    let length = align32!(unaligned_length) - unaligned_length;
    slice(&[0u8, 0, 0, 0][..length])
}

impl ToVec for PcapHeader {
    fn to_vec_endian(&self, _endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let en = self.endianness();
        let mut v = Vec::with_capacity(24);
        gen(
            tuple((
                // the stored magic is the little-endian reading of the
                // on-wire bytes, so it is always emitted raw
                le_u32(self.magic_number),
                gen_u16(en, self.version_major),
                gen_u16(en, self.version_minor),
                gen_i32(en, self.thiszone),
                gen_u32(en, self.sigfigs),
                gen_u32(en, self.snaplen),
                gen_u32(en, self.network.0 as u32),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("file header"))?;
        Ok(v)
    }
}

impl ToVec for LegacyPcapBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let mut v = Vec::with_capacity(self.data.len() + 16);
        gen(
            tuple((
                gen_u32(endianness, self.ts_sec),
                gen_u32(endianness, self.ts_frac),
                gen_u32(endianness, self.caplen),
                gen_u32(endianness, self.origlen),
                slice(&self.data),
            )),
            &mut v,
        )
        // pcap records have no alignment constraints
        .map_err(|_| PcapError::ShortWrite("record"))?;
        Ok(v)
    }
}

impl ToVec for SectionHeaderBlock {
    /// A section header defines the byte order of its section, so it
    /// serializes in its own declared endianness.
    fn to_vec_endian(&self, _endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let en = self.endianness;
        let options = pack_option_list(&self.options, en)?;
        let block_len = (28 + options.len()) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(en, SHB_MAGIC),
                gen_u32(en, block_len),
                gen_u32(en, BOM_MAGIC),
                gen_u16(en, self.major_version),
                gen_u16(en, self.minor_version),
                gen_i64(en, self.section_len),
                slice(&options),
                gen_u32(en, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("section header block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for InterfaceDescriptionBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let options = pack_option_list(&self.options, endianness)?;
        let block_len = (20 + options.len()) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(endianness, IDB_MAGIC),
                gen_u32(endianness, block_len),
                gen_u16(endianness, self.linktype.0 as u16),
                gen_u16(endianness, self.reserved),
                gen_u32(endianness, self.snaplen),
                slice(&options),
                gen_u32(endianness, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("interface description block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for EnhancedPacketBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        if self.data.len() > u32::MAX as usize - 4 {
            return Err(PcapError::ValueTooLong("packet data"));
        }
        let options = pack_option_list(&self.options, endianness)?;
        let block_len = (32 + align32!(self.data.len()) + options.len()) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(endianness, EPB_MAGIC),
                gen_u32(endianness, block_len),
                gen_u32(endianness, self.if_id),
                gen_u32(endianness, self.ts_high),
                gen_u32(endianness, self.ts_low),
                gen_u32(endianness, self.caplen()),
                gen_u32(endianness, self.origlen),
                slice(&self.data),
                padding_for(self.data.len()),
                slice(&options),
                gen_u32(endianness, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("enhanced packet block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for NameResolutionBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        // the record list terminator is required, even for an empty list
        let mut records = Vec::new();
        for record in &self.records {
            records.extend_from_slice(&record.pack(endianness)?);
        }
        records.extend_from_slice(&[0, 0, 0, 0]);
        let options = pack_option_list(&self.options, endianness)?;
        let block_len = (12 + records.len() + options.len()) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(endianness, NRB_MAGIC),
                gen_u32(endianness, block_len),
                slice(&records),
                slice(&options),
                gen_u32(endianness, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("name resolution block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for InterfaceStatisticsBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let options = pack_option_list(&self.options, endianness)?;
        let block_len = (24 + options.len()) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(endianness, ISB_MAGIC),
                gen_u32(endianness, block_len),
                gen_u32(endianness, self.if_id),
                gen_u32(endianness, self.ts_high),
                gen_u32(endianness, self.ts_low),
                slice(&options),
                gen_u32(endianness, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("interface statistics block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for UnknownBlock {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        let block_len = (12 + align32!(self.data.len())) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                gen_u32(endianness, self.block_type),
                gen_u32(endianness, block_len),
                slice(&self.data),
                padding_for(self.data.len()),
                gen_u32(endianness, block_len),
            )),
            &mut v,
        )
        .map_err(|_| PcapError::ShortWrite("unknown block"))?;
        debug_assert!(v.len() % 4 == 0);
        Ok(v)
    }
}

impl ToVec for Block {
    fn to_vec_endian(&self, endianness: Endianness) -> Result<Vec<u8>, PcapError> {
        match self {
            Block::SectionHeader(b) => b.to_vec_endian(endianness),
            Block::InterfaceDescription(b) => b.to_vec_endian(endianness),
            Block::EnhancedPacket(b) => b.to_vec_endian(endianness),
            Block::NameResolution(b) => b.to_vec_endian(endianness),
            Block::InterfaceStatistics(b) => b.to_vec_endian(endianness),
            Block::Unknown(b) => b.to_vec_endian(endianness),
        }
    }
}
