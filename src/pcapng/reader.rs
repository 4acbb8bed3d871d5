use crate::endianness::Endianness;
use crate::error::PcapError;
use crate::pcapng::{parse_block_be, parse_block_le, Block};
use circular::Buffer;
use nom::{Err, Needed, Offset};
use std::io::Read;

const DEFAULT_CAPACITY: usize = 65536;

/// Pull-based reader over a pcap-ng stream.
///
/// The reader is built on a circular buffer, which means memory usage
/// stays proportional to the largest block, and huge files or infinite
/// streams can be consumed. It wraps any input providing the `Read` trait;
/// refills happen transparently inside [`next_block`](Self::next_block),
/// and the buffer grows on demand when a block exceeds its capacity.
///
/// The first call to `next_block` usually returns a Section Header Block
/// (SHB), marking the start of a new section; until then blocks are decoded
/// with a provisional little-endian assumption. Each section header
/// re-establishes the endianness used for the blocks that follow it.
///
/// Some information must be stored to interpret later blocks (for ex. the
/// data link type and timestamp resolution from each interface description
/// block); keeping that per-section state is the caller's concern.
///
/// ## Example
///
/// ```rust
/// use pcap_codec::{Block, Endianness, PcapNGReader, PcapNGWriter, SectionHeaderBlock};
///
/// let mut file = Vec::new();
/// let mut writer = PcapNGWriter::new(&mut file);
/// writer
///     .write_block(&Block::SectionHeader(SectionHeaderBlock::new(Endianness::Little)))
///     .unwrap();
///
/// let mut reader = PcapNGReader::new(&file[..]).unwrap();
/// let mut num_blocks = 0;
/// while let Some(block) = reader.next_block().unwrap() {
///     match block {
///         Block::SectionHeader(shb) => {
///             // starting a new section, flush per-section state
///             assert_eq!(shb.section_len, -1);
///         }
///         Block::InterfaceDescription(idb) => {
///             let _linktype = idb.linktype;
///         }
///         _ => (),
///     }
///     num_blocks += 1;
/// }
/// assert_eq!(num_blocks, 1);
/// ```
pub struct PcapNGReader<R>
where
    R: Read,
{
    reader: R,
    buffer: Buffer,
    endianness: Endianness,
    consumed: u64,
    reader_exhausted: bool,
}

impl<R> PcapNGReader<R>
where
    R: Read,
{
    /// Creates a new `PcapNGReader<R>` with the default buffer capacity.
    pub fn new(reader: R) -> Result<PcapNGReader<R>, PcapError> {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Creates a new `PcapNGReader<R>` with the provided buffer capacity.
    pub fn with_capacity(capacity: usize, reader: R) -> Result<PcapNGReader<R>, PcapError> {
        let buffer = Buffer::with_capacity(capacity.max(12));
        Ok(PcapNGReader {
            reader,
            buffer,
            endianness: Endianness::Little,
            consumed: 0,
            reader_exhausted: false,
        })
    }

    /// Endianness of the current section.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of bytes consumed from the source so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Read the next block.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a block boundary.
    /// An end of stream in the middle of a block fails with `ShortRead`;
    /// framing errors fail with `MalformedFrame` or `BadMagic` and the
    /// reader does not attempt to resynchronize afterwards.
    pub fn next_block(&mut self) -> Result<Option<Block>, PcapError> {
        loop {
            if self.buffer.available_data() == 0 {
                self.refill()?;
                if self.buffer.available_data() == 0 && self.reader_exhausted {
                    return Ok(None);
                }
            }
            let result = {
                let data = self.buffer.data();
                let parse = match self.endianness {
                    Endianness::Big => parse_block_be,
                    Endianness::Little => parse_block_le,
                };
                match parse(data) {
                    Ok((rem, block)) => Ok((data.offset(rem), block)),
                    Err(e) => Err(e),
                }
            };
            match result {
                Ok((offset, block)) => {
                    if let Block::SectionHeader(ref shb) = block {
                        self.endianness = shb.endianness;
                    }
                    self.consumed += offset as u64;
                    self.buffer.consume(offset);
                    return Ok(Some(block));
                }
                Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(e),
                Err(Err::Incomplete(needed)) => {
                    if self.reader_exhausted {
                        return Err(PcapError::ShortRead("block"));
                    }
                    self.grow_for(needed);
                    self.refill()?;
                }
            }
        }
    }

    fn grow_for(&mut self, needed: Needed) {
        if let Needed::Size(n) = needed {
            let required = self.buffer.available_data() + n.get();
            if required > self.buffer.capacity() {
                self.buffer.grow(required.next_power_of_two());
            }
        }
    }

    fn refill(&mut self) -> Result<(), PcapError> {
        self.buffer.shift();
        let space = self.buffer.space();
        if space.is_empty() {
            return Ok(());
        }
        let sz = self
            .reader
            .read(space)
            .map_err(|_| PcapError::ShortRead("source"))?;
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}
