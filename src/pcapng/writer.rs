use crate::endianness::Endianness;
use crate::error::PcapError;
use crate::pcapng::Block;
use crate::serialize::ToVec;
use std::io::Write;

/// Push-based writer for pcap-ng streams.
///
/// Blocks are serialized in the endianness of the current section: the
/// writer starts little-endian, and every Section Header Block handed to
/// [`write_block`](Self::write_block) switches it to the endianness the
/// block declares. Blocks are staged in memory, so a failed write does not
/// leave a partial block length on the sink unless the sink itself fails
/// mid-buffer.
///
/// ## Example
///
/// ```rust
/// use pcap_codec::{Block, Endianness, InterfaceDescriptionBlock, Linktype};
/// use pcap_codec::{PcapNGWriter, SectionHeaderBlock};
///
/// let mut out = Vec::new();
/// let mut writer = PcapNGWriter::new(&mut out);
/// writer
///     .write_block(&Block::SectionHeader(SectionHeaderBlock::new(Endianness::Little)))
///     .unwrap();
/// writer
///     .write_block(&Block::InterfaceDescription(InterfaceDescriptionBlock::new(
///         Linktype::ETHERNET,
///         65535,
///     )))
///     .unwrap();
/// assert_eq!(out.len(), 28 + 20);
/// ```
pub struct PcapNGWriter<W>
where
    W: Write,
{
    sink: W,
    endianness: Endianness,
    written: u64,
}

impl<W> PcapNGWriter<W>
where
    W: Write,
{
    /// Creates a writer with the default little-endian byte order.
    pub fn new(sink: W) -> PcapNGWriter<W> {
        Self::with_endianness(sink, Endianness::Little)
    }

    /// Creates a writer with the given initial byte order.
    ///
    /// The byte order changes whenever a section header block declaring a
    /// different one is written.
    pub fn with_endianness(sink: W, endianness: Endianness) -> PcapNGWriter<W> {
        PcapNGWriter {
            sink,
            endianness,
            written: 0,
        }
    }

    /// Endianness of the current section.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of bytes written to the sink so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Serialize one block and write it to the sink.
    ///
    /// Returns the number of bytes written.
    pub fn write_block(&mut self, block: &Block) -> Result<usize, PcapError> {
        if let Block::SectionHeader(shb) = block {
            self.endianness = shb.endianness;
        }
        let buf = block.to_vec_endian(self.endianness)?;
        self.sink
            .write_all(&buf)
            .map_err(|_| PcapError::ShortWrite("block"))?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), PcapError> {
        self.sink.flush().map_err(|_| PcapError::ShortWrite("flush"))
    }

    /// Return the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
