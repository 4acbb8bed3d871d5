use crate::error::PcapError;
use crate::pcap::{parse_pcap_frame_be, parse_pcap_frame_le, parse_pcap_header};
use crate::pcap::{LegacyPcapBlock, PcapHeader};
use circular::Buffer;
use nom::{Err, IResult, Needed, Offset};
use std::io::Read;

const DEFAULT_CAPACITY: usize = 65536;

type LegacyParseFn = fn(&[u8]) -> IResult<&[u8], LegacyPcapBlock, PcapError>;

/// Pull-based reader over a legacy pcap stream.
///
/// The reader is built on a circular buffer, so memory usage stays
/// proportional to the largest record and huge files or infinite streams
/// can be consumed. It wraps any input providing the `Read` trait; refills
/// happen transparently inside [`next_record`](Self::next_record).
///
/// The 24-byte file header is read and checked at construction time; byte
/// order and timestamp resolution are fixed for the whole stream by its
/// magic number.
///
/// ## Example
///
/// ```rust
/// use pcap_codec::{LegacyPcapReader, LegacyPcapWriter, PcapHeader};
///
/// let mut file = Vec::new();
/// let mut writer = LegacyPcapWriter::new(&mut file, PcapHeader::new()).unwrap();
/// writer.write_packet(1_000, 500, b"\x01\x02\x03\x04").unwrap();
///
/// let mut reader = LegacyPcapReader::new(&file[..]).unwrap();
/// let ts_unit = reader.header().ts_unit();
/// let mut num_packets = 0;
/// while let Some(record) = reader.next_record().unwrap() {
///     let _ts = record.ts_f64(ts_unit);
///     num_packets += 1;
/// }
/// assert_eq!(num_packets, 1);
/// ```
pub struct LegacyPcapReader<R>
where
    R: Read,
{
    header: PcapHeader,
    reader: R,
    buffer: Buffer,
    consumed: u64,
    reader_exhausted: bool,
    parse: LegacyParseFn,
}

impl<R> LegacyPcapReader<R>
where
    R: Read,
{
    /// Creates a new `LegacyPcapReader<R>` with the default buffer capacity.
    pub fn new(reader: R) -> Result<LegacyPcapReader<R>, PcapError> {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Creates a new `LegacyPcapReader<R>` with the provided buffer capacity.
    pub fn with_capacity(
        capacity: usize,
        mut reader: R,
    ) -> Result<LegacyPcapReader<R>, PcapError> {
        // the buffer must at least hold a complete file header
        let mut buffer = Buffer::with_capacity(capacity.max(24));
        loop {
            let sz = reader
                .read(buffer.space())
                .map_err(|_| PcapError::ShortRead("source"))?;
            buffer.fill(sz);
            match parse_pcap_header(buffer.data()) {
                Ok((rem, header)) => {
                    let offset = buffer.data().offset(rem);
                    buffer.consume(offset);
                    let parse: LegacyParseFn = if header.is_bigendian() {
                        parse_pcap_frame_be
                    } else {
                        parse_pcap_frame_le
                    };
                    return Ok(LegacyPcapReader {
                        header,
                        reader,
                        buffer,
                        consumed: offset as u64,
                        reader_exhausted: false,
                        parse,
                    });
                }
                Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(e),
                Err(Err::Incomplete(_)) => {
                    if sz == 0 {
                        return Err(PcapError::ShortRead("file header"));
                    }
                }
            }
        }
    }

    /// The file header read at construction time.
    pub fn header(&self) -> &PcapHeader {
        &self.header
    }

    /// Number of bytes consumed from the source so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a record boundary.
    /// An end of stream in the middle of a record header or its data fails
    /// with `ShortRead`.
    pub fn next_record(&mut self) -> Result<Option<LegacyPcapBlock>, PcapError> {
        loop {
            if self.buffer.available_data() == 0 {
                self.refill()?;
                if self.buffer.available_data() == 0 && self.reader_exhausted {
                    return Ok(None);
                }
            }
            let result = {
                let data = self.buffer.data();
                match (self.parse)(data) {
                    Ok((rem, block)) => Ok((data.offset(rem), block)),
                    Err(e) => Err(e),
                }
            };
            match result {
                Ok((offset, block)) => {
                    if self.header.snaplen != 0 && block.caplen > self.header.snaplen {
                        return Err(PcapError::InvariantViolation("caplen exceeds snaplen"));
                    }
                    self.consumed += offset as u64;
                    self.buffer.consume(offset);
                    return Ok(Some(block));
                }
                Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(e),
                Err(Err::Incomplete(needed)) => {
                    if self.reader_exhausted {
                        return Err(PcapError::ShortRead("record"));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::tests_support::{FRAME_PCAP, PCAP_HDR};

    #[test]
    fn test_reader_one_record() {
        let mut input = PCAP_HDR.to_vec();
        input.extend_from_slice(FRAME_PCAP);
        let mut reader = LegacyPcapReader::new(&input[..]).expect("reader");
        assert_eq!(reader.header().snaplen, 262_144);
        let record = reader.next_record().expect("read").expect("record");
        assert_eq!(record.origlen, 74);
        assert!(reader.next_record().expect("eof").is_none());
    }

    #[test]
    fn test_reader_empty_input() {
        let empty: &[u8] = &[];
        match LegacyPcapReader::new(empty) {
            Err(PcapError::ShortRead(_)) => (),
            r => panic!("unexpected result {:?}", r.map(|_| ())),
        }
    }

    #[test]
    fn test_reader_truncated_record() {
        let mut input = PCAP_HDR.to_vec();
        input.extend_from_slice(&FRAME_PCAP[..30]);
        let mut reader = LegacyPcapReader::new(&input[..]).expect("reader");
        match reader.next_record() {
            Err(PcapError::ShortRead(_)) => (),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_reader_small_buffer() {
        let mut input = PCAP_HDR.to_vec();
        input.extend_from_slice(FRAME_PCAP);
        // a capacity smaller than the record forces a buffer grow
        let mut reader = LegacyPcapReader::with_capacity(32, &input[..]).expect("reader");
        let record = reader.next_record().expect("read").expect("record");
        assert_eq!(record.data.len(), 74);
        assert!(reader.next_record().expect("eof").is_none());
    }
}
