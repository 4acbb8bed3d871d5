use crate::endianness::Endianness;
use crate::error::PcapError;
use crate::pcap::{LegacyPcapBlock, PcapHeader};
use crate::serialize::ToVec;
use std::io::Write;

/// Push-based writer for legacy pcap streams.
///
/// The 24-byte file header is emitted at construction time; its magic
/// number fixes the byte order and the timestamp resolution for every
/// record that follows. Records are written in call order with no padding.
///
/// ## Example
///
/// ```rust
/// use pcap_codec::{Endianness, LegacyPcapWriter, PcapHeader};
///
/// let mut out = Vec::new();
/// let header = PcapHeader::with_endianness(Endianness::Little, false);
/// let mut writer = LegacyPcapWriter::new(&mut out, header).unwrap();
/// writer.write_packet(1_000_000_000, 500_000, b"ABCD").unwrap();
/// assert_eq!(out.len(), 24 + 16 + 4);
/// ```
pub struct LegacyPcapWriter<W>
where
    W: Write,
{
    sink: W,
    header: PcapHeader,
    endianness: Endianness,
    ts_unit: u32,
    written: u64,
}

impl<W> LegacyPcapWriter<W>
where
    W: Write,
{
    /// Creates a writer and emits the file header.
    pub fn new(mut sink: W, header: PcapHeader) -> Result<LegacyPcapWriter<W>, PcapError> {
        let buf = header.to_vec()?;
        sink.write_all(&buf)
            .map_err(|_| PcapError::ShortWrite("file header"))?;
        let endianness = header.endianness();
        let ts_unit = header.ts_unit();
        Ok(LegacyPcapWriter {
            sink,
            header,
            endianness,
            ts_unit,
            written: buf.len() as u64,
        })
    }

    pub fn header(&self) -> &PcapHeader {
        &self.header
    }

    /// Number of bytes written to the sink so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write one packet with `caplen = origlen = data.len()`.
    ///
    /// `ts_frac` is in the resolution units of the file header (micro or
    /// nanoseconds). Returns the number of bytes written.
    pub fn write_packet(
        &mut self,
        ts_sec: u32,
        ts_frac: u32,
        data: &[u8],
    ) -> Result<usize, PcapError> {
        if data.len() > u32::MAX as usize {
            return Err(PcapError::ValueTooLong("packet data"));
        }
        let caplen = data.len() as u32;
        if self.header.snaplen != 0 && caplen > self.header.snaplen {
            return Err(PcapError::InvariantViolation("caplen exceeds snaplen"));
        }
        self.emit(ts_sec, ts_frac, caplen, caplen, data)
    }

    /// Write one packet, splitting a floating-point timestamp into the
    /// header's integer pair.
    ///
    /// This is a convenience for callers holding `f64` timestamps; an `f64`
    /// cannot represent every nanosecond timestamp exactly, so the integer
    /// pair of [`write_packet`](Self::write_packet) is the primary contract.
    pub fn write_packet_f64(&mut self, ts: f64, data: &[u8]) -> Result<usize, PcapError> {
        let mut ts_sec = ts.trunc() as u32;
        let mut ts_frac = ((ts - ts.trunc()) * self.ts_unit as f64).round() as u32;
        if ts_frac >= self.ts_unit {
            ts_sec += 1;
            ts_frac -= self.ts_unit;
        }
        self.write_packet(ts_sec, ts_frac, data)
    }

    /// Write a record, preserving its `caplen`/`origlen` fields.
    ///
    /// Fails with `InvariantViolation` if the declared lengths contradict
    /// each other, the data, or the file snaplen.
    pub fn write_record(&mut self, block: &LegacyPcapBlock) -> Result<usize, PcapError> {
        if block.caplen > block.origlen {
            return Err(PcapError::InvariantViolation("caplen exceeds origlen"));
        }
        if block.caplen as usize != block.data.len() {
            return Err(PcapError::InvariantViolation(
                "caplen does not match data length",
            ));
        }
        if self.header.snaplen != 0 && block.caplen > self.header.snaplen {
            return Err(PcapError::InvariantViolation("caplen exceeds snaplen"));
        }
        self.emit(
            block.ts_sec,
            block.ts_frac,
            block.caplen,
            block.origlen,
            &block.data,
        )
    }

    fn emit(
        &mut self,
        ts_sec: u32,
        ts_frac: u32,
        caplen: u32,
        origlen: u32,
        data: &[u8],
    ) -> Result<usize, PcapError> {
        let mut hdr = Vec::with_capacity(16);
        let en = self.endianness;
        en.put_u32(&mut hdr, ts_sec);
        en.put_u32(&mut hdr, ts_frac);
        en.put_u32(&mut hdr, caplen);
        en.put_u32(&mut hdr, origlen);
        self.sink
            .write_all(&hdr)
            .map_err(|_| PcapError::ShortWrite("record header"))?;
        self.sink
            .write_all(data)
            .map_err(|_| PcapError::ShortWrite("record data"))?;
        let sz = hdr.len() + data.len();
        self.written += sz as u64;
        Ok(sz)
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
