//! Legacy PCAP file format
//!
//! See <https://wiki.wireshark.org/Development/LibpcapFileFormat> for details.
//!
//! A legacy capture stream is a 24-byte file header followed by records,
//! each record being a 16-byte header and `caplen` bytes of packet data.
//! The byte order and the timestamp resolution (micro or nanoseconds) of
//! the whole stream are encoded in the header magic number.
//!
//! The easiest way to read a stream is [`LegacyPcapReader`](struct.LegacyPcapReader.html),
//! which pulls one record per call from any `Read` implementor. The
//! low-level slice parsers ([`parse_pcap_header`](fn.parse_pcap_header.html),
//! [`parse_pcap_frame_le`](fn.parse_pcap_frame_le.html)) are also exported.
//!
//! Writing goes through [`LegacyPcapWriter`](struct.LegacyPcapWriter.html).

mod frame;
mod header;
mod reader;
mod writer;

pub use frame::*;
pub use header::*;
pub use reader::*;
pub use writer::*;
