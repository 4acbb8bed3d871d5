//! # PCAP and PCAPNG codec
//!
//! This crate reads and writes capture streams in the legacy PCAP format
//! and its block-structured successor PCAPNG, round-tripping both the bytes
//! on the wire and a typed representation of records, blocks and their
//! option lists.
//!
//! Compared to parse-only crates, both directions are first-class: every
//! typed block can be serialized back, in either byte order, and blocks or
//! options the codec does not recognize are carried through verbatim so a
//! read/write pipeline never loses data.
//!
//! # Example: copying a pcap-ng stream
//!
//! ```rust
//! use pcap_codec::{Block, PcapNGReader, PcapNGWriter};
//!
//! # fn copy(input: &[u8]) -> Result<Vec<u8>, pcap_codec::PcapError> {
//! let mut reader = PcapNGReader::new(input)?;
//! let mut output = Vec::new();
//! let mut writer = PcapNGWriter::new(&mut output);
//! while let Some(block) = reader.next_block()? {
//!     if let Block::EnhancedPacket(ref epb) = block {
//!         // packet bytes are available here
//!         let _ = epb.data.len();
//!     }
//!     writer.write_block(&block)?;
//! }
//! # Ok(output)
//! # }
//! ```
//!
//! # Example: reading a legacy pcap stream
//!
//! ```rust,no_run
//! use pcap_codec::LegacyPcapReader;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("capture.pcap")?;
//! let mut reader = LegacyPcapReader::new(file)?;
//! let ts_unit = reader.header().ts_unit();
//! while let Some(record) = reader.next_record()? {
//!     println!("{} {} bytes", record.ts_f64(ts_unit), record.data.len());
//! }
//! # Ok(())
//! # }
//! ```

mod endianness;
pub use endianness::Endianness;

mod error;
pub use error::PcapError;

mod linktype;
pub use linktype::Linktype;

pub mod pcap;
pub use pcap::*;
pub mod pcapng;
pub use pcapng::*;

mod serialize;
pub use serialize::ToVec;

mod utils;
