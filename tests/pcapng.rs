use hex_literal::hex;
use pcap_codec::{
    Block, Endianness, EnhancedPacketBlock, InterfaceDescriptionBlock, InterfaceOption, Linktype,
    NameRecord, NameResolutionBlock, NameResolutionOption, OptionCode, PacketOption, PcapError,
    PcapNGReader, PcapNGWriter, RawOption, SectionHeaderBlock, SectionHeaderOption, ToVec,
};

const SHB_MINIMAL_LE: &[u8] = &hex!(
    "
0A 0D 0D 0A 1C 00 00 00 4D 3C 2B 1A 01 00 00 00
FF FF FF FF FF FF FF FF 1C 00 00 00"
);

fn read_all(input: &[u8]) -> Result<Vec<Block>, PcapError> {
    let mut reader = PcapNGReader::new(input)?;
    let mut blocks = Vec::new();
    while let Some(block) = reader.next_block()? {
        blocks.push(block);
    }
    Ok(blocks)
}

fn write_all(blocks: &[Block]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = PcapNGWriter::new(&mut out);
    for block in blocks {
        writer.write_block(block).expect("write");
    }
    out
}

#[test]
fn minimal_section() {
    // a single 28-byte section header, then end of stream
    let blocks = read_all(SHB_MINIMAL_LE).expect("read");
    assert_eq!(blocks.len(), 1);
    match &blocks[0] {
        Block::SectionHeader(shb) => {
            assert_eq!(shb.endianness, Endianness::Little);
            assert_eq!(shb.section_len, -1);
            assert!(shb.options.is_empty());
        }
        b => panic!("unexpected block {:?}", b),
    }
    assert_eq!(write_all(&blocks), SHB_MINIMAL_LE);
}

#[test]
fn endianness_flip_mid_stream() {
    // a big-endian section: the reader starts little-endian, sees the
    // swapped byte-order magic, and decodes the rest big-endian
    let shb = SectionHeaderBlock::new(Endianness::Big);
    let idb = InterfaceDescriptionBlock::new(Linktype::ETHERNET, 65535);
    let bytes = write_all(&[
        Block::SectionHeader(shb.clone()),
        Block::InterfaceDescription(idb.clone()),
    ]);
    assert_eq!(&bytes[8..12], &hex!("1A 2B 3C 4D")[..]);
    assert_eq!(&bytes[28..36], &hex!("00 00 00 01 00 00 00 14")[..]);

    let blocks = read_all(&bytes).expect("read");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], Block::SectionHeader(shb));
    assert_eq!(blocks[1], Block::InterfaceDescription(idb));

    // rewriting reproduces the big-endian bytes exactly
    assert_eq!(write_all(&blocks), bytes);
}

#[test]
fn enhanced_packet_with_comment() {
    let epb = EnhancedPacketBlock {
        if_id: 0,
        ts_high: 0,
        ts_low: 0,
        origlen: 5,
        data: hex!("DE AD BE EF 01").to_vec(),
        options: vec![PacketOption::Comment("hi".to_string())],
    };
    let v = epb.to_vec().expect("serialize");
    let expected = hex!(
        "
06 00 00 00 34 00 00 00 00 00 00 00 00 00 00 00
00 00 00 00 05 00 00 00 05 00 00 00 DE AD BE EF
01 00 00 00 01 00 02 00 68 69 00 00 00 00 00 00
34 00 00 00"
    );
    assert_eq!(v, expected);

    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&v);
    let blocks = read_all(&input).expect("read");
    assert_eq!(blocks[1], Block::EnhancedPacket(epb));
}

#[test]
fn name_resolution_roundtrip() {
    let nrb = NameResolutionBlock {
        records: vec![NameRecord::Ipv4 {
            addr: [192, 0, 2, 1],
            names: b"h".to_vec(),
        }],
        options: vec![NameResolutionOption::DnsName("ns".to_string())],
    };
    let v = nrb.to_vec().expect("serialize");

    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&v);
    let blocks = read_all(&input).expect("read");
    assert_eq!(blocks[1], Block::NameResolution(nrb));
    assert_eq!(write_all(&blocks), input);
}

#[test]
fn unknown_block_passthrough() {
    // SHB followed by a block of unknown type 0x00000009
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&hex!("09 00 00 00 10 00 00 00 AA BB CC DD 10 00 00 00"));
    let blocks = read_all(&input).expect("read");
    assert_eq!(blocks.len(), 2);
    match &blocks[1] {
        Block::Unknown(unk) => {
            assert_eq!(unk.block_type, 9);
            assert_eq!(unk.data, hex!("AA BB CC DD"));
        }
        b => panic!("unexpected block {:?}", b),
    }
    assert_eq!(write_all(&blocks), input);
}

#[test]
fn unknown_option_passthrough() {
    let shb = SectionHeaderBlock {
        options: vec![
            SectionHeaderOption::Hardware("x86_64".to_string()),
            SectionHeaderOption::Raw(RawOption {
                code: OptionCode(2988),
                value: b"a fake string".to_vec(),
            }),
        ],
        ..SectionHeaderBlock::new(Endianness::Little)
    };
    let bytes = write_all(&[Block::SectionHeader(shb.clone())]);
    let blocks = read_all(&bytes).expect("read");
    assert_eq!(blocks[0], Block::SectionHeader(shb));
    assert_eq!(write_all(&blocks), bytes);
}

#[test]
fn option_terminator_tolerance() {
    // the same interface description with and without the end-of-options
    // terminator decodes to the same typed block
    let with_term = hex!(
        "
01 00 00 00 18 00 00 00 01 00 00 00 FF FF 00 00
00 00 00 00 18 00 00 00"
    );
    let without_term = hex!(
        "
01 00 00 00 1C 00 00 00 01 00 00 00 FF FF 00 00
02 00 02 00 6C 6F 00 00 1C 00 00 00"
    );
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&with_term);
    input.extend_from_slice(&without_term);
    let blocks = read_all(&input).expect("read");
    assert_eq!(blocks.len(), 3);
    match (&blocks[1], &blocks[2]) {
        (Block::InterfaceDescription(a), Block::InterfaceDescription(b)) => {
            assert!(a.options.is_empty());
            assert_eq!(b.options, vec![InterfaceOption::Name("lo".to_string())]);
        }
        _ => panic!("unexpected blocks"),
    }
}

#[test]
fn section_options_survive_roundtrip() {
    let shb = SectionHeaderBlock {
        options: vec![
            SectionHeaderOption::Comment("first".to_string()),
            SectionHeaderOption::Hardware("hw".to_string()),
            SectionHeaderOption::Os("os".to_string()),
            SectionHeaderOption::UserAppl("app".to_string()),
        ],
        ..SectionHeaderBlock::new(Endianness::Little)
    };
    let bytes = write_all(&[Block::SectionHeader(shb.clone())]);
    let blocks = read_all(&bytes).expect("read");
    assert_eq!(blocks[0], Block::SectionHeader(shb));
}

#[test]
fn max_length_option_roundtrip() {
    // a 65535-byte option value exercises both the length limit and the
    // reader's buffer growth
    let epb = EnhancedPacketBlock {
        if_id: 0,
        ts_high: 0,
        ts_low: 0,
        origlen: 0,
        data: Vec::new(),
        options: vec![PacketOption::Hash(vec![0x5A; 65535])],
    };
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&epb.to_vec().expect("serialize"));
    let blocks = read_all(&input).expect("read");
    assert_eq!(blocks[1], Block::EnhancedPacket(epb));
    assert_eq!(write_all(&blocks), input);
}

#[test]
fn option_value_too_long() {
    let epb = EnhancedPacketBlock {
        if_id: 0,
        ts_high: 0,
        ts_low: 0,
        origlen: 0,
        data: Vec::new(),
        options: vec![PacketOption::Hash(vec![0; 65536])],
    };
    match epb.to_vec() {
        Err(PcapError::ValueTooLong(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn trailing_length_mismatch_is_fatal() {
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&hex!("09 00 00 00 10 00 00 00 AA BB CC DD 14 00 00 00"));
    let mut reader = PcapNGReader::new(&input[..]).expect("reader");
    assert!(reader.next_block().expect("shb").is_some());
    match reader.next_block() {
        Err(PcapError::MalformedFrame(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn unaligned_total_length_is_fatal() {
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&hex!("09 00 00 00 0E 00 00 00 AA BB 0E 00 00 00"));
    let mut reader = PcapNGReader::new(&input[..]).expect("reader");
    assert!(reader.next_block().expect("shb").is_some());
    match reader.next_block() {
        Err(PcapError::MalformedFrame(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn bad_byte_order_magic_is_fatal() {
    let mut input = SHB_MINIMAL_LE.to_vec();
    input[8] = 0x00;
    let mut reader = PcapNGReader::new(&input[..]).expect("reader");
    match reader.next_block() {
        Err(PcapError::BadMagic(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn truncated_block_is_short_read() {
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&hex!("09 00 00 00 18 00 00 00 AA BB"));
    let mut reader = PcapNGReader::new(&input[..]).expect("reader");
    assert!(reader.next_block().expect("shb").is_some());
    match reader.next_block() {
        Err(PcapError::ShortRead(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn tlv_overrun_is_malformed() {
    // IDB whose single option declares more bytes than the region holds
    let mut input = SHB_MINIMAL_LE.to_vec();
    input.extend_from_slice(&hex!(
        "
01 00 00 00 20 00 00 00 01 00 00 00 FF FF 00 00
02 00 20 00 6C 6F 00 00 00 00 00 00 20 00 00 00"
    ));
    let mut reader = PcapNGReader::new(&input[..]).expect("reader");
    assert!(reader.next_block().expect("shb").is_some());
    match reader.next_block() {
        Err(PcapError::MalformedFrame(_)) => (),
        r => panic!("unexpected result {:?}", r),
    }
}
