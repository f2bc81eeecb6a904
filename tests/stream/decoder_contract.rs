// Behavior shared by both decoder variants.
//
// Each check takes the decoder's constructor, so `reader.rs` and
// `decompress_reader.rs` run the same assertions against their own type.

use std::io::{self, Cursor, Read};

use lz4stream::{Error, StreamDecoder, BLOCK_SIZE, BOUNDED_BLOCK_SIZE};

use crate::support::{
    block_frame, compress_stream, drain_with, frame, numbered_records, FailingReader,
};

pub type Source = Cursor<Vec<u8>>;

fn typed(err: &io::Error) -> &Error {
    Error::from_io(err).unwrap_or_else(|| panic!("expected a typed error, got {err:?}"))
}

/// Decodes `wire` to the end with the given read size.
fn decode<D: StreamDecoder>(make: fn(Source) -> D, wire: Vec<u8>, buf_len: usize) -> io::Result<Vec<u8>> {
    drain_with(make(Cursor::new(wire)), buf_len)
}

pub fn round_trips_with_any_read_size<D: StreamDecoder>(make: fn(Source) -> D) {
    let data = numbered_records(3000);
    let wire = compress_stream(&data);
    for buf_len in [1, 7, 4096, BLOCK_SIZE, 3 * BLOCK_SIZE] {
        assert_eq!(decode(make, wire.clone(), buf_len).unwrap(), data, "buf_len={buf_len}");
    }
}

pub fn empty_source_is_end_of_stream<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut d = make(Cursor::new(Vec::new()));
    let mut buf = [0u8; 16];
    assert_eq!(d.read(&mut buf).unwrap(), 0);
    assert_eq!(d.read(&mut buf).unwrap(), 0);
}

pub fn zero_length_read_does_not_touch_the_source<D: Read>(make: fn(FailingReader) -> D) {
    let mut d = make(FailingReader(io::ErrorKind::ConnectionReset));
    assert_eq!(d.read(&mut []).unwrap(), 0);
    let err = d.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    assert!(Error::from_io(&err).is_none(), "source errors pass through untouched");
}

pub fn pending_tail_is_served_before_the_next_frame<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut wire = block_frame(&[b'a'; 100]);
    wire.extend_from_slice(&compress_stream(b"bbb"));
    let mut d = make(Cursor::new(wire));

    let mut buf = [0u8; 10];
    assert_eq!(d.read(&mut buf).unwrap(), 10);
    assert_eq!(d.buffered(), 90);

    let mut rest = vec![0u8; 200];
    assert_eq!(d.read(&mut rest).unwrap(), 90, "tail only, no frame merge");
    assert!(rest[..90].iter().all(|&b| b == b'a'));
    assert_eq!(d.buffered(), 0);
}

pub fn empty_blocks_are_skipped<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut wire = block_frame(b"");
    wire.extend_from_slice(&block_frame(b""));
    wire.extend_from_slice(&block_frame(b"after empties"));
    assert_eq!(decode(make, wire, 64).unwrap(), b"after empties");
}

pub fn truncated_header_is_unexpected_eof<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut wire = compress_stream(b"complete frame");
    wire.extend_from_slice(&[0x10, 0x00]);
    let err = decode(make, wire, 64).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    assert!(matches!(typed(&err), Error::Truncated { expected: 4, actual: 2 }));
}

pub fn truncated_payload_is_unexpected_eof<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut wire = compress_stream(&numbered_records(100));
    wire.truncate(wire.len() - 3);
    let err = decode(make, wire, 64).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    assert!(matches!(typed(&err), Error::Truncated { .. }));
}

pub fn undecodable_frame_is_malformed<D: StreamDecoder>(make: fn(Source) -> D) {
    // One literal, then a match 5 bytes back with only 1 byte of output.
    let bad_offset = frame(&[0x10, b'a', 0x05, 0x00]);
    // Literal run longer than the payload.
    let overrun = frame(&[0xF0, 0xFF, 0xFF, 0x01, 0x02, 0x03]);

    for wire in [bad_offset, overrun] {
        let mut d = make(Cursor::new(wire));
        let err = d.read(&mut [0u8; 64]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(matches!(typed(&err), Error::MalformedStream(_)));
        d.close().unwrap();
    }
}

pub fn oversized_frame_length_is_malformed<D: StreamDecoder>(make: fn(Source) -> D) {
    let wire = ((BOUNDED_BLOCK_SIZE + 1) as u32).to_le_bytes().to_vec();
    let err = decode(make, wire, 64).unwrap_err();
    assert!(matches!(typed(&err), Error::MalformedStream(_)));
}

pub fn block_larger_than_a_slot_is_malformed<D: StreamDecoder>(make: fn(Source) -> D) {
    let wire = block_frame(&vec![0u8; BLOCK_SIZE + 1]);
    let err = decode(make, wire, 64).unwrap_err();
    assert!(matches!(typed(&err), Error::MalformedStream(_)));
}

pub fn close_is_idempotent_and_final<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut d = make(Cursor::new(compress_stream(b"some bytes to leave unread")));
    let mut buf = [0u8; 4];
    assert_eq!(d.read(&mut buf).unwrap(), 4);
    assert!(d.buffered() > 0);

    d.close().unwrap();
    d.close().unwrap();
    assert_eq!(d.buffered(), 0);
    let err = d.read(&mut buf).unwrap_err();
    assert!(matches!(typed(&err), Error::Closed));
}

/// Stream with a 522-byte first frame whose match length runs past the
/// frame, followed by more frames of the same kind.
fn runaway_match_stream() -> Vec<u8> {
    let mut wire = vec![0x0A, 0x02, 0x00, 0x00, 0xFF, 0xF1];
    wire.extend(0..=255u8);
    wire.extend_from_slice(&[0x00, 0x01]);
    wire.extend(std::iter::repeat(0xFF).take(255));
    wire.extend_from_slice(&[0xE7, 0x50, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF, 0xE3, 0x00, 0x00, 0x00, 0x0F, 0x00]);
    wire.extend(std::iter::repeat(0xFF).take(218));
    wire.extend_from_slice(&[
        0xB5, 0x50, 0xEF, 0xF0, 0xF1, 0xF2, 0xF3, 0xB4, 0x00, 0x00, 0x00, 0x0F, 0x00, 0xD9,
    ]);
    wire.extend(std::iter::repeat(0xFF).take(170));
    wire.extend_from_slice(&[
        0x26, 0x50, 0x83, 0x84, 0x85, 0x86, 0x87, 0x91, 0x00, 0x00, 0x00, 0xFF, 0x5D, 0x88, 0x89,
        0x8A, 0x8B, 0x8C, 0x8D, 0x8E, 0x8F, 0x90,
    ]);
    assert_eq!(wire.len(), 956);
    wire
}

pub fn runaway_match_length_is_malformed<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut d = make(Cursor::new(runaway_match_stream()));
    let err = io::copy(&mut d, &mut io::sink()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(matches!(typed(&err), Error::MalformedStream(_)));
    d.close().unwrap();
}

pub fn errors_are_sticky<D: StreamDecoder>(make: fn(Source) -> D) {
    // An undecodable frame followed by a valid one: the valid frame must not
    // be decoded against a history that skipped the bad block.
    let mut wire = frame(&[0x10, b'a', 0x05, 0x00]);
    wire.extend_from_slice(&compress_stream(b"never reached"));
    let mut d = make(Cursor::new(wire));

    let mut buf = [0u8; 64];
    let err = d.read(&mut buf).unwrap_err();
    assert!(matches!(typed(&err), Error::MalformedStream(_)));
    for _ in 0..2 {
        let err = d.read(&mut buf).unwrap_err();
        assert!(matches!(typed(&err), Error::Poisoned));
    }
    assert_eq!(d.read(&mut []).unwrap(), 0);
    d.close().unwrap();
}

pub fn truncation_is_sticky<D: StreamDecoder>(make: fn(Source) -> D) {
    let mut wire = compress_stream(&numbered_records(100));
    wire.truncate(wire.len() - 3);
    let mut d = make(Cursor::new(wire));

    let mut buf = vec![0u8; 64 * 1024];
    let err = d.read(&mut buf).unwrap_err();
    assert!(matches!(typed(&err), Error::Truncated { .. }));
    let err = d.read(&mut buf).unwrap_err();
    assert!(matches!(typed(&err), Error::Poisoned));
}
