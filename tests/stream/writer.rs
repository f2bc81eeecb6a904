// Writer: push-style encoder over io::Write.

use std::io::{self, Write};

use lz4stream::stream::{DecompressReader, Reader, Writer};
use lz4stream::{Error, BLOCK_SIZE, BOUNDED_BLOCK_SIZE};

use crate::support::{
    compress_stream, counting_bytes, drain_with, frame_lengths, numbered_records, FlakySink,
    LimitedSink, XorShift,
};

// ─────────────────────────────────────────────────────────────────────────────
// Framing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_write_emits_nothing() {
    let mut w = Writer::new(Vec::new());
    assert_eq!(w.write(&[]).unwrap(), 0);
    assert!(w.get_ref().is_empty());
    assert_eq!(w.total_compressed_written(), 0);
}

#[test]
fn each_block_becomes_one_frame() {
    let data = counting_bytes(3 * BLOCK_SIZE + 10);
    let mut w = Writer::new(Vec::new());
    assert_eq!(w.write(&data).unwrap(), data.len());

    let wire = w.get_ref().clone();
    let lens = frame_lengths(&wire);
    assert_eq!(lens.len(), 4);
    assert!(lens.iter().all(|&len| len > 0 && len <= BOUNDED_BLOCK_SIZE));
    assert_eq!(w.total_compressed_written(), wire.len() as u64);
    assert_eq!(lens.iter().sum::<usize>() + 4 * lens.len(), wire.len());
}

#[test]
fn every_write_flushes_its_own_frames() {
    let mut w = Writer::new(Vec::new());
    w.write_all(b"abc").unwrap();
    w.write_all(b"def").unwrap();
    assert_eq!(frame_lengths(w.get_ref()).len(), 2);
}

#[test]
fn close_writes_no_trailer() {
    let mut w = Writer::new(Vec::new());
    w.write_all(b"no trailer after this").unwrap();
    let before = w.get_ref().len();
    w.close().unwrap();
    assert_eq!(w.get_ref().len(), before);
}

#[test]
fn close_without_data_is_fine() {
    let mut w = Writer::new(Vec::new());
    w.close().unwrap();
    w.close().unwrap();
    assert!(w.into_inner().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn records_round_trip_across_blocks() {
    let data = numbered_records(3000);
    assert!(data.len() > BLOCK_SIZE);

    let wire = compress_stream(&data);
    let mut r = Reader::new(&wire[..]);
    let mut out = Vec::new();
    io::copy(&mut r, &mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn small_repeated_writes_read_back_one_by_one() {
    let payload = b"Hello World!";
    let mut w = Writer::new(Vec::new());
    for _ in 0..100 {
        assert_eq!(w.write(payload).unwrap(), payload.len());
    }
    w.close().unwrap();
    let wire = w.into_inner();

    let mut r = Reader::new(&wire[..]);
    let mut dst = [0u8; 12];
    for i in 0..100 {
        let n = io::Read::read(&mut r, &mut dst).unwrap();
        assert_eq!(n, payload.len(), "read {i}");
        assert_eq!(&dst, payload, "read {i}");
    }
    assert_eq!(io::Read::read(&mut r, &mut dst).unwrap(), 0);
}

#[test]
fn decoded_bytes_do_not_depend_on_write_splits() {
    let data = counting_bytes(3 * BLOCK_SIZE);
    let mut rng = XorShift(0x0123_4567_89AB_CDEF);

    for _ in 0..20 {
        let mut w = Writer::new(Vec::new());
        let mut rest = &data[..];
        for _ in 0..3 {
            let cut = rng.below(rest.len());
            w.write_all(&rest[..cut]).unwrap();
            rest = &rest[cut..];
        }
        w.write_all(rest).unwrap();
        w.close().unwrap();

        let wire = w.into_inner();
        assert_eq!(drain_with(DecompressReader::new(&wire[..]), 8192).unwrap(), data);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn write_after_close_is_rejected() {
    let mut w = Writer::new(Vec::new());
    w.close().unwrap();
    let err = w.write(b"late").unwrap_err();
    assert!(matches!(Error::from_io(&err), Some(Error::Closed)));
}

#[test]
fn reset_starts_an_independent_stream() {
    let mut w = Writer::new(Vec::new());
    w.write_all(b"first stream, first stream").unwrap();
    let first = w.reset(Vec::new());
    assert_eq!(w.total_compressed_written(), 0);

    w.write_all(b"second stream").unwrap();
    w.close().unwrap();
    let second = w.into_inner();

    // The second stream decodes on its own: no history leaks across reset.
    assert_eq!(drain_with(Reader::new(&second[..]), 64).unwrap(), b"second stream");
    assert_eq!(
        drain_with(Reader::new(&first[..]), 64).unwrap(),
        b"first stream, first stream"
    );
}

#[test]
fn reset_reopens_a_closed_writer() {
    let mut w = Writer::new(Vec::new());
    w.close().unwrap();
    w.reset(Vec::new());
    w.write_all(b"alive again").unwrap();
    let wire = w.into_inner();
    assert_eq!(drain_with(Reader::new(&wire[..]), 64).unwrap(), b"alive again");
}

// ─────────────────────────────────────────────────────────────────────────────
// Sink failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sink_error_with_nothing_consumed_is_returned() {
    let mut w = Writer::new(LimitedSink {
        data: Vec::new(),
        limit: 0,
    });
    let err = w.write(b"nowhere to go").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(Error::from_io(&err).is_none(), "sink errors pass through untouched");
}

#[test]
fn sink_error_after_progress_reports_the_progress_first() {
    let data = XorShift(77).bytes(2 * BLOCK_SIZE, 255);

    // Length of the first frame on its own.
    let mut sizing = Writer::new(Vec::new());
    sizing.write_all(&data[..BLOCK_SIZE]).unwrap();
    let first_frame = sizing.total_compressed_written() as usize;

    let mut w = Writer::new(LimitedSink {
        data: Vec::new(),
        limit: first_frame,
    });
    assert_eq!(w.write(&data).unwrap(), BLOCK_SIZE);
    assert_eq!(w.get_ref().data.len(), first_frame);

    let err = w.write(&data[BLOCK_SIZE..]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    let err = w.write(&data[BLOCK_SIZE..]).unwrap_err();
    assert!(matches!(Error::from_io(&err), Some(Error::Poisoned)));
}

#[test]
fn retry_after_a_sink_error_is_refused() {
    let first = b"first block, accepted by the sink";
    let second = b"second block, rejected once by the sink";

    let mut w = Writer::new(FlakySink::failing_on(2));
    w.write_all(first).unwrap();
    let err = w.write(second).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    // The rejected block already entered the history, so resuming would
    // produce frames that decode to the wrong bytes.
    for _ in 0..3 {
        let err = w.write(second).unwrap_err();
        assert!(matches!(Error::from_io(&err), Some(Error::Poisoned)));
    }

    // What reached the sink is a valid, shorter stream.
    let sent = w.reset(FlakySink::default());
    assert_eq!(drain_with(DecompressReader::new(&sent.data[..]), 64).unwrap(), first);

    // After a reset the writer starts a fresh stream.
    w.write_all(second).unwrap();
    w.close().unwrap();
    let wire = w.into_inner().data;
    assert_eq!(drain_with(DecompressReader::new(&wire[..]), 64).unwrap(), second);
}
