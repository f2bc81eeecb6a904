//! E2E Test Suite 3: Concurrent Streams
//!
//! Stream handles are single-owner, but independent handles share nothing and
//! may run on separate threads.  These tests drive many of them at once on the
//! rayon pool and check that no state leaks between streams.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};

use anyhow::{ensure, Result};
use rayon::prelude::*;
use tempfile::TempDir;

use lz4stream::stream::{CompressReader, DecompressReader, Reader, Writer};
use lz4stream::{compress_to_vec_with_header, decompress_to_vec_with_header, BLOCK_SIZE};

fn payload(seed: usize, len: usize) -> Vec<u8> {
    let line = format!("stream {seed:03}: lorem ipsum dolor sit amet, consectetur adipiscing elit. ");
    line.bytes().cycle().take(len).collect()
}

fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut w = Writer::new(Vec::new());
    w.write_all(data)?;
    w.close()?;
    Ok(w.into_inner())
}

fn assert_send<T: Send>() {}

#[test]
fn stream_types_are_send() {
    assert_send::<Writer<Vec<u8>>>();
    assert_send::<Reader<File>>();
    assert_send::<DecompressReader<File>>();
    assert_send::<CompressReader<File>>();
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. One compressed file, many concurrent decoders
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_decoders_over_one_file() -> Result<()> {
    let dir = TempDir::new()?;
    let compressed = dir.path().join("shared.lz4s");
    let original = payload(0, 5 * BLOCK_SIZE + 17);
    fs::write(&compressed, encode(&original)?)?;

    let outputs: Vec<Vec<u8>> = (0..32)
        .into_par_iter()
        .map(|i| -> Result<Vec<u8>> {
            let file = BufReader::new(File::open(&compressed)?);
            let mut out = Vec::new();
            if i % 2 == 0 {
                DecompressReader::new(file).read_to_end(&mut out)?;
            } else {
                Reader::new(file).read_to_end(&mut out)?;
            }
            Ok(out)
        })
        .collect::<Result<_>>()?;

    for (i, out) in outputs.iter().enumerate() {
        ensure!(*out == original, "decoder {i} produced different bytes");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. Independent encoder/decoder pairs per thread
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_independent_round_trips() -> Result<()> {
    (0..24usize).into_par_iter().try_for_each(|seed| -> Result<()> {
        let data = payload(seed, 3 * BLOCK_SIZE + seed * 1000);
        let wire = encode(&data)?;

        let mut out = Vec::new();
        io::copy(&mut DecompressReader::new(&wire[..]), &mut out)?;
        ensure!(out == data, "stream {seed} corrupted");

        let mut pulled = Vec::new();
        CompressReader::new(&data[..]).read_to_end(&mut pulled)?;
        ensure!(pulled == wire, "stream {seed}: pull and push encoders disagree");
        Ok(())
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. Envelope codec from many threads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_envelopes() -> Result<()> {
    (0..64usize).into_par_iter().try_for_each(|seed| -> Result<()> {
        let data = payload(seed, seed * 997);
        let encoded = compress_to_vec_with_header(&data)?;
        ensure!(decompress_to_vec_with_header(&encoded)? == data, "message {seed}");
        Ok(())
    })
}
