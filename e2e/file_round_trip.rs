//! E2E Test Suite 1: File Round Trips
//!
//! Streams real files through every encoder/decoder pairing and through the
//! whole-message envelope, using `tempfile` directories as scratch space.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use lz4stream::stream::{CompressReader, DecompressReader, Reader, Writer};
use lz4stream::{compress_to_vec_with_header, decompress_to_vec_with_header, StreamDecoder};
use tempfile::TempDir;

/// About 400 KB: repetitive records interleaved with pseudo-random runs, so
/// blocks see both long matches and incompressible stretches.
fn mixed_content() -> Vec<u8> {
    let mut out = Vec::new();
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    for i in 0..4000 {
        writeln!(out, "{i:05} the quick brown fox jumps over the lazy dog").unwrap();
        if i % 50 == 0 {
            for _ in 0..512 {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                out.push(state as u8);
            }
        }
    }
    out
}

fn compress_file(src: &Path, dst: &Path) -> Result<u64> {
    let mut input = BufReader::new(File::open(src)?);
    let mut w = Writer::new(BufWriter::new(File::create(dst)?));
    io::copy(&mut input, &mut w)?;
    w.close()?;
    Ok(w.total_compressed_written())
}

fn decompress_file<D: StreamDecoder>(mut decoder: D, dst: &Path) -> Result<u64> {
    let mut out = BufWriter::new(File::create(dst)?);
    let n = io::copy(&mut decoder, &mut out)?;
    out.flush()?;
    decoder.close()?;
    Ok(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. Writer → file → DecompressReader
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn writer_file_decompress_reader() -> Result<()> {
    let dir = TempDir::new()?;
    let src = dir.path().join("input.bin");
    let lz = dir.path().join("input.bin.lz4s");
    let out = dir.path().join("output.bin");

    let original = mixed_content();
    fs::write(&src, &original)?;

    let written = compress_file(&src, &lz)?;
    ensure!(written == fs::metadata(&lz)?.len(), "counter matches file size");
    ensure!(written < original.len() as u64, "mixed content should shrink");

    let decoder = DecompressReader::new(BufReader::new(File::open(&lz)?));
    let n = decompress_file(decoder, &out)?;
    ensure!(n == original.len() as u64);
    ensure!(fs::read(&out)? == original, "round trip mismatch");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. Writer → file → Reader (tail-copying decoder)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn writer_file_reader() -> Result<()> {
    let dir = TempDir::new()?;
    let src = dir.path().join("input.bin");
    let lz = dir.path().join("input.bin.lz4s");
    let out = dir.path().join("output.bin");

    let original = mixed_content();
    fs::write(&src, &original)?;
    compress_file(&src, &lz)?;

    let decoder = Reader::new(File::open(&lz)?);
    decompress_file(decoder, &out)?;
    ensure!(fs::read(&out)? == original, "round trip mismatch");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. File → CompressReader → file, decoded by both decoders
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_reader_file_both_decoders() -> Result<()> {
    let dir = TempDir::new()?;
    let src = dir.path().join("input.bin");
    let lz = dir.path().join("pulled.lz4s");

    let original = mixed_content();
    fs::write(&src, &original)?;

    let mut c = CompressReader::new(File::open(&src)?);
    let mut sink = BufWriter::new(File::create(&lz)?);
    io::copy(&mut c, &mut sink)?;
    sink.flush()?;
    c.close()?;

    ensure!(c.total_compressed_written() == fs::metadata(&lz)?.len());

    let mut via_pull = Vec::new();
    DecompressReader::new(File::open(&lz)?).read_to_end(&mut via_pull)?;
    let mut via_push = Vec::new();
    Reader::new(File::open(&lz)?).read_to_end(&mut via_push)?;
    ensure!(via_pull == original && via_push == original);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 4. Empty file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_file_produces_empty_stream() -> Result<()> {
    let dir = TempDir::new()?;
    let src = dir.path().join("empty.bin");
    let lz = dir.path().join("empty.bin.lz4s");
    fs::write(&src, b"")?;

    let written = compress_file(&src, &lz)?;
    ensure!(written == 0, "no frames for no input");

    let mut out = Vec::new();
    DecompressReader::new(File::open(&lz)?).read_to_end(&mut out)?;
    ensure!(out.is_empty());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 5. Envelope persisted to disk
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn envelope_file_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("message.lz4m");

    let original = mixed_content();
    fs::write(&path, compress_to_vec_with_header(&original)?)?;

    let encoded = fs::read(&path).context("reading envelope back")?;
    ensure!(encoded[..4] == (original.len() as u32).to_le_bytes());
    ensure!(decompress_to_vec_with_header(&encoded)? == original);
    Ok(())
}
