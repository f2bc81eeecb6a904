//! E2E Test Suite 4: Error Handling
//!
//! Damaged streams must fail with a typed error (never a panic, never a short
//! read passed off as success), and streams cut on a frame boundary must read
//! as a shorter but valid stream.

use std::io::{self, Read, Write};

use anyhow::{bail, ensure, Result};
use lz4stream::stream::{DecompressReader, Reader, Writer};
use lz4stream::{compress_to_vec_with_header, decompress_to_vec_with_header, Error};

fn records(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..count {
        write!(out, "record {i:06} / payload {:08x};", (i as u32).wrapping_mul(2_654_435_761)).unwrap();
    }
    out
}

/// Encodes with one `write` per chunk so the stream has several frames.
fn encode_chunks(data: &[u8], chunk: usize) -> Result<(Vec<u8>, Vec<usize>)> {
    let mut w = Writer::new(Vec::new());
    let mut boundaries = vec![0];
    for piece in data.chunks(chunk) {
        w.write_all(piece)?;
        boundaries.push(w.get_ref().len());
    }
    w.close()?;
    Ok((w.into_inner(), boundaries))
}

fn decode(wire: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DecompressReader::new(wire).read_to_end(&mut out)?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. Truncation at every offset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn truncation_is_clean_only_on_frame_boundaries() -> Result<()> {
    let data = records(200);
    let chunk = 1000;
    let (wire, boundaries) = encode_chunks(&data, chunk)?;

    for cut in 0..=wire.len() {
        let result = decode(&wire[..cut]);
        match boundaries.iter().position(|&b| b == cut) {
            Some(frames) => {
                let expected = &data[..(frames * chunk).min(data.len())];
                ensure!(result? == expected, "cut {cut}: wrong prefix");
            }
            None => {
                let Err(err) = result else {
                    bail!("cut {cut} inside a frame decoded successfully");
                };
                ensure!(err.kind() == io::ErrorKind::UnexpectedEof, "cut {cut}: {err}");
                ensure!(matches!(Error::from_io(&err), Some(Error::Truncated { .. })));
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. Crafted frame with a runaway match length
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn runaway_match_length_is_malformed() -> Result<()> {
    // 256 literals, a valid back-reference, then a match-length run of 0xFF
    // bytes that the frame ends in the middle of.
    let mut payload = vec![0xFF, 0xF1];
    payload.extend(0..=255u8);
    payload.extend_from_slice(&[0x00, 0x01]);
    payload.extend(std::iter::repeat(0xFF).take(262));
    assert_eq!(payload.len(), 522);

    let mut wire = (payload.len() as u32).to_le_bytes().to_vec();
    wire.extend_from_slice(&payload);

    let mut r = Reader::new(&wire[..]);
    let mut out = Vec::new();
    let err = io::copy(&mut r, &mut out).unwrap_err();
    ensure!(err.kind() == io::ErrorKind::InvalidData);
    ensure!(matches!(Error::from_io(&err), Some(Error::MalformedStream(_))));
    ensure!(err.to_string().contains("malformed"), "message: {err}");
    lz4stream::StreamDecoder::close(&mut r)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. Byte corruption never panics
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn corrupted_bytes_never_panic() -> Result<()> {
    let data = records(3000);
    let (wire, _) = encode_chunks(&data, 20_000)?;

    let mut state = 0x9E37_79B9u64;
    for _ in 0..300 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let pos = (state >> 33) as usize % wire.len();
        let mut damaged = wire.clone();
        damaged[pos] ^= 1 << (state % 8);

        // Damage may still decode (a flipped literal); if it fails it must
        // fail with one of the crate's stream errors.
        if let Err(err) = decode(&damaged) {
            ensure!(
                matches!(
                    Error::from_io(&err),
                    Some(Error::MalformedStream(_) | Error::Truncated { .. })
                ),
                "byte {pos}: unexpected error {err}"
            );
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 4. Envelope with a lying length header
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn envelope_length_header_is_enforced() -> Result<()> {
    let data = records(100);
    let mut encoded = compress_to_vec_with_header(&data)?;

    for stored in [0u32, 1, data.len() as u32 - 1, data.len() as u32 + 1] {
        encoded[..4].copy_from_slice(&stored.to_le_bytes());
        match decompress_to_vec_with_header(&encoded) {
            Ok(out) if stored == 0 => ensure!(out.is_empty()),
            Ok(_) => bail!("stored length {stored} accepted"),
            Err(Error::MalformedStream(_)) => {}
            Err(other) => bail!("stored length {stored}: unexpected {other}"),
        }
    }
    Ok(())
}
