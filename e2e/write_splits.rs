//! E2E Test Suite 2: Write Splits
//!
//! Three full streaming blocks written as four randomly sized chunks, then
//! decoded with randomly sized reads.  Every split combination must decode to
//! the original bytes: partial blocks, full blocks and block-straddling
//! writes all exercise the staging-slot alternation differently.

use std::io::{Read, Write};

use anyhow::{ensure, Result};
use lz4stream::stream::{DecompressReader, Reader, Writer};
use lz4stream::BLOCK_SIZE;

struct XorShift(u64);

impl XorShift {
    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

fn counting_input() -> Vec<u8> {
    (0..3 * BLOCK_SIZE).map(|i| i as u8).collect()
}

fn write_in_pieces(input: &[u8], cuts: &[usize]) -> Result<Vec<u8>> {
    let mut w = Writer::new(Vec::new());
    let mut last = 0;
    for &cut in cuts {
        w.write_all(&input[last..cut])?;
        last = cut;
    }
    w.write_all(&input[last..])?;
    w.close()?;
    Ok(w.into_inner())
}

fn random_cuts(rng: &mut XorShift, len: usize) -> Vec<usize> {
    let mut cuts = Vec::with_capacity(3);
    let mut last = 0;
    for _ in 0..3 {
        last += rng.below(len - last);
        cuts.push(last);
    }
    cuts
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. Random split points, whole-stream reads
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn random_write_splits_round_trip() -> Result<()> {
    let input = counting_input();
    let mut rng = XorShift(0xA076_1D64_78BD_642F);

    for round in 0..300 {
        let cuts = random_cuts(&mut rng, input.len());
        let wire = write_in_pieces(&input, &cuts)?;

        let mut out = Vec::with_capacity(input.len());
        Reader::new(&wire[..]).read_to_end(&mut out)?;
        ensure!(out == input, "round {round}: mismatch with cuts {cuts:?}");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. Random split points, random read sizes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn random_write_and_read_sizes() -> Result<()> {
    let input = counting_input();
    let mut rng = XorShift(0xE703_7ED1_A0B4_28DB);

    for round in 0..100 {
        let cuts = random_cuts(&mut rng, input.len());
        let wire = write_in_pieces(&input, &cuts)?;

        let mut r = DecompressReader::new(&wire[..]);
        let mut out = Vec::with_capacity(input.len());
        let mut buf = vec![0u8; 2 * BLOCK_SIZE];
        loop {
            let want = 1 + rng.below(buf.len());
            let n = r.read(&mut buf[..want])?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        ensure!(out == input, "round {round}: mismatch with cuts {cuts:?}");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. Block-aligned splits reproduce the single-write stream exactly
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_aligned_splits_are_byte_identical() -> Result<()> {
    let input = counting_input();
    let whole = write_in_pieces(&input, &[])?;
    let aligned = write_in_pieces(&input, &[BLOCK_SIZE, 2 * BLOCK_SIZE])?;
    ensure!(whole == aligned, "block-aligned writes changed the frames");
    Ok(())
}
